use crate::core::{error::EvaluationError, evaluator::Evaluator, position::Position};
use crate::games::chess::ChessBoard;
use shakmaty::{Board, Outcome, Role};

/// Centipawns of a material lead that maps to ~0.73
const SCALE: f32 = 400.0;

/// Classical material count squashed to [0, 1], 0.5 being equal material.
/// Finished games score 1 (white won), 0 (black won) or 0.5.
///
/// Needs no network, useful to try the search and for benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    /// Material of white minus material of black, in centipawns
    pub fn balance(board: &Board) -> i32 {
        board
            .clone()
            .into_iter()
            .map(|(_, piece)| {
                let value = match piece.role {
                    Role::Pawn => 100,
                    Role::Knight => 320,
                    Role::Bishop => 330,
                    Role::Rook => 500,
                    Role::Queen => 900,
                    Role::King => 0,
                };
                piece.color.fold_wb(value, -value)
            })
            .sum()
    }
}

impl Evaluator<ChessBoard> for MaterialEvaluator {
    fn evaluate(&mut self, position: &mut ChessBoard) -> Result<f32, EvaluationError> {
        match position.outcome() {
            Some(Outcome::Decisive { winner }) => Ok(winner.fold_wb(1.0, 0.0)),
            Some(Outcome::Draw) => Ok(0.5),
            None => {
                let balance = MaterialEvaluator::balance(position.board()) as f32;
                Ok(1.0 / (1.0 + (-balance / SCALE).exp()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_material_is_even() {
        let mut board = ChessBoard::default();
        assert_eq!(MaterialEvaluator.evaluate(&mut board).unwrap(), 0.5);
    }

    #[test]
    fn extra_queen_favours_its_side() {
        let mut white_up = ChessBoard::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let mut black_up = ChessBoard::from_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();

        let white = MaterialEvaluator.evaluate(&mut white_up).unwrap();
        let black = MaterialEvaluator.evaluate(&mut black_up).unwrap();

        assert!(white > 0.85 && white < 1.0);
        assert!((white + black - 1.0).abs() < 1e-6);
    }

    #[test]
    fn checkmate_is_decided() {
        // fool's mate
        let mut board = ChessBoard::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        assert_eq!(MaterialEvaluator.evaluate(&mut board).unwrap(), 0.0);
    }
}

use crate::core::error::EncodingError;
use crate::core::position::Position;
use crate::games::chess::ChessBoard;
use ndarray::{Array3, Array4, Axis};
use shakmaty::{Bitboard, Board, Color, Piece, Role, Square};

/// Number of planes in an encoded position
pub const CHANNELS: usize = 14;

/// Plane of squares reachable by a white legal move
pub const WHITE_REACH: usize = 12;

/// Plane of squares reachable by a black legal move
pub const BLACK_REACH: usize = 13;

/// A position encoded as 14 planes of 8x8 squares.
///
/// Planes 0-5 are the white pawn, knight, bishop, rook, queen and king masks,
/// planes 6-11 the same for black, and planes 12 and 13 the squares each side
/// can move to. Row 0 is the 8th rank (the board seen from white), column 0 is
/// the a-file. Every entry is 0 or 1.
pub type PositionTensor = Array3<f32>;

/// Encodes the current position of the board.
///
/// The reachable-square planes are computed by handing the move to each side
/// in turn. The side to move is restored before returning, on
/// success and on failure.
pub fn encode(board: &mut ChessBoard) -> Result<PositionTensor, EncodingError> {
    let mut tensor = PositionTensor::zeros((CHANNELS, 8, 8));

    encode_pieces(board.board(), &mut tensor);

    let turn = board.turn();
    let reach = reachable_by_both_sides(board);
    board.set_turn(turn);

    let (white, black) = reach?;
    encode_squares(white, WHITE_REACH, &mut tensor);
    encode_squares(black, BLACK_REACH, &mut tensor);

    Ok(tensor)
}

/// Encodes a position given as a FEN string
pub fn encode_fen(fen: &str) -> Result<PositionTensor, EncodingError> {
    encode(&mut ChessBoard::from_fen(fen)?)
}

/// Adds the leading batch axis expected by the scoring networks: (1, 14, 8, 8)
pub fn to_batch(tensor: PositionTensor) -> Array4<f32> {
    tensor.insert_axis(Axis(0))
}

fn reachable_by_both_sides(board: &mut ChessBoard) -> Result<(Bitboard, Bitboard), EncodingError> {
    board.set_turn(Color::White);
    let white = board.reachable_squares()?;

    board.set_turn(Color::Black);
    let black = board.reachable_squares()?;

    Ok((white, black))
}

/// Plane of a piece
pub fn channel(piece: Piece) -> usize {
    let offset = match piece.color {
        Color::White => 0,
        Color::Black => 6,
    };

    offset
        + match piece.role {
            Role::Pawn => 0,
            Role::Knight => 1,
            Role::Bishop => 2,
            Role::Rook => 3,
            Role::Queen => 4,
            Role::King => 5,
        }
}

/// (row, column) of a square in a plane
pub fn coords(square: Square) -> (usize, usize) {
    (7 - square.rank() as usize, square.file() as usize)
}

fn encode_pieces(board: &Board, tensor: &mut PositionTensor) {
    for (square, piece) in board.clone().into_iter() {
        let (row, col) = coords(square);
        tensor[[channel(piece), row, col]] = 1.0;
    }
}

fn encode_squares(squares: Bitboard, plane: usize, tensor: &mut PositionTensor) {
    for square in squares {
        let (row, col) = coords(square);
        tensor[[plane, row, col]] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_flip_ranks() {
        assert_eq!(coords(Square::A8), (0, 0));
        assert_eq!(coords(Square::H1), (7, 7));
        assert_eq!(coords(Square::E2), (6, 4));
    }

    #[test]
    fn channels_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for color in [Color::White, Color::Black] {
            for role in Role::ALL {
                assert!(seen.insert(channel(Piece { color, role })));
            }
        }
        assert_eq!(seen.len(), 12);
        assert!(seen.iter().all(|&c| c < WHITE_REACH));
    }

    #[test]
    fn batch_shape() {
        let tensor = encode(&mut ChessBoard::default()).unwrap();
        assert_eq!(to_batch(tensor).shape(), &[1, CHANNELS, 8, 8]);
    }
}

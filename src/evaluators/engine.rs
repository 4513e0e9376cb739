use crate::core::{error::EvaluationError, evaluator::Evaluator, position::Position};
use crate::games::chess::ChessBoard;
use crate::uci_engine::UciEngine;
use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdin, ChildStdout};

/// Scores positions with an external UCI engine, in centipawns from White's
/// point of view. Mates are mapped to +/- `MATE_SCORE`.
pub struct EngineEvaluator<R = BufReader<ChildStdout>, W: Write = ChildStdin> {
    engine: UciEngine<R, W>,
}

impl<R: BufRead, W: Write> EngineEvaluator<R, W> {
    pub fn new(engine: UciEngine<R, W>) -> Self {
        EngineEvaluator { engine }
    }

    pub fn engine(&mut self) -> &mut UciEngine<R, W> {
        &mut self.engine
    }
}

impl<R: BufRead, W: Write> Evaluator<ChessBoard> for EngineEvaluator<R, W> {
    fn evaluate(&mut self, position: &mut ChessBoard) -> Result<f32, EvaluationError> {
        let fen = position.fen();
        let result = self.engine.evaluate_position(&fen)?;

        match result.score {
            Some(score) => Ok(score.white(position.turn()).to_centipawns() as f32),
            None => Err(EvaluationError::Unavailable(format!(
                "engine reported no score for {}",
                fen
            ))),
        }
    }
}

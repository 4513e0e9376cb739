use crate::core::{error::EvaluationError, evaluator::Evaluator};
use crate::games::chess::ChessBoard;
use crate::nn::{encoding, model::ScoreFunction};

/// Scores positions with a network: encode, then score the tensor
pub struct NetworkEvaluator<S: ScoreFunction> {
    model: S,
    /// Positions scored so far
    evaluations: usize,
}

impl<S: ScoreFunction> NetworkEvaluator<S> {
    pub fn new(model: S) -> Self {
        NetworkEvaluator {
            model,
            evaluations: 0,
        }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn model(&self) -> &S {
        &self.model
    }
}

impl<S: ScoreFunction> Evaluator<ChessBoard> for NetworkEvaluator<S> {
    fn evaluate(&mut self, position: &mut ChessBoard) -> Result<f32, EvaluationError> {
        let tensor = encoding::encode(position)?;
        let score = self.model.score(&tensor)?;
        self.evaluations += 1;
        Ok(score)
    }
}

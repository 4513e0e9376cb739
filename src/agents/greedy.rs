use crate::algos::greedy::greedy;
use crate::core::{agent::Agent, error::SearchError, evaluator::Evaluator, position::Position};

/// Plays the move leading to the best scored position, looking one ply ahead
pub struct GreedyAgent<E> {
    evaluator: E,
    /// Score of the last move played, for the side that played it
    last_score: Option<f32>,
}

impl<E> GreedyAgent<E> {
    pub fn new(evaluator: E) -> Self {
        GreedyAgent {
            evaluator,
            last_score: None,
        }
    }

    pub fn last_score(&self) -> Option<f32> {
        self.last_score
    }
}

impl<P, E> Agent<P> for GreedyAgent<E>
where
    P: Position,
    E: Evaluator<P>,
{
    fn name(&self) -> &str {
        "greedy"
    }

    fn next_action(&mut self, position: &mut P) -> Result<P::Action, SearchError> {
        let (action, score) = greedy(position, &mut self.evaluator)?;
        self.last_score = Some(score);
        Ok(action)
    }
}

use crate::algos::alphabeta::AlphaBeta;
use crate::core::{agent::Agent, error::SearchError, evaluator::Evaluator, position::Position};

/// Searches with alpha-beta to a fixed depth
pub struct MinimaxAgent<E> {
    evaluator: E,
    /// Plies searched, the move played included
    depth: usize,
    name: String,
    last_score: Option<f32>,
}

impl<E> MinimaxAgent<E> {
    pub fn new(evaluator: E, depth: usize) -> Self {
        MinimaxAgent {
            evaluator,
            depth,
            name: format!("minimax-{}", depth),
            last_score: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_score(&self) -> Option<f32> {
        self.last_score
    }
}

impl<P, E> Agent<P> for MinimaxAgent<E>
where
    P: Position,
    E: Evaluator<P>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn next_action(&mut self, position: &mut P) -> Result<P::Action, SearchError> {
        let mut search = AlphaBeta::new(&mut self.evaluator, position.turn());
        let (action, score) = search.select_move(position, self.depth)?;
        self.last_score = Some(score);
        Ok(action)
    }
}

use crate::core::{agent::Agent, error::SearchError, position::Position};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Plays a uniformly random legal move
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible games
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        RandomAgent::new()
    }
}

impl<P: Position> Agent<P> for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn next_action(&mut self, position: &mut P) -> Result<P::Action, SearchError> {
        position
            .valid_actions()
            .choose(&mut self.rng)
            .cloned()
            .ok_or(SearchError::NoLegalMove)
    }
}

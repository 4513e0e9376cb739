mod greedy;
mod minimax;
mod random;

pub use greedy::GreedyAgent;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;

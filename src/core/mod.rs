pub mod agent;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod position;

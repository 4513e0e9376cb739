pub mod agents;
pub mod algos;
pub mod core;
pub mod dataset;
pub mod evaluators;
pub mod games;
pub mod nn;
pub mod uci_engine;

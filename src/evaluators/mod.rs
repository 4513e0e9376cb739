pub mod engine;
pub mod material;
pub mod network;

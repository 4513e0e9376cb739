mod build_dataset;
mod game_visitor;
mod info;
mod play;

use crate::build_dataset::{build_dataset, BuildDatasetCommand};
use crate::info::{info, InfoCommand};
use crate::play::{play, PlayCommand};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use supervised_chess::uci_engine::EngineConfig;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds a dataset of positions labelled by a UCI engine
    BuildDataset(BuildDatasetCommand),
    /// Plays games between two strategies
    Play(PlayCommand),
    /// Prints the encoding and the scores of a position
    Info(InfoCommand),
}

/// UCI engine process options
#[derive(Args, Clone)]
pub struct EngineArgs {
    /// Path of the UCI engine binary
    #[arg(long, value_name = "engine", default_value = "stockfish")]
    engine: String,

    /// Threads given to the engine
    #[arg(long, value_name = "threads", default_value = "2")]
    threads: usize,

    /// Hash table size given to the engine, in MB
    #[arg(long, value_name = "hash", default_value = "2048")]
    hash: usize,
}

impl EngineArgs {
    pub fn config(&self, depth: usize) -> EngineConfig {
        EngineConfig {
            binary: self.engine.clone(),
            depth,
            threads: self.threads,
            hash_mb: self.hash,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args = Cli::parse();

    match args.command {
        Commands::BuildDataset(cmd) => build_dataset(cmd),
        Commands::Play(cmd) => play(cmd),
        Commands::Info(cmd) => info(cmd),
    }
}

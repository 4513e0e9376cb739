use crate::play::make_evaluator;
use crate::EngineArgs;
use clap::Args;
use std::error::Error;
use supervised_chess::core::{evaluator::Evaluator, position::Position};
use supervised_chess::games::chess::ChessBoard;
use supervised_chess::nn::encoding::{encode, PositionTensor, BLACK_REACH, CHANNELS, WHITE_REACH};
use supervised_chess::uci_engine::ProcessEngine;

const PLANES: [&str; CHANNELS] = [
    "white pawns",
    "white knights",
    "white bishops",
    "white rooks",
    "white queens",
    "white king",
    "black pawns",
    "black knights",
    "black bishops",
    "black rooks",
    "black queens",
    "black king",
    "white reach",
    "black reach",
];

#[derive(Args)]
pub struct InfoCommand {
    /// Position to inspect
    #[arg(long, value_name = "fen")]
    fen: String,

    /// If provided, the position is also scored by this ONNX network
    #[arg(long, value_name = "model")]
    model: Option<String>,

    /// If provided, the position is also searched by the engine at this depth
    #[arg(long, value_name = "engine-depth")]
    engine_depth: Option<usize>,

    #[clap(flatten)]
    engine: EngineArgs,
}

pub fn info(cmd: InfoCommand) -> Result<(), Box<dyn Error>> {
    let mut board = ChessBoard::from_fen(&cmd.fen)?;
    let tensor = encode(&mut board)?;

    print_planes(&tensor);

    let mut evaluator = make_evaluator(cmd.model.as_deref())?;
    println!(
        "{}: {:.4}",
        if cmd.model.is_some() { "Network" } else { "Material" },
        evaluator.evaluate(&mut board)?
    );

    if let Some(depth) = cmd.engine_depth {
        let mut engine = ProcessEngine::spawn(&cmd.engine.config(depth))?;
        let result = engine.evaluate_position(&board.fen())?;

        match result.score {
            Some(score) => println!("Engine: {:?} (white)", score.white(board.turn())),
            None => println!("Engine: no score"),
        }
        if let Some(best_move) = result.best_move {
            println!("Best move: {}", best_move);
        }
    }

    Ok(())
}

fn print_planes(tensor: &PositionTensor) {
    for (channel, name) in PLANES.iter().enumerate() {
        let marker = if channel == WHITE_REACH || channel == BLACK_REACH {
            '*'
        } else {
            'x'
        };

        println!("{:>2} {}", channel, name);
        for row in 0..8 {
            let line: String = (0..8)
                .map(|col| {
                    if tensor[[channel, row, col]] > 0.0 {
                        marker
                    } else {
                        '.'
                    }
                })
                .collect();
            println!("   {} {}", 8 - row, line);
        }
        println!("     abcdefgh");
    }
}

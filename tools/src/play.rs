use crate::EngineArgs;
use clap::{Args, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use std::error::Error;
use supervised_chess::agents::{GreedyAgent, MinimaxAgent, RandomAgent};
use supervised_chess::core::{
    agent::Agent,
    error::GameError,
    evaluator::Evaluator,
    game::{Game, MatchOutcome},
    position::Position,
};
use supervised_chess::evaluators::material::MaterialEvaluator;
use supervised_chess::games::chess::ChessBoard;
use supervised_chess::uci_engine::{ProcessEngine, Score};
use tracing::info;

#[derive(Args)]
pub struct PlayCommand {
    /// Strategy of the player moving first
    #[arg(long, value_enum, default_value = "greedy")]
    first: Strategy,

    /// Strategy of the player moving second
    #[arg(long, value_enum, default_value = "random")]
    second: Strategy,

    /// Plies searched by the minimax strategy
    #[arg(long, value_name = "depth", default_value = "3")]
    depth: usize,

    /// ONNX scoring network (needs the `onnx` feature). Material count if not given.
    #[arg(long, value_name = "model")]
    model: Option<String>,

    /// Starting position, the initial position if not given
    #[arg(long, value_name = "fen")]
    fen: Option<String>,

    /// Number of games to play. Players are shuffled between games.
    #[arg(long, value_name = "games", default_value = "1")]
    games: usize,

    /// Games are stopped after this many plies
    #[arg(long, value_name = "max-plies", default_value = "300")]
    max_plies: usize,

    /// Prints the engine evaluation after every move, searched at this depth
    #[arg(long, value_name = "eval-depth")]
    eval_depth: Option<usize>,

    #[clap(flatten)]
    engine: EngineArgs,

    /// Seed for the random strategy and the player shuffle
    #[arg(long, value_name = "seed")]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Strategy {
    Random,
    Greedy,
    Minimax,
}

/// The network if one was given, material count otherwise
pub fn make_evaluator(
    model: Option<&str>,
) -> Result<Box<dyn Evaluator<ChessBoard>>, Box<dyn Error>> {
    match model {
        #[cfg(feature = "onnx")]
        Some(path) => {
            use supervised_chess::evaluators::network::NetworkEvaluator;
            use supervised_chess::nn::model::OnnxModel;

            Ok(Box::new(NetworkEvaluator::new(OnnxModel::load(path)?)))
        }
        #[cfg(not(feature = "onnx"))]
        Some(path) => Err(format!("cannot load {}: built without the onnx feature", path).into()),
        None => Ok(Box::new(MaterialEvaluator)),
    }
}

fn make_agent(
    strategy: Strategy,
    cmd: &PlayCommand,
    rng_seed: Option<u64>,
) -> Result<Box<dyn Agent<ChessBoard>>, Box<dyn Error>> {
    let agent: Box<dyn Agent<ChessBoard>> = match strategy {
        Strategy::Random => Box::new(match rng_seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        }),
        Strategy::Greedy => Box::new(GreedyAgent::new(make_evaluator(cmd.model.as_deref())?)),
        Strategy::Minimax => Box::new(MinimaxAgent::new(
            make_evaluator(cmd.model.as_deref())?,
            cmd.depth,
        )),
    };

    Ok(agent)
}

pub fn play(cmd: PlayCommand) -> Result<(), Box<dyn Error>> {
    let board = match &cmd.fen {
        Some(fen) => ChessBoard::from_fen(fen)?,
        None => ChessBoard::default(),
    };

    let mut rng = match cmd.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let first = make_agent(cmd.first, &cmd, cmd.seed)?;
    let second = make_agent(cmd.second, &cmd, cmd.seed.map(|s| s + 1))?;
    let mut game = Game::new(board, first, second);

    let mut engine = match cmd.eval_depth {
        Some(depth) => Some(ProcessEngine::spawn(&cmd.engine.config(depth))?),
        None => None,
    };

    for i in 0..cmd.games {
        if i > 0 {
            game.reset(&mut rng);
        }

        let (first, second) = game.player_names();
        println!("Game {}: {} vs {}", i + 1, first, second);
        let (first, second) = (first.to_string(), second.to_string());

        for _ in 0..cmd.max_plies {
            match game.play_turn() {
                Ok(_) => {}
                Err(GameError::GameOver(_)) => break,
                Err(err) => return Err(err.into()),
            }

            let san = game.san_moves();
            let last = san.rsplit(' ').next().unwrap_or_default();

            match &mut engine {
                Some(engine) => {
                    let position = game.position();
                    let score = engine
                        .evaluate_position(&position.fen())?
                        .score
                        .map(|score| score.white(position.turn()));
                    println!("{:>4} {:<8} {}", game.cursor(), last, format_score(score));
                }
                None => println!("{:>4} {}", game.cursor(), last),
            }
        }

        println!("{}", game.san_moves());

        let outcome = game.outcome();
        let result = match outcome {
            MatchOutcome::WinFirst => format!("{} wins", first),
            MatchOutcome::WinSecond => format!("{} wins", second),
            MatchOutcome::Draw => "draw".to_string(),
            MatchOutcome::Unfinished => format!("unfinished after {} plies", game.cursor()),
        };
        println!("Result: {}", result);
        info!(game = i + 1, ?outcome, plies = game.cursor(), "game over");
    }

    Ok(())
}

/// Engine score from White's point of view, in pawns
fn format_score(score: Option<Score>) -> String {
    match score {
        Some(Score::Cp(cp)) => format!("{:+.2}", cp as f32 / 100.0),
        Some(Score::Mate(n)) => format!("#{}", n),
        None => "-".to_string(),
    }
}

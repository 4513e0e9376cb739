use crate::game_visitor::{GameVisitor, VisitorConfig};
use crate::EngineArgs;
use clap::{Args, Subcommand};
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use pgn_reader::BufferedReader;
use rand::{rngs::StdRng, SeedableRng};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use supervised_chess::dataset::{label, random_board, write_sample, Sample, DEFAULT_MAX_PLIES};
use supervised_chess::games::chess::ChessBoard;
use supervised_chess::uci_engine::ProcessEngine;
use tracing::info;
use zstd::Encoder;

#[derive(Args)]
pub struct BuildDatasetCommand {
    /// Output .csv (or csv.zst) file to write the samples
    #[arg(long, value_name = "output")]
    output: String,

    /// Whether to compress the output CSV with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Engine used to label the positions
    #[clap(flatten)]
    engine: EngineArgs,

    /// Where the positions come from
    #[command(subcommand)]
    source: SourceSubcommand,
}

#[derive(Subcommand)]
pub enum SourceSubcommand {
    /// Positions reached by playing random moves from the initial position
    Random(RandomArgs),
    /// White-to-move positions of the games of a PGN file
    Pgn(PgnArgs),
}

#[derive(Args)]
pub struct RandomArgs {
    /// Number of samples to write
    #[arg(long, value_name = "samples")]
    samples: usize,

    /// Search depth of the engine
    #[arg(long, value_name = "depth", default_value = "4")]
    depth: usize,

    /// Random plies are drawn from [0, max-plies)
    #[arg(long, value_name = "max-plies", default_value_t = DEFAULT_MAX_PLIES)]
    max_plies: usize,

    /// Seed of the random generator
    #[arg(long, value_name = "seed")]
    seed: Option<u64>,
}

#[derive(Args)]
pub struct PgnArgs {
    /// Path or URL of a .pgn or .pgn.zst file to read games
    #[arg(long, value_name = "input")]
    input: String,

    /// Search depth of the engine
    #[arg(long, value_name = "depth", default_value = "10")]
    depth: usize,

    /// Stop after writing this many samples
    #[arg(long, value_name = "max-samples")]
    max_samples: Option<usize>,

    /// Game visitor configuration
    #[clap(flatten)]
    visitor_config: VisitorConfig,
}

pub fn build_dataset(cmd: BuildDatasetCommand) -> Result<(), Box<dyn Error>> {
    // compress output if asked
    let output_file = File::create(cmd.output.clone())?;
    let mut writer: Box<dyn Write> = if cmd.compress {
        // the encoder is buffered internally
        Box::new(Encoder::new(output_file, 3)?.auto_finish())
    } else {
        Box::new(BufWriter::new(output_file))
    };

    println!("Output: {}", cmd.output);
    println!("Write compressed: {}", cmd.compress);

    let count = match cmd.source {
        SourceSubcommand::Random(args) => from_random_boards(&cmd.engine, args, &mut writer)?,
        SourceSubcommand::Pgn(args) => from_pgn(&cmd.engine, args, &mut writer)?,
    };
    writer.flush()?;

    println!("Done. Samples written: {}", count);

    Ok(())
}

fn from_random_boards(
    engine: &EngineArgs,
    args: RandomArgs,
    writer: &mut dyn Write,
) -> Result<usize, Box<dyn Error>> {
    let mut engine = ProcessEngine::spawn(&engine.config(args.depth))?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let bar = ProgressBar::new(args.samples as u64).with_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [Elapsed {elapsed_precise}] (ETA {eta}) [{bar:.cyan/blue}] {human_pos}/{human_len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut count = 0;
    let mut skipped = 0;

    while count < args.samples {
        let board = random_board(&mut rng, args.max_plies);

        match label(&mut engine, &board)? {
            Some(score) => {
                write_sample(
                    writer,
                    &Sample {
                        fen: board.fen(),
                        score,
                    },
                )?;
                count += 1;
                bar.inc(1);
            }
            None => {
                skipped += 1;
                bar.set_message(format!("[Skipped {}]", HumanCount(skipped)));
            }
        }
    }
    bar.finish();

    info!(count, skipped, "random dataset done");

    Ok(count)
}

fn from_pgn(
    engine: &EngineArgs,
    args: PgnArgs,
    writer: &mut dyn Write,
) -> Result<usize, Box<dyn Error>> {
    // raw data stream (may be compressed)
    let raw_reader: Box<dyn io::Read> = if args.input.starts_with("http") {
        Box::new(reqwest::blocking::get(args.input.clone())?)
    } else {
        Box::new(File::open(&args.input)?)
    };

    // decompress if necessary
    let reader: Box<dyn io::Read> = if args.input.ends_with(".zst") {
        Box::new(zstd::Decoder::new(raw_reader)?)
    } else {
        raw_reader
    };

    println!("Input: {}", args.input);

    let mut engine = ProcessEngine::spawn(&engine.config(args.depth))?;
    let mut visitor = GameVisitor::new(args.visitor_config);
    let mut game_reader = BufferedReader::new(reader);
    let max_samples = args.max_samples.unwrap_or(usize::MAX);
    let mut count = 0;

    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::default_spinner().template(
            "{spinner:.green} [Elapsed {elapsed_precise}] [Games {human_pos} @ {per_sec}] {msg}",
        )?,
    );

    'games: while let Some(game) = game_reader.read_game(&mut visitor)? {
        bar.inc(1);

        let Some(positions) = game else {
            continue;
        };

        for position in positions {
            let board = ChessBoard::new(position);

            // positions the engine can only score as a mate are left out
            if let Some(score) = label(&mut engine, &board)? {
                write_sample(
                    writer,
                    &Sample {
                        fen: board.fen(),
                        score,
                    },
                )?;

                count += 1;
                bar.set_message(format!("[Samples {}]", HumanCount(count as u64)));

                if count >= max_samples {
                    break 'games;
                }
            }
        }
    }
    bar.finish();

    info!(count, games = bar.position(), "pgn dataset done");

    Ok(count)
}

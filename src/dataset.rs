//! Labelled positions for training a scoring network.
//!
//! Samples are stored one per line as `fen,score`, the score being the
//! engine's centipawn evaluation from White's point of view.

use crate::core::{error::EncodingError, position::Position};
use crate::games::chess::ChessBoard;
use crate::nn::encoding::{encode_fen, CHANNELS};
use crate::uci_engine::{EngineError, UciEngine};
use ndarray::{s, Array1, Array4};
use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Default bound on the number of random plies of a random board
pub const DEFAULT_MAX_PLIES: usize = 400;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("malformed sample on line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A position and its centipawn score (White's point of view)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub fen: String,
    pub score: i32,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.fen, self.score)
    }
}

impl FromStr for Sample {
    type Err = ();

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (fen, score) = line.trim().rsplit_once(',').ok_or(())?;
        Ok(Sample {
            fen: fen.to_string(),
            score: score.trim().parse().map_err(|_| ())?,
        })
    }
}

pub fn write_sample<W: Write + ?Sized>(writer: &mut W, sample: &Sample) -> io::Result<()> {
    writeln!(writer, "{}", sample)
}

/// Reads `fen,score` lines, blank lines are skipped
pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<Sample>, SampleError> {
    let mut samples = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let sample = line.parse::<Sample>().map_err(|_| SampleError::Malformed {
            line: index + 1,
            content: line.clone(),
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Maps scores into [0, 1]: `y / max|y| / 2 + 0.5`.
/// 0 stays at 0.5 and the largest magnitude lands on 0 or 1.
pub fn normalize_labels(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().fold(0.0_f32, |max, y| max.max(y.abs()));
    if max == 0.0 {
        return vec![0.5; scores.len()];
    }

    scores.iter().map(|y| y / max / 2.0 + 0.5).collect()
}

/// Encodes samples into a batch of inputs (n, 14, 8, 8) and normalized labels (n)
pub fn to_tensors(samples: &[Sample]) -> Result<(Array4<f32>, Array1<f32>), EncodingError> {
    let mut inputs = Array4::zeros((samples.len(), CHANNELS, 8, 8));

    for (i, sample) in samples.iter().enumerate() {
        inputs.slice_mut(s![i, .., .., ..]).assign(&encode_fen(&sample.fen)?);
    }

    let scores: Vec<f32> = samples.iter().map(|s| s.score as f32).collect();
    Ok((inputs, Array1::from(normalize_labels(&scores))))
}

/// Plays a random number of random plies in `[0, max_plies)` from the initial
/// position, stopping early if the game ends
pub fn random_board<R: Rng + ?Sized>(rng: &mut R, max_plies: usize) -> ChessBoard {
    let mut board = ChessBoard::default();
    let plies = if max_plies == 0 {
        0
    } else {
        rng.gen_range(0..max_plies)
    };

    for _ in 0..plies {
        if board.is_terminal() {
            break;
        }

        let Some(mov) = board.valid_actions().choose(rng).cloned() else {
            break;
        };
        board.push(&mov);
    }

    board
}

/// Centipawn score of the board from White's point of view.
/// None if the engine reports a mate or no score at all.
pub fn label<R: BufRead, W: Write>(
    engine: &mut UciEngine<R, W>,
    board: &ChessBoard,
) -> Result<Option<i32>, EngineError> {
    let result = engine.evaluate_position(&board.fen())?;
    Ok(result
        .score
        .and_then(|score| score.white(board.turn()).centipawns()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn sample_lines() {
        let sample: Sample = format!("{},-35", START).parse().unwrap();
        assert_eq!(sample.fen, START);
        assert_eq!(sample.score, -35);
        assert_eq!(sample.to_string(), format!("{},-35", START));
        assert!("no score here".parse::<Sample>().is_err());
    }

    #[test]
    fn read_samples_reports_line() {
        let input = format!("{},12\n\n{},abc\n", START, START);
        match read_samples(Cursor::new(input)) {
            Err(SampleError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn normalization() {
        assert_eq!(
            normalize_labels(&[-200.0, 0.0, 100.0, 200.0]),
            vec![0.0, 0.5, 0.75, 1.0]
        );
        assert_eq!(normalize_labels(&[0.0, 0.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn tensors_from_samples() {
        let samples = vec![
            Sample {
                fen: START.to_string(),
                score: 20,
            },
            Sample {
                fen: "4k3/8/8/8/8/8/8/3QK3 b - - 0 1".to_string(),
                score: 900,
            },
        ];

        let (inputs, labels) = to_tensors(&samples).unwrap();
        assert_eq!(inputs.shape(), &[2, CHANNELS, 8, 8]);
        assert_eq!(labels[1], 1.0);
        // white queen on d1
        assert_eq!(inputs[[1, 4, 7, 3]], 1.0);
    }

    #[test]
    fn random_boards_are_playable() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let board = random_board(&mut rng, 60);
            assert!(board.moves().len() < 60);
            assert!(ChessBoard::from_fen(&board.fen()).is_ok());
        }

        assert!(random_board(&mut rng, 0).moves().is_empty());
    }

    #[test]
    fn mates_are_not_labelled() {
        let mut engine = UciEngine::from_io(
            Cursor::new(b"info depth 4 score mate 2 pv d1h5\nbestmove d1h5\n".to_vec()),
            Vec::new(),
            4,
        );
        assert_eq!(label(&mut engine, &ChessBoard::default()).unwrap(), None);

        let mut engine = UciEngine::from_io(
            Cursor::new(b"info depth 4 score cp 25 pv e7e5\nbestmove e7e5\n".to_vec()),
            Vec::new(),
            4,
        );
        let board = ChessBoard::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(label(&mut engine, &board).unwrap(), Some(-25));
    }
}

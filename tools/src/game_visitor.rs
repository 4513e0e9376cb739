use clap::Args;
use pgn_reader::{RawHeader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Color, Position};

#[derive(Args, Clone)]
pub struct VisitorConfig {
    /// Only accept positions that are at least this many plies deep
    #[arg(long, value_name = "min-ply", default_value = "0")]
    pub min_ply: usize,

    /// Only accept games where both player have at least this elo
    #[arg(long, value_name = "min-elo")]
    pub min_elo: Option<usize>,

    /// Skip games shorter than this many plies
    #[arg(long, value_name = "min-length", default_value = "0")]
    pub min_length: usize,

    /// Only accept games with a normal termination (no Abandoned, Time forfeit...)
    #[arg(long, default_value = "false")]
    pub normal_only: bool,
}

/// Collects the positions of the mainline of each game where White is to move
pub struct GameVisitor {
    // Configuration
    config: VisitorConfig,

    /// All positions for the current game
    positions: Vec<Chess>,

    // information about the current game
    termination: String,
    white_elo: usize,
    black_elo: usize,
    /// A move could not be played, the game is discarded
    broken: bool,
}

impl GameVisitor {
    pub fn new(config: VisitorConfig) -> Self {
        GameVisitor {
            config,

            positions: vec![Chess::default()], // start pos

            termination: "".to_string(),
            white_elo: 0,
            black_elo: 0,
            broken: false,
        }
    }
}

impl Visitor for GameVisitor {
    type Result = Option<Vec<Chess>>;

    fn begin_game(&mut self) {
        self.termination = "".to_string();
        self.white_elo = 0;
        self.black_elo = 0;
        self.broken = false;
        self.positions.truncate(1); // only keep starting board
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(key);
        let value = String::from_utf8_lossy(value.as_bytes());

        if key == "Termination" {
            self.termination = value.to_string();
        } else if key == "BlackElo" {
            self.black_elo = value.parse().unwrap_or(0);
        } else if key == "WhiteElo" {
            self.white_elo = value.parse().unwrap_or(0);
        }
    }

    fn end_headers(&mut self) -> Skip {
        let min_elo = self.config.min_elo.unwrap_or(0);

        let keep =
            // normal terminations (excl. Abandoned, Time forfeit, Rules infraction)
            (!self.config.normal_only || self.termination == "Normal") &&
            // keep games with good elo
            self.white_elo >= min_elo &&
            self.black_elo >= min_elo;

        Skip(!keep)
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        if self.broken {
            return;
        }

        let Some(pos) = self.positions.last() else {
            return;
        };

        match san_plus.san.to_move(pos) {
            Ok(mov) => {
                let mut next = pos.clone();
                next.play_unchecked(&mov);
                self.positions.push(next);
            }
            Err(_) => self.broken = true,
        }
    }

    fn end_game(&mut self) -> Self::Result {
        // note: skipped games go through here too
        if self.broken || self.positions.len() <= self.config.min_length {
            return None;
        }

        let positions: Vec<Chess> = self
            .positions
            .iter()
            .enumerate()
            // positions after a move, the starting one is not a sample
            .skip(self.config.min_ply.max(1))
            .filter(|(_, pos)| pos.turn() == Color::White)
            .map(|(_, pos)| pos.clone())
            .collect();

        if positions.is_empty() {
            // no feasible positions
            return None;
        }

        Some(positions)
    }
}

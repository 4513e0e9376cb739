use shakmaty::Color;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, trace};
use vampirc_uci::{parse_one, UciInfoAttribute, UciMessage};

/// Centipawn value given to a forced mate
pub const MATE_SCORE: i32 = 10_000;

/// Score of a position, given by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn
    Cp(i32),

    /// Mate/Mated in n
    Mate(i32),
}

impl Score {
    /// Converts a score relative to the side to move into a score from
    /// White's point of view
    pub fn white(self, turn: Color) -> Score {
        match (self, turn) {
            (score, Color::White) => score,
            (Score::Cp(cp), Color::Black) => Score::Cp(-cp),
            (Score::Mate(n), Color::Black) => Score::Mate(-n),
        }
    }

    /// The centipawn value, if the score is not a mate
    pub fn centipawns(self) -> Option<i32> {
        match self {
            Score::Cp(cp) => Some(cp),
            Score::Mate(_) => None,
        }
    }

    /// The centipawn value, mates mapped to +/- `MATE_SCORE`.
    /// Shorter mates score higher.
    pub fn to_centipawns(self) -> i32 {
        match self {
            Score::Cp(cp) => cp,
            Score::Mate(n) if n > 0 => MATE_SCORE - n,
            Score::Mate(n) => -MATE_SCORE - n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    /// Last score reported, relative to the side to move. None if the engine
    /// did not report any.
    pub score: Option<Score>,
    /// Best move in UCI notation. None if the engine reported `(none)`.
    pub best_move: Option<String>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine {binary}: {source}")]
    Spawn { binary: String, source: io::Error },

    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("engine closed its output")]
    Closed,
}

/// How to start and configure the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path of the engine binary
    pub binary: String,
    /// Target depth for every search
    pub depth: usize,
    /// Value of the `Threads` option
    pub threads: usize,
    /// Value of the `Hash` option, in MB
    pub hash_mb: usize,
}

impl EngineConfig {
    pub fn new(binary: &str, depth: usize) -> Self {
        EngineConfig {
            binary: binary.to_string(),
            depth,
            threads: 2,
            hash_mb: 2048,
        }
    }
}

/// Time an engine gets to exit after `quit` before it is killed
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// An engine running as a child process
pub type ProcessEngine = UciEngine<BufReader<ChildStdout>, ChildStdin>;

/// Minimal UCI engine session.
/// https://www.wbec-ridderkerk.nl/html/UCIProtocol.html
///
/// The engine keeps a single current position (the session). Evaluating an
/// arbitrary position switches the engine to it and switches back before
/// returning, so one engine can be shared by code that relies on the session.
pub struct UciEngine<R, W: Write> {
    reader: R,
    writer: W,
    /// Child process, if we spawned it
    child: Option<Child>,
    /// Target depth for the search
    depth: usize,
    /// Session position, None for the initial position
    fen: Option<String>,
    /// Moves played on top of the session position
    moves: Vec<String>,
}

impl ProcessEngine {
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                binary: config.binary.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;

        let mut engine = UciEngine::from_io(BufReader::new(stdout), stdin, config.depth);
        engine.child = Some(child);
        engine.handshake(config)?;

        info!(
            binary = %config.binary,
            depth = config.depth,
            threads = config.threads,
            hash_mb = config.hash_mb,
            "engine ready"
        );

        Ok(engine)
    }
}

impl<R: BufRead, W: Write> UciEngine<R, W> {
    /// Wraps an already running engine. No handshake is performed.
    pub fn from_io(reader: R, writer: W, depth: usize) -> Self {
        UciEngine {
            reader,
            writer,
            child: None,
            depth,
            fen: None,
            moves: vec![],
        }
    }

    /// `uci`, engine options and `isready`
    pub fn handshake(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        self.send("uci")?;
        self.wait_for("uciok")?;
        self.send(&format!("setoption name Threads value {}", config.threads))?;
        self.send(&format!("setoption name Hash value {}", config.hash_mb))?;
        self.send("isready")?;
        self.wait_for("readyok")
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Sets the session position. None is the initial position.
    pub fn set_position(&mut self, fen: Option<&str>) -> Result<(), EngineError> {
        self.fen = fen.map(str::to_string);
        self.moves.clear();
        self.send_session()
    }

    /// Plays moves (UCI notation) on top of the session position
    pub fn make_moves(&mut self, moves: &[String]) -> Result<(), EngineError> {
        self.moves.extend_from_slice(moves);
        self.send_session()
    }

    /// Searches the session position
    pub fn evaluate_current(&mut self) -> Result<EngineResult, EngineError> {
        self.send_session()?;
        self.go()
    }

    /// Best move for the session position
    pub fn best_move(&mut self) -> Result<Option<String>, EngineError> {
        Ok(self.evaluate_current()?.best_move)
    }

    /// Searches the given position. The session position is restored
    /// afterwards, also when the search fails.
    pub fn evaluate_position(&mut self, fen: &str) -> Result<EngineResult, EngineError> {
        let result = self
            .send(&format!("position fen {}", fen))
            .and_then(|_| self.go());
        let restored = self.send_session();

        let result = result?;
        restored?;
        Ok(result)
    }

    fn session_command(&self) -> String {
        let mut command = match &self.fen {
            Some(fen) => format!("position fen {}", fen),
            None => "position startpos".to_string(),
        };

        if !self.moves.is_empty() {
            command.push_str(" moves ");
            command.push_str(&self.moves.join(" "));
        }

        command
    }

    fn send_session(&mut self) -> Result<(), EngineError> {
        let command = self.session_command();
        self.send(&command)
    }

    fn go(&mut self) -> Result<EngineResult, EngineError> {
        self.send(&format!("go depth {}", self.depth))?;

        // keep the last score until the search finishes
        let mut score = None;

        loop {
            let line = self.read_line()?;

            match parse_line(&line) {
                EngineLine::Score(s) => score = Some(s),
                EngineLine::BestMove(best_move) => {
                    debug!(?score, ?best_move, "search finished");
                    return Ok(EngineResult { score, best_move });
                }
                EngineLine::Other => {}
            }
        }
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        trace!("> {}", command);
        writeln!(self.writer, "{}", command)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(EngineError::Closed);
        }
        trace!("< {}", line.trim_end());
        Ok(line)
    }

    fn wait_for(&mut self, token: &str) -> Result<(), EngineError> {
        while self.read_line()?.trim() != token {}
        Ok(())
    }
}

impl<R, W: Write> Drop for UciEngine<R, W> {
    fn drop(&mut self) {
        let _ = writeln!(self.writer, "quit");
        let _ = self.writer.flush();

        if let Some(child) = &mut self.child {
            if let Err(err) = stop(child, QUIT_GRACE) {
                debug!(%err, "could not stop the engine");
            }
        }
    }
}

/// Waits up to `grace` for the child to exit, then kills it
fn stop(child: &mut Child, grace: Duration) -> io::Result<()> {
    let deadline = Instant::now() + grace;

    while Instant::now() < deadline {
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(10));
    }

    debug!("engine ignored quit, killing it");
    child.kill()?;
    child.wait().map(|_| ())
}

/// What a line of engine output means to us
#[derive(Debug, PartialEq, Eq)]
enum EngineLine {
    Score(Score),
    BestMove(Option<String>),
    Other,
}

fn parse_line(line: &str) -> EngineLine {
    let line = line.trim();

    match parse_one(line) {
        UciMessage::Info(attributes) => attributes
            .into_iter()
            .find_map(|attribute| match attribute {
                UciInfoAttribute::Score { cp, mate, .. } => cp
                    .map(|cp| Score::Cp(cp as i32))
                    .or_else(|| mate.map(|n| Score::Mate(n as i32))),
                _ => None,
            })
            .map_or(EngineLine::Other, EngineLine::Score),
        UciMessage::BestMove { best_move, .. } => EngineLine::BestMove(Some(best_move.to_string())),
        // `bestmove (none)` when there is nothing to play
        _ if line.starts_with("bestmove") => EngineLine::BestMove(None),
        _ => EngineLine::Other,
    }
}

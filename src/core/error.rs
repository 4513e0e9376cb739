use crate::uci_engine::EngineError;
use shakmaty::Outcome;
use thiserror::Error;

/// A board could not be set up
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// The board could not be turned into a tensor
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("rules oracle refused the position: {0}")]
    Oracle(String),
}

/// A scorer could not produce a score
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The scorer had no opinion on the position (e.g. the engine reported no score)
    #[error("scorer unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("model error: {0}")]
    Model(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// Search was started on a position without legal moves
    #[error("no legal move in the position")]
    NoLegalMove,

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("the game is over ({0:?})")]
    GameOver(Outcome),

    /// The strategy proposed a move the rules reject
    #[error("illegal move proposed by {player}: {action}")]
    IllegalMove { player: String, action: String },

    #[error(transparent)]
    Search(#[from] SearchError),
}

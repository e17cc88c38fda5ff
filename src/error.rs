//! Error types for book loading, lookup, play and analysis

use derive_more::{Display, Error, From};

use crate::board::Action;
use crate::search::SearchCancelled;

/// Opening-book file could not be used
#[derive(Debug, Display, Error, From)]
pub enum BookError {
    #[display("cannot read opening book: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("opening book must be {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[display("symmetry {index} is not a region-preserving permutation of the board")]
    InvalidSymmetry { index: usize },
    #[display("evaluation record {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: &'static str },
}

/// Position has no answer in the opening book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum LookupError {
    #[display("no opening-book entry matches this position (depth {depth})")]
    NoMatch { depth: u8 },
    #[display("depth {depth} is beyond the opening book")]
    TooDeep { depth: u8 },
    #[display("move history ({moves} moves) does not describe a position at depth {depth}")]
    HistoryMismatch { moves: usize, depth: u8 },
}

/// A move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlayError {
    #[display("illegal move {action}")]
    Illegal { action: Action },
    #[display("game is already over")]
    GameOver,
}

/// Evaluation failed
#[derive(Debug, Display, Error, From)]
pub enum AnalyzeError {
    #[display("game is already over")]
    GameOver,
    #[display("opening book lookup failed: {_0}")]
    #[from]
    Lookup(LookupError),
    #[display("{_0}")]
    #[from]
    Book(BookError),
    #[display("evaluation cancelled at the time limit")]
    #[from]
    Cancelled(SearchCancelled),
    #[display("cannot build search thread pool: {_0}")]
    #[from]
    ThreadPool(rayon::ThreadPoolBuildError),
}

/// Configuration file could not be used
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    #[display("cannot read config file: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("invalid config: {_0}")]
    #[from]
    Parse(toml::de::Error),
}

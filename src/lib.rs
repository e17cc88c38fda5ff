//! Quantik solver and opening-book analyzer
//!
//! Quantik is played on a 4x4 board split into four 2x2 quadrants. Each
//! player owns two pieces of each of four shapes and places one per turn:
//! - A piece may not share a row, column or quadrant with an opponent piece
//!   of the same shape
//! - Placing the fourth distinct shape into a row, column or quadrant wins
//! - A player with no legal placement on their turn loses
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - [`board`]: Positions, actions and the dense action encoding
//! - [`rules`]: Placement legality and region completion
//! - [`search`]: Exact minimax and forced-sequence analysis
//! - [`book`]: Symmetry-compressed opening book
//! - [`engine`]: Analysis session integrating all components
//!
//! # Quick Start
//!
//! ```
//! use quantik::board::{Action, Player, Pos, Shape};
//! use quantik::Analyzer;
//!
//! let mut analyzer = Analyzer::new();
//! for text in ["000", "011", "022"] {
//!     analyzer.play(text.parse().unwrap()).unwrap();
//! }
//!
//! // A sphere at (0, 3) completes row 0 for the second player
//! let report = analyzer.solve();
//! assert_eq!(report.winner, Player::Second);
//! let winning = Action::new(Pos::new(0, 3), Shape::Sphere);
//! assert!(analyzer.play(winning).unwrap().is_over());
//! ```

pub mod board;
pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Action, Board, Outcome, Player, Pos, Position, Shape};
pub use book::OpeningBook;
pub use config::AnalyzerConfig;
pub use engine::{ActionEvaluation, Analyzer, EvalSource, GameStatus};
pub use error::{AnalyzeError, BookError, ConfigError, LookupError, PlayError};

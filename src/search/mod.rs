//! Search module for the Quantik solver
//!
//! Contains:
//! - Exact minimax solve with node counting and cooperative cancellation
//! - Longest-forced-sequence analysis for lost positions

pub mod minimax;
pub mod stall;

pub use minimax::{
    solve, solve_instrumented, solve_interruptible, Interrupt, SearchCancelled, SearchStats, SolveReport,
    Uninterrupted,
};
pub use stall::{longest_forced_sequence, DepthMode, StallReport};

//! Command-line interface for the quantik analyzer.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use quantik::board::Action;
use quantik::search::DepthMode;

/// Quantik - exact solver and opening-book analyzer
#[derive(Parser, Debug)]
#[command(name = "quantik")]
#[command(about = "Exact solver and opening-book analyzer for Quantik", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Opening book file (overrides the config)
    #[arg(long, global = true)]
    pub book: Option<PathBuf>,

    /// Search threads: 1 sequential, 0 all cores (overrides the config)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Stop evaluating after this many milliseconds (overrides the config)
    #[arg(long, global = true)]
    pub time_limit_ms: Option<u64>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands. Each takes moves as `RCS` digits (row, column,
/// zero-based shape), played from the empty board.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the board, supplies, move history and game status
    Board {
        /// Moves to play first
        moves: Vec<Action>,
    },

    /// Show the valid-action grid for the side to move
    Legal {
        /// Moves to play first
        moves: Vec<Action>,
    },

    /// Show the win/loss grid for every action of the side to move
    Evaluate {
        /// Moves to play first
        moves: Vec<Action>,
    },

    /// Solve the position exactly
    Solve {
        /// Moves to play first
        moves: Vec<Action>,
    },

    /// Longest sequence the first player can force before losing
    Stall {
        /// Count plies from the game start or from this position
        #[arg(long, value_enum)]
        mode: Option<DepthMode>,

        /// Moves to play first
        moves: Vec<Action>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves_and_globals() {
        let cli = Cli::try_parse_from(["quantik", "evaluate", "--threads", "0", "000", "011", "-vv"]).unwrap();
        assert_eq!(cli.threads, Some(0));
        assert_eq!(cli.verbose, 2);
        let Command::Evaluate { moves } = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(moves, vec!["000".parse::<Action>().unwrap(), "011".parse().unwrap()]);
    }

    #[test]
    fn test_parse_stall_mode() {
        let cli = Cli::try_parse_from(["quantik", "stall", "--mode", "from-root", "000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Stall {
                mode: Some(DepthMode::FromRoot),
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_stall_mode() {
        assert!(Cli::try_parse_from(["quantik", "stall", "--mode", "relative"]).is_err());
    }

    #[test]
    fn test_rejects_bad_move() {
        assert!(Cli::try_parse_from(["quantik", "board", "004"]).is_err());
        assert!(Cli::try_parse_from(["quantik", "board", "00"]).is_err());
    }
}

//! Exact minimax solver
//!
//! Quantik games last at most 16 plies, so the full tree is searched with no
//! evaluation function and no depth limit. A node's value is simply the
//! winning player.
//!
//! At each node, with `mover` to play:
//! 1. `mover` has no legal action: the opponent wins (starvation)
//! 2. some legal action completes a region: `mover` wins
//! 3. otherwise each legal action is played in code order and searched; the
//!    first child won by `mover` decides the node, and if none is, the
//!    opponent wins
//!
//! # Example
//!
//! ```
//! use quantik::board::{Player, Pos, Position, Shape, Tile};
//! use quantik::search::solve;
//!
//! // Second player completes row 0 with a sphere
//! let position = Position::from_tiles(&[
//!     (Pos::new(0, 0), Tile::new(Player::First, Shape::Cube)),
//!     (Pos::new(0, 1), Tile::new(Player::Second, Shape::Cylinder)),
//!     (Pos::new(0, 2), Tile::new(Player::First, Shape::Cone)),
//! ])
//! .unwrap();
//! assert_eq!(solve(&position), Player::Second);
//! ```

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_more::{Display, Error};

use crate::board::{Playable, Player, Position};
use crate::rules::{completes_region, legal_actions};

/// Neither a completion nor starvation can happen before this many plies:
/// a region needs four tiles, and every player has moves early on.
const MIN_TERMINAL_DEPTH: u8 = 3;

/// Search statistics, threaded explicitly through the recursion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, root included
    pub nodes: u64,
}

/// Winner of a solved position plus search effort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveReport {
    pub winner: Player,
    pub nodes: u64,
}

/// The search was stopped before it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("search cancelled")]
pub struct SearchCancelled;

/// Polled between sibling moves, after the previous move has been undone.
pub trait Interrupt {
    type Error;

    fn check(&self) -> Result<(), Self::Error>;
}

/// Never interrupts
pub struct Uninterrupted;

impl Interrupt for Uninterrupted {
    type Error = Infallible;

    #[inline]
    fn check(&self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Global stop signal, set by another thread when time is up.
impl Interrupt for AtomicBool {
    type Error = SearchCancelled;

    #[inline]
    fn check(&self) -> Result<(), SearchCancelled> {
        if self.load(Ordering::Relaxed) {
            Err(SearchCancelled)
        } else {
            Ok(())
        }
    }
}

/// Winner under optimal play from `position`
pub fn solve(position: &Position) -> Player {
    solve_instrumented(position).winner
}

/// Like [`solve`], also reporting how many nodes were searched
pub fn solve_instrumented(position: &Position) -> SolveReport {
    match solve_with(position, &Uninterrupted) {
        Ok(report) => report,
        Err(never) => match never {},
    }
}

/// Like [`solve_instrumented`], giving up once `stop` is set.
///
/// `position` is borrowed immutably, so a cancelled search can never leave it
/// half-played.
pub fn solve_interruptible(position: &Position, stop: &AtomicBool) -> Result<SolveReport, SearchCancelled> {
    solve_with(position, stop)
}

fn solve_with<I: Interrupt>(position: &Position, interrupt: &I) -> Result<SolveReport, I::Error> {
    let mut scratch = position.clone();
    let mut stats = SearchStats::default();
    let winner = minimax(&mut scratch, &mut stats, interrupt)?;
    debug_assert_eq!(&scratch, position);
    Ok(SolveReport {
        winner,
        nodes: stats.nodes,
    })
}

fn minimax<N: Playable, I: Interrupt>(node: &mut N, stats: &mut SearchStats, interrupt: &I) -> Result<Player, I::Error> {
    stats.nodes += 1;

    let position = node.position();
    let mover = position.player();
    let depth = position.depth();
    let actions = legal_actions(position);

    if depth >= MIN_TERMINAL_DEPTH {
        if actions.is_empty() {
            return Ok(mover.opponent());
        }

        for &action in &actions {
            let child = node.play(action);
            if completes_region(&child, action) {
                return Ok(mover);
            }
        }
    }

    for &action in &actions {
        let winner = {
            let mut child = node.play(action);
            minimax(&mut child, stats, interrupt)?
        };
        if winner == mover {
            return Ok(mover);
        }
        interrupt.check()?;
    }

    Ok(mover.opponent())
}

//! Longest forced sequence
//!
//! When the second player has a forced win, how long can the first player
//! hold out? The first player maximizes the length of the game; the second
//! player minimizes it but only ever picks moves that keep its win.
//!
//! Terminal values, in plies:
//! - first player starved at ply `d`: `d`
//! - a region completed by the move at ply `d`: `d + 1`

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::board::{Playable, Player, Position, MAX_PLIES};
use crate::rules::{completes_region, has_legal_action, legal_actions};

use super::minimax::{solve_instrumented, SearchStats};

/// How [`longest_forced_sequence`] reports its length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum DepthMode {
    /// Plies counted from the start of the game
    #[default]
    Absolute,
    /// Plies counted from the analyzed position
    FromRoot,
}

/// Result of the forced-sequence analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallReport {
    /// Length of the game under best resistance, or `None` when the second
    /// player has no forced win from the position
    pub plies: Option<u8>,
    /// Every node visited, including the solver runs that confirm each
    /// forced win
    pub nodes: u64,
}

/// No forced win below this node
const NO_FORCED_WIN: u8 = u8::MAX;

/// Same reasoning as the solver: nothing terminal happens before ply 3
const MIN_TERMINAL_DEPTH: u8 = 3;

/// Length of the longest game the first player can force while the second
/// player still wins.
pub fn longest_forced_sequence(position: &Position, mode: DepthMode) -> StallReport {
    let root = solve_instrumented(position);
    let mut stats = SearchStats { nodes: root.nodes };
    if root.winner != Player::Second {
        return StallReport {
            plies: None,
            nodes: stats.nodes,
        };
    }

    let mut scratch = position.clone();
    let end = stall(&mut scratch, &mut stats);
    let plies = (end != NO_FORCED_WIN).then(|| match mode {
        DepthMode::Absolute => end,
        DepthMode::FromRoot => end - position.depth(),
    });

    StallReport {
        plies,
        nodes: stats.nodes,
    }
}

fn stall<N: Playable>(node: &mut N, stats: &mut SearchStats) -> u8 {
    stats.nodes += 1;

    match node.position().player() {
        Player::First => resist(node, stats),
        Player::Second => finish(node, stats),
    }
}

/// First player: pick the reply that keeps the game going longest
fn resist<N: Playable>(node: &mut N, stats: &mut SearchStats) -> u8 {
    let position = node.position();
    let depth = position.depth();
    if depth >= MIN_TERMINAL_DEPTH && !has_legal_action(position) {
        return depth;
    }

    let mut longest = 0;
    for &action in &legal_actions(position) {
        let mut child = node.play(action);
        let value = if completes_region(&child, action) {
            depth + 1
        } else {
            stall(&mut child, stats)
        };
        longest = longest.max(value);
    }
    longest
}

/// Second player: win at once if possible, otherwise take the quickest
/// move that still wins
fn finish<N: Playable>(node: &mut N, stats: &mut SearchStats) -> u8 {
    let depth = node.position().depth();
    let actions = legal_actions(node.position());

    for &action in &actions {
        let child = node.play(action);
        if completes_region(&child, action) {
            return depth + 1;
        }
    }

    let mut shortest = NO_FORCED_WIN;
    for &action in &actions {
        let mut child = node.play(action);
        let report = solve_instrumented(&child);
        stats.nodes += report.nodes;
        if report.winner != Player::Second {
            continue;
        }
        shortest = shortest.min(stall(&mut child, stats));
    }
    debug_assert!(shortest == NO_FORCED_WIN || shortest <= MAX_PLIES);
    shortest
}

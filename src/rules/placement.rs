//! Placement legality
//!
//! A placement is legal when all of these hold:
//! 1. The mover still has a piece of that shape
//! 2. The target cell is empty
//! 3. No opponent piece of the same shape sits in the cell's row, column or quadrant
//!
//! The mover's own pieces never block a placement.

use crate::board::{Action, ActionList, Bitboard, Position, ALL_ACTIONS};

/// Check whether the side to move may play `action`
#[inline]
pub fn is_legal(position: &Position, action: Action) -> bool {
    let mover = position.player();
    if position.supply(mover, action.shape) == 0 {
        return false;
    }

    let board = position.board();
    if !board.is_empty(action.pos) {
        return false;
    }

    !board
        .pieces(mover.opponent(), action.shape)
        .intersects(Bitboard::lines_through(action.pos))
}

/// All legal actions for the side to move, in code order
pub fn legal_actions(position: &Position) -> ActionList {
    let mut list = ActionList::new();
    for action in ALL_ACTIONS {
        if is_legal(position, action) {
            list.push(action);
        }
    }
    list
}

/// Whether the side to move has any placement at all. `false` means the
/// mover is starved and loses.
#[inline]
pub fn has_legal_action(position: &Position) -> bool {
    ALL_ACTIONS.iter().any(|&action| is_legal(position, action))
}

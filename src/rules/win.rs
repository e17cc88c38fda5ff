//! Win condition checking
//!
//! A region (row, column or quadrant) is complete when its four cells are
//! occupied and hold four different shapes. Who owns the pieces does not
//! matter: the player who places the completing piece wins.

use crate::board::{Action, Board, Position, Region, Shape};

/// Check if `region` is complete on `board`
#[inline]
pub fn is_region_complete(board: &Board, region: Region) -> bool {
    let mask = region.mask();
    if !board.occupied().contains(mask) {
        return false;
    }
    // Four occupied cells and four shapes: complete iff each shape appears once
    Shape::ALL
        .iter()
        .all(|&shape| (board.shape_cells(shape) & mask).count() == 1)
}

/// Fast completion check after `action` has been applied.
///
/// Only the row, column and quadrant through the action's cell are tested,
/// the first complete one short-circuits.
#[inline]
pub fn completes_region(position: &Position, action: Action) -> bool {
    Region::containing(action.pos)
        .into_iter()
        .any(|region| is_region_complete(position.board(), region))
}

/// Every complete region on the board. Full scan; not used by search.
pub fn completed_regions(board: &Board) -> Vec<Region> {
    Region::ALL
        .into_iter()
        .filter(|&region| is_region_complete(board, region))
        .collect()
}

//! Rows, columns and quadrants: the twelve regions a player can complete

use super::{Bitboard, Pos};

/// A winning region. Completing any one of them ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Row(u8),
    Column(u8),
    /// 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right
    Quadrant(u8),
}

impl Region {
    pub const ALL: [Region; 12] = [
        Region::Row(0),
        Region::Row(1),
        Region::Row(2),
        Region::Row(3),
        Region::Column(0),
        Region::Column(1),
        Region::Column(2),
        Region::Column(3),
        Region::Quadrant(0),
        Region::Quadrant(1),
        Region::Quadrant(2),
        Region::Quadrant(3),
    ];

    /// Cells covered by this region
    #[inline]
    pub const fn mask(self) -> Bitboard {
        match self {
            Region::Row(r) => Bitboard::row(r),
            Region::Column(c) => Bitboard::col(c),
            Region::Quadrant(q) => Bitboard::quadrant(q),
        }
    }

    /// The three regions a cell belongs to, in the order the win check visits them
    #[inline]
    pub const fn containing(pos: Pos) -> [Region; 3] {
        [
            Region::Row(pos.row),
            Region::Column(pos.col),
            Region::Quadrant(pos.quadrant()),
        ]
    }

    /// Look up the region whose cells are exactly `mask`
    pub fn from_mask(mask: Bitboard) -> Option<Region> {
        Region::ALL.into_iter().find(|region| region.mask() == mask)
    }
}

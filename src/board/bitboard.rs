//! Bitboard implementation for fast region tests

use std::ops::{BitAnd, BitOr};

use super::{Pos, BOARD_SIZE, TOTAL_CELLS};

/// One bit per cell, bit `row * 4 + col`.
///
/// 16 cells fit a single `u16`, so every region test is one mask operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u16,
}

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard { bits: 0 };

    /// Create empty bitboard
    pub const fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Bitboard with a single cell set
    #[inline]
    pub const fn from_pos(pos: Pos) -> Self {
        Self {
            bits: 1u16 << pos.to_index(),
        }
    }

    /// All cells of one row
    #[inline]
    pub const fn row(row: u8) -> Self {
        Self {
            bits: 0x000F << (row as usize * BOARD_SIZE),
        }
    }

    /// All cells of one column
    #[inline]
    pub const fn col(col: u8) -> Self {
        Self {
            bits: 0x1111 << col,
        }
    }

    /// All cells of one 2x2 quadrant (0 top-left .. 3 bottom-right)
    #[inline]
    pub const fn quadrant(quadrant: u8) -> Self {
        let row_offset = (quadrant / 2) as usize * 2 * BOARD_SIZE;
        let col_offset = (quadrant % 2) as usize * 2;
        Self {
            bits: 0x0033 << (row_offset + col_offset),
        }
    }

    /// Union of the row, column and quadrant through `pos`
    #[inline]
    pub const fn lines_through(pos: Pos) -> Self {
        Self {
            bits: Self::row(pos.row).bits | Self::col(pos.col).bits | Self::quadrant(pos.quadrant()).bits,
        }
    }

    /// Set a bit at position
    #[inline]
    pub fn set(&mut self, pos: Pos) {
        self.bits |= 1u16 << pos.to_index();
    }

    /// Clear a bit at position
    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        self.bits &= !(1u16 << pos.to_index());
    }

    /// Check if bit is set at position
    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        (self.bits >> pos.to_index()) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn intersects(self, other: Bitboard) -> bool {
        self.bits & other.bits != 0
    }

    /// True when every bit of `other` is also set here
    #[inline]
    pub fn contains(self, other: Bitboard) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Iterate over set bit positions
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & rhs.bits)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | rhs.bits)
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u16,
}

impl Iterator for BitboardIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }

        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        debug_assert!(idx < TOTAL_CELLS);
        Some(Pos::from_index(idx))
    }
}

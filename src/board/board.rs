//! Board structure with per-shape occupancy tracking

use std::fmt;

use super::bitboard::Bitboard;
use super::{Player, Pos, Shape, Tile, BOARD_SIZE, NUM_SHAPES, TOTAL_CELLS};

/// 4x4 grid of tiles.
///
/// Cells are stored both as a flat array (for lookups by position) and as one
/// bitboard per `(owner, shape)` pair (for the blocking and completion tests).
/// The two views are kept in sync by [`Board::place`] and [`Board::remove`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Tile>; TOTAL_CELLS],
    /// `shapes[owner][shape]`
    shapes: [[Bitboard; NUM_SHAPES]; 2],
    occupied: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; TOTAL_CELLS],
            shapes: [[Bitboard::EMPTY; NUM_SHAPES]; 2],
            occupied: Bitboard::EMPTY,
        }
    }

    /// Get tile at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.cells[pos.to_index()]
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.occupied.get(pos)
    }

    /// Place a tile on an empty cell. No rule checks.
    #[inline]
    pub fn place(&mut self, pos: Pos, tile: Tile) {
        debug_assert!(self.is_empty(pos), "cell {:?} already occupied", pos);
        self.cells[pos.to_index()] = Some(tile);
        self.shapes[tile.owner.index()][tile.shape.index()].set(pos);
        self.occupied.set(pos);
    }

    /// Remove and return the tile at `pos`
    #[inline]
    pub fn remove(&mut self, pos: Pos) -> Option<Tile> {
        let tile = self.cells[pos.to_index()].take()?;
        self.shapes[tile.owner.index()][tile.shape.index()].clear(pos);
        self.occupied.clear(pos);
        Some(tile)
    }

    /// Cells holding `owner`'s pieces of `shape`
    #[inline]
    pub fn pieces(&self, owner: Player, shape: Shape) -> Bitboard {
        self.shapes[owner.index()][shape.index()]
    }

    /// Cells holding `shape` regardless of owner
    #[inline]
    pub fn shape_cells(&self, shape: Shape) -> Bitboard {
        self.pieces(Player::First, shape) | self.pieces(Player::Second, shape)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Total tiles on board
    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.occupied.count()
    }

    /// Iterate occupied cells with their tiles, in index order
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.occupied
            .iter_ones()
            .filter_map(move |pos| self.get(pos).map(|tile| (pos, tile)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Two characters per cell: `" ."` for empty, `" n"` for the first player's
/// shape `n` (zero-based) and `"*n"` for the second player's.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                match self.get(Pos::new(row, col)) {
                    None => write!(f, " .")?,
                    Some(Tile { owner: Player::First, shape }) => write!(f, " {}", shape.index())?,
                    Some(Tile { owner: Player::Second, shape }) => write!(f, "*{}", shape.index())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

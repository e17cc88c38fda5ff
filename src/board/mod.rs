//! Board representation for Quantik

pub mod action;
pub mod bitboard;
pub mod board;
pub mod position;
pub mod region;

#[cfg(test)]
mod tests;

// Re-exports
pub use action::{Action, ActionList, Evaluations, Outcome, ParseActionError, ALL_ACTIONS};
pub use bitboard::Bitboard;
pub use board::Board;
pub use position::{Playable, PlayedMove, Position, PositionError};
pub use region::Region;

/// Board side length (4x4)
pub const BOARD_SIZE: usize = 4;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 16

/// Number of distinct piece shapes
pub const NUM_SHAPES: usize = 4;
/// Copies of each shape a player starts with
pub const COPIES_PER_SHAPE: u8 = 2;
/// Size of the dense action space (4 shapes x 16 cells)
pub const NUM_ACTIONS: usize = NUM_SHAPES * TOTAL_CELLS; // 64
/// Longest possible game: every piece of both players placed
pub const MAX_PLIES: u8 = 2 * NUM_SHAPES as u8 * COPIES_PER_SHAPE; // 16

/// Player identity. `First` always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Get the other player
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// 0 for `First`, 1 for `Second`
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    #[inline]
    pub fn from_index(idx: usize) -> Option<Player> {
        match idx {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// Player to move after `depth` plies
    #[inline]
    pub fn to_move_at(depth: u8) -> Player {
        if depth % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// The four Quantik piece shapes, numbered 1..=4 in the action encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Cube,
    Cylinder,
    Cone,
    Sphere,
}

impl Shape {
    pub const ALL: [Shape; NUM_SHAPES] = [Shape::Cube, Shape::Cylinder, Shape::Cone, Shape::Sphere];

    /// Zero-based index (0..4)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Shape::Cube => 0,
            Shape::Cylinder => 1,
            Shape::Cone => 2,
            Shape::Sphere => 3,
        }
    }

    /// One-based shape number used by the action encoding (1..=4)
    #[inline]
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    #[inline]
    pub const fn from_index(idx: usize) -> Option<Shape> {
        match idx {
            0 => Some(Shape::Cube),
            1 => Some(Shape::Cylinder),
            2 => Some(Shape::Cone),
            3 => Some(Shape::Sphere),
            _ => None,
        }
    }

    #[inline]
    pub const fn from_number(number: u8) -> Option<Shape> {
        if number == 0 {
            None
        } else {
            Shape::from_index(number as usize - 1)
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    #[inline]
    pub const fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub const fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    /// Quadrant index: 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right
    #[inline]
    pub const fn quadrant(self) -> u8 {
        (self.row / 2) * 2 + self.col / 2
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Iterate all 16 cells in index order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TOTAL_CELLS).map(Pos::from_index)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// A placed piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub owner: Player,
    pub shape: Shape,
}

impl Tile {
    #[inline]
    pub const fn new(owner: Player, shape: Shape) -> Self {
        Self { owner, shape }
    }
}

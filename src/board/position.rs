//! Game state with reversible make/undo

use std::ops::Deref;

use derive_more::{Display, Error};

use super::{Action, Board, Player, Pos, Shape, Tile, COPIES_PER_SHAPE, NUM_SHAPES};

/// Rejected hand-built position
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PositionError {
    #[display("cell ({row}, {col}) given more than once")]
    DuplicateCell { row: u8, col: u8 },
    #[display("{player} has more than two pieces of shape {shape:?}")]
    SupplyExceeded { player: Player, shape: Shape },
    #[display("turn order broken: player 0 has {first} tiles, player 1 has {second}")]
    Unbalanced { first: u32, second: u32 },
}

/// Full game state: board, side to move, remaining supply and ply count.
///
/// Invariants maintained by [`Position::apply`] / [`Position::undo`]:
/// - `supply + tiles on board == 2` for every `(player, shape)`
/// - `depth` equals the number of tiles placed
/// - the player to move is `depth % 2`
///
/// Callers own the move history; a position keeps none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    player: Player,
    /// `supply[player][shape]`
    supply: [[u8; NUM_SHAPES]; 2],
    depth: u8,
}

impl Position {
    /// Empty board, player 0 to move, full supply
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            player: Player::First,
            supply: [[COPIES_PER_SHAPE; NUM_SHAPES]; 2],
            depth: 0,
        }
    }

    /// Build a position from placed tiles.
    ///
    /// The side to move follows from the tile count, so the first player must
    /// have placed as many tiles as the second or exactly one more.
    pub fn from_tiles(tiles: &[(Pos, Tile)]) -> Result<Self, PositionError> {
        let mut position = Self::new();
        let mut counts = [0u32; 2];

        for &(pos, tile) in tiles {
            if !position.board.is_empty(pos) {
                return Err(PositionError::DuplicateCell { row: pos.row, col: pos.col });
            }
            let left = &mut position.supply[tile.owner.index()][tile.shape.index()];
            if *left == 0 {
                return Err(PositionError::SupplyExceeded {
                    player: tile.owner,
                    shape: tile.shape,
                });
            }
            *left -= 1;
            position.board.place(pos, tile);
            counts[tile.owner.index()] += 1;
        }

        let [first, second] = counts;
        if first != second && first != second + 1 {
            return Err(PositionError::Unbalanced { first, second });
        }

        position.depth = (first + second) as u8;
        position.player = Player::to_move_at(position.depth);
        Ok(position)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player to move
    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Plies played so far
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Pieces of `shape` that `player` can still place
    #[inline]
    pub fn supply(&self, player: Player, shape: Shape) -> u8 {
        self.supply[player.index()][shape.index()]
    }

    /// Make move. No legality check; validate with [`crate::rules::is_legal`] first.
    #[inline]
    pub fn apply(&mut self, action: Action) {
        let player = self.player;
        debug_assert!(self.supply(player, action.shape) > 0, "no {:?} left for {}", action.shape, player);
        self.board.place(action.pos, Tile::new(player, action.shape));
        self.supply[player.index()][action.shape.index()] -= 1;
        self.depth += 1;
        self.player = player.opponent();
    }

    /// Undo move. Must be the action most recently applied.
    #[inline]
    pub fn undo(&mut self, action: Action) {
        self.player = self.player.opponent();
        self.depth -= 1;
        self.supply[self.player.index()][action.shape.index()] += 1;
        let removed = self.board.remove(action.pos);
        debug_assert_eq!(
            removed,
            Some(Tile::new(self.player, action.shape)),
            "undo of {} out of LIFO order",
            action
        );
    }

    /// Apply `action` and return a guard that undoes it when dropped.
    ///
    /// ```
    /// use quantik::board::{Action, Pos, Position, Shape};
    ///
    /// let mut position = Position::new();
    /// {
    ///     let child = position.play(Action::new(Pos::new(0, 0), Shape::Cube));
    ///     assert_eq!(child.depth(), 1);
    /// }
    /// assert_eq!(position, Position::new());
    /// ```
    #[inline]
    #[must_use = "the move is undone as soon as the guard is dropped"]
    pub fn play(&mut self, action: Action) -> PlayedMove<'_> {
        self.apply(action);
        PlayedMove { position: self, action }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// A move applied to a [`Position`] for the lifetime of the guard.
///
/// The guard only hands out shared access to the position. Further moves go
/// through [`PlayedMove::play`], so guards always unwind in LIFO order.
pub struct PlayedMove<'a> {
    position: &'a mut Position,
    action: Action,
}

impl PlayedMove<'_> {
    #[inline]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Play a reply on top of this move
    #[inline]
    #[must_use = "the move is undone as soon as the guard is dropped"]
    pub fn play(&mut self, action: Action) -> PlayedMove<'_> {
        self.position.play(action)
    }
}

impl Deref for PlayedMove<'_> {
    type Target = Position;

    #[inline]
    fn deref(&self) -> &Position {
        self.position
    }
}

/// Something moves can be played on: a position, or a move already played.
///
/// Lets recursive searches descend through nested guards.
pub trait Playable {
    fn position(&self) -> &Position;

    fn play(&mut self, action: Action) -> PlayedMove<'_>;
}

impl Playable for Position {
    #[inline]
    fn position(&self) -> &Position {
        self
    }

    #[inline]
    fn play(&mut self, action: Action) -> PlayedMove<'_> {
        Position::play(self, action)
    }
}

impl Playable for PlayedMove<'_> {
    #[inline]
    fn position(&self) -> &Position {
        self.position
    }

    #[inline]
    fn play(&mut self, action: Action) -> PlayedMove<'_> {
        PlayedMove::play(self, action)
    }
}

impl Drop for PlayedMove<'_> {
    #[inline]
    fn drop(&mut self) {
        self.position.undo(self.action);
    }
}

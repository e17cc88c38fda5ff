//! Mapping a live position onto its stored book entry

use tracing::{debug, instrument, trace};

use crate::board::{Action, Evaluations, Position, Shape, NUM_SHAPES};
use crate::error::LookupError;

use super::{OpeningBook, MAX_BOOK_DEPTH};

/// Bijection from actual shapes to canonical labels.
///
/// Shapes are labeled in order of first appearance in the move history;
/// shapes never played take the remaining labels in numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRelabel {
    /// `forward[actual] = label`
    forward: [Shape; NUM_SHAPES],
    /// `inverse[label] = actual`
    inverse: [Shape; NUM_SHAPES],
}

impl ShapeRelabel {
    pub const fn identity() -> Self {
        Self {
            forward: Shape::ALL,
            inverse: Shape::ALL,
        }
    }

    pub fn from_history(history: &[Action]) -> Self {
        let mut order: Vec<Shape> = Vec::with_capacity(NUM_SHAPES);
        let played = history.iter().map(|action| action.shape);
        for shape in played.chain(Shape::ALL) {
            if !order.contains(&shape) {
                order.push(shape);
            }
        }

        let mut relabel = Self::identity();
        for (label, &actual) in Shape::ALL.iter().zip(&order) {
            relabel.forward[actual.index()] = *label;
            relabel.inverse[label.index()] = actual;
        }
        relabel
    }

    /// Canonical label of an actual shape
    #[inline]
    pub fn apply(&self, shape: Shape) -> Shape {
        self.forward[shape.index()]
    }

    /// Actual shape behind a canonical label
    #[inline]
    pub fn invert(&self, label: Shape) -> Shape {
        self.inverse[label.index()]
    }
}

impl OpeningBook {
    /// Per-action outcomes for a position at most three plies deep.
    ///
    /// `history` must be the moves that produced `position`, in order. The
    /// first record with the same canonical shapes whose cells match under
    /// some symmetry (tried in table order) is projected back onto the live
    /// position.
    #[instrument(skip(self, position, history), fields(depth = position.depth()))]
    pub fn lookup(&self, position: &Position, history: &[Action]) -> Result<Evaluations, LookupError> {
        let depth = position.depth();
        let mismatch = LookupError::HistoryMismatch {
            moves: history.len(),
            depth,
        };

        if history.len() != depth as usize {
            return Err(mismatch);
        }
        if depth > MAX_BOOK_DEPTH {
            return Err(LookupError::TooDeep { depth });
        }
        let on_board = |action: &Action| position.board().get(action.pos).map(|tile| tile.shape) == Some(action.shape);
        if !history.iter().all(on_board) {
            return Err(mismatch);
        }

        let relabel = ShapeRelabel::from_history(history);
        let canonical: Vec<Action> = history
            .iter()
            .map(|action| Action::new(action.pos, relabel.apply(action.shape)))
            .collect();
        trace!(?relabel, ?canonical, "canonical prefix");

        for (index, record) in self.records().iter().enumerate() {
            let prefix = record.prefix();
            if prefix.len() != canonical.len() {
                continue;
            }
            if prefix.iter().zip(&canonical).any(|(stored, live)| stored.shape != live.shape) {
                continue;
            }

            let symmetry = self.symmetries().iter().position(|symmetry| {
                canonical
                    .iter()
                    .zip(prefix)
                    .all(|(live, stored)| symmetry.map(live.pos) == stored.pos)
            });
            if let Some(symmetry) = symmetry {
                debug!(record = index, symmetry, "book entry found");
                return Ok(record.project(&relabel, &self.symmetries()[symmetry]));
            }
        }

        debug!("no book entry matches");
        Err(LookupError::NoMatch { depth })
    }
}

//! Dense action encoding
//!
//! Every placement is `(row, col, shape)` and maps to a code in `0..64`:
//!
//! ```text
//! code = (shape - 1) * 16 + row * 4 + col
//! ```
//!
//! The order is shape-major, then row, then column. Search visits actions in
//! this order and the opening book indexes its outcome vectors by it, so the
//! layout must not change.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use derive_more::{Display, Error};

use super::{Player, Pos, Shape, BOARD_SIZE, NUM_ACTIONS, TOTAL_CELLS};

/// Placement of one shape on one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub pos: Pos,
    pub shape: Shape,
}

impl Action {
    #[inline]
    pub const fn new(pos: Pos, shape: Shape) -> Self {
        Self { pos, shape }
    }

    /// Build from raw coordinates, `shape` being the one-based shape number
    #[inline]
    pub fn from_parts(row: u8, col: u8, shape: u8) -> Option<Self> {
        if !Pos::is_valid(row as i32, col as i32) {
            return None;
        }
        Shape::from_number(shape).map(|shape| Self::new(Pos::new(row, col), shape))
    }

    /// Dense code in `0..64`
    #[inline]
    pub const fn encode(self) -> u8 {
        (self.shape.index() * TOTAL_CELLS + self.pos.to_index()) as u8
    }

    /// Exact inverse of [`Action::encode`]; `None` for codes outside `0..64`
    #[inline]
    pub const fn decode(code: u8) -> Option<Self> {
        if code as usize >= NUM_ACTIONS {
            return None;
        }
        Some(Self::decode_unchecked(code))
    }

    #[inline]
    const fn decode_unchecked(code: u8) -> Self {
        let shape = match Shape::from_index(code as usize / TOTAL_CELLS) {
            Some(shape) => shape,
            None => Shape::Sphere,
        };
        Self::new(Pos::from_index(code as usize % TOTAL_CELLS), shape)
    }

    /// Iterate all 64 actions in code order
    pub fn all() -> impl Iterator<Item = Action> {
        ALL_ACTIONS.into_iter()
    }
}

/// Every action, indexed by its code
pub const ALL_ACTIONS: [Action; NUM_ACTIONS] = {
    let mut actions = [Action::new(Pos::new(0, 0), Shape::Cube); NUM_ACTIONS];
    let mut code = 0;
    while code < NUM_ACTIONS {
        actions[code] = Action::decode_unchecked(code as u8);
        code += 1;
    }
    actions
};

/// Textual form `RCS`: row, column and zero-based shape digit
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pos.row, self.pos.col, self.shape.index())
    }
}

/// Error parsing an action from its `RCS` text form
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseActionError {
    #[display("expected 3 digits (row, column, shape), found {found}")]
    DigitCount { found: usize },
    #[display("digit {digit} out of range; digits must be 0, 1, 2 or 3")]
    OutOfRange { digit: u32 },
}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Parses `"RCS"`. Separators between the digits are ignored, so
    /// `"1,2,0"` and `"120"` are the same action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 3 {
            return Err(ParseActionError::DigitCount { found: digits.len() });
        }

        if let Some(&digit) = digits.iter().find(|&&d| d >= BOARD_SIZE as u32) {
            return Err(ParseActionError::OutOfRange { digit });
        }

        let shape = Shape::from_index(digits[2] as usize).ok_or(ParseActionError::OutOfRange { digit: digits[2] })?;
        Ok(Action::new(Pos::new(digits[0] as u8, digits[1] as u8), shape))
    }
}

/// Result of playing an action: who wins under optimal play, or `Invalid`
/// when the action is not legal in the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Won(Player),
    Invalid,
}

impl Outcome {
    /// Byte used by the opening book for an illegal action
    pub const INVALID_BYTE: u8 = 255;

    /// Decode an opening-book byte (0, 1 or 255)
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Outcome> {
        match byte {
            Self::INVALID_BYTE => Some(Outcome::Invalid),
            b => Player::from_index(b as usize).map(Outcome::Won),
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            Outcome::Won(player) => player.index() as u8,
            Outcome::Invalid => Self::INVALID_BYTE,
        }
    }

    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(player),
            Outcome::Invalid => None,
        }
    }
}

/// Per-action outcomes indexed by action code
pub type Evaluations = [Outcome; NUM_ACTIONS];

/// Fixed-capacity list of actions, kept in code order. Avoids allocating at
/// every search node.
#[derive(Clone, Copy)]
pub struct ActionList {
    actions: [Action; NUM_ACTIONS],
    len: usize,
}

impl ActionList {
    pub const fn new() -> Self {
        Self {
            actions: ALL_ACTIONS,
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, action: Action) {
        debug_assert!(self.len < NUM_ACTIONS);
        self.actions[self.len] = action;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions[..self.len]
    }
}

impl Default for ActionList {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ActionList {
    type Target = [Action];

    fn deref(&self) -> &[Action] {
        self.as_slice()
    }
}

impl fmt::Debug for ActionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a ActionList {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        for code in 0..NUM_ACTIONS as u8 {
            let action = Action::decode(code).unwrap();
            assert!(action.pos.row < 4 && action.pos.col < 4);
            assert!((1..=4).contains(&action.shape.number()));
            assert_eq!(action.encode(), code);
        }
    }

    #[test]
    fn test_decode_known_codes() {
        // Same spot checks as the reference codec tests
        let cases = [
            (0, 0, 0, 1),
            (1, 0, 1, 1),
            (4, 1, 0, 1),
            (16, 0, 0, 2),
            (17, 0, 1, 2),
            (20, 1, 0, 2),
            (41, 2, 1, 3),
            (62, 3, 2, 4),
        ];
        for (code, row, col, shape) in cases {
            assert_eq!(Action::decode(code), Action::from_parts(row, col, shape), "code {}", code);
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert_eq!(Action::decode(64), None);
        assert_eq!(Action::decode(255), None);
    }

    #[test]
    fn test_all_actions_in_code_order() {
        for (code, action) in Action::all().enumerate() {
            assert_eq!(action.encode() as usize, code);
        }
    }

    #[test]
    fn test_from_parts_rejects_bad_input() {
        assert!(Action::from_parts(4, 0, 1).is_none());
        assert!(Action::from_parts(0, 4, 1).is_none());
        assert!(Action::from_parts(0, 0, 0).is_none());
        assert!(Action::from_parts(0, 0, 5).is_none());
    }

    #[test]
    fn test_parse_and_display() {
        let action: Action = "312".parse().unwrap();
        assert_eq!(action, Action::new(Pos::new(3, 1), Shape::Cone));
        assert_eq!(action.to_string(), "312");

        let spaced: Action = "3, 1, 2".parse().unwrap();
        assert_eq!(spaced, action);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("12".parse::<Action>(), Err(ParseActionError::DigitCount { found: 2 }));
        assert_eq!("1234".parse::<Action>(), Err(ParseActionError::DigitCount { found: 4 }));
        assert_eq!("104".parse::<Action>(), Err(ParseActionError::OutOfRange { digit: 4 }));
    }

    #[test]
    fn test_outcome_bytes() {
        assert_eq!(Outcome::from_byte(0), Some(Outcome::Won(Player::First)));
        assert_eq!(Outcome::from_byte(1), Some(Outcome::Won(Player::Second)));
        assert_eq!(Outcome::from_byte(255), Some(Outcome::Invalid));
        assert_eq!(Outcome::from_byte(2), None);
        for outcome in [Outcome::Won(Player::First), Outcome::Won(Player::Second), Outcome::Invalid] {
            assert_eq!(Outcome::from_byte(outcome.to_byte()), Some(outcome));
        }
    }

    #[test]
    fn test_action_list() {
        let mut list = ActionList::new();
        assert!(list.is_empty());
        list.push(ALL_ACTIONS[5]);
        list.push(ALL_ACTIONS[40]);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].encode(), 40);
    }
}

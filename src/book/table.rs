//! Book loading and validation

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::board::{Action, Bitboard, Evaluations, Outcome, Pos, Region, NUM_ACTIONS, TOTAL_CELLS};
use crate::error::BookError;

use super::canon::ShapeRelabel;
use super::{
    BOOK_BYTES, MAX_BOOK_DEPTH, PAD, PREFIX_BYTES, RECORD_BYTES, RECORD_COUNT, SYMMETRY_BYTES, SYMMETRY_COUNT,
};

/// Permutation of the 16 cells, stored as `image[cell]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetry {
    image: [u8; TOTAL_CELLS],
}

impl Symmetry {
    pub const fn identity() -> Self {
        let mut image = [0u8; TOTAL_CELLS];
        let mut cell = 0;
        while cell < TOTAL_CELLS {
            image[cell] = cell as u8;
            cell += 1;
        }
        Self { image }
    }

    /// Accepts only a region-preserving permutation
    pub fn from_image(image: [u8; TOTAL_CELLS]) -> Option<Self> {
        let symmetry = Self { image };
        (symmetry.is_permutation() && symmetry.preserves_regions()).then_some(symmetry)
    }

    /// Image of `pos`
    #[inline]
    pub fn map(&self, pos: Pos) -> Pos {
        Pos::from_index(self.image[pos.to_index()] as usize)
    }

    pub fn inverse(&self) -> Self {
        let mut image = [0u8; TOTAL_CELLS];
        for (cell, &target) in self.image.iter().enumerate() {
            image[target as usize] = cell as u8;
        }
        Self { image }
    }

    pub fn image(&self) -> &[u8; TOTAL_CELLS] {
        &self.image
    }

    fn is_permutation(&self) -> bool {
        let mut seen = 0u32;
        for &target in &self.image {
            if target as usize >= TOTAL_CELLS {
                return false;
            }
            seen |= 1 << target;
        }
        seen == (1 << TOTAL_CELLS) - 1
    }

    /// Every row, column and quadrant must land on some row, column or quadrant
    fn preserves_regions(&self) -> bool {
        Region::ALL.iter().all(|region| {
            let image = region
                .mask()
                .iter_ones()
                .fold(Bitboard::EMPTY, |acc, pos| acc | Bitboard::from_pos(self.map(pos)));
            Region::from_mask(image).is_some()
        })
    }
}

/// One canonical position and the outcome of every action from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    prefix: Vec<Action>,
    outcomes: Evaluations,
}

impl BookRecord {
    /// Canonical moves leading to this position
    pub fn prefix(&self) -> &[Action] {
        &self.prefix
    }

    /// Stored outcomes, indexed by canonical action code
    pub fn outcomes(&self) -> &Evaluations {
        &self.outcomes
    }

    /// Map stored outcomes back onto the live position.
    ///
    /// A stored code names a canonical cell and a canonical shape label; the
    /// live action is the inverse symmetry applied to the cell and the inverse
    /// relabeling applied to the shape.
    pub fn project(&self, relabel: &ShapeRelabel, symmetry: &Symmetry) -> Evaluations {
        let inverse = symmetry.inverse();
        let mut out = [Outcome::Invalid; NUM_ACTIONS];
        for (code, &outcome) in self.outcomes.iter().enumerate() {
            let Some(stored) = Action::decode(code as u8) else {
                continue;
            };
            let actual = Action::new(inverse.map(stored.pos), relabel.invert(stored.shape));
            out[actual.encode() as usize] = outcome;
        }
        out
    }

    fn parse(index: usize, bytes: &[u8]) -> Result<Self, BookError> {
        let invalid = |reason| BookError::InvalidRecord { index, reason };

        let (head, tail) = bytes.split_at(PREFIX_BYTES);
        if head[PREFIX_BYTES - 1] != PAD {
            return Err(invalid("last prefix byte must be padding"));
        }

        let len = head
            .iter()
            .take(MAX_BOOK_DEPTH as usize)
            .take_while(|&&byte| byte != PAD)
            .count();
        if head[len..].iter().any(|&byte| byte != PAD) {
            return Err(invalid("action code after padding"));
        }
        let prefix = head[..len]
            .iter()
            .map(|&code| Action::decode(code).ok_or_else(|| invalid("prefix action code out of range")))
            .collect::<Result<Vec<_>, _>>()?;

        let mut outcomes = [Outcome::Invalid; NUM_ACTIONS];
        for (slot, &byte) in outcomes.iter_mut().zip(tail) {
            *slot = Outcome::from_byte(byte).ok_or_else(|| invalid("outcome byte not 0, 1 or 255"))?;
        }

        Ok(Self { prefix, outcomes })
    }
}

/// Loaded opening book. Immutable; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    symmetries: Vec<Symmetry>,
    records: Vec<BookRecord>,
}

impl OpeningBook {
    /// Parse and validate a complete book image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BookError> {
        if bytes.len() != BOOK_BYTES {
            return Err(BookError::InvalidLength {
                expected: BOOK_BYTES,
                found: bytes.len(),
            });
        }

        let (symmetry_bytes, record_bytes) = bytes.split_at(SYMMETRY_COUNT * SYMMETRY_BYTES);

        let symmetries = symmetry_bytes
            .chunks_exact(SYMMETRY_BYTES)
            .enumerate()
            .map(|(index, chunk)| {
                let mut image = [0u8; TOTAL_CELLS];
                image.copy_from_slice(chunk);
                Symmetry::from_image(image).ok_or(BookError::InvalidSymmetry { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let records = record_bytes
            .chunks_exact(RECORD_BYTES)
            .enumerate()
            .map(|(index, chunk)| BookRecord::parse(index, chunk))
            .collect::<Result<Vec<_>, _>>()?;
        debug_assert_eq!(records.len(), RECORD_COUNT);

        debug!(symmetries = symmetries.len(), records = records.len(), "opening book parsed");
        Ok(Self { symmetries, records })
    }

    /// Read and validate a book file
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        debug!("Loading opening book");
        let bytes = std::fs::read(path.as_ref())?;
        let book = Self::from_bytes(&bytes)?;
        info!(records = book.records.len(), "Opening book loaded");
        Ok(book)
    }

    /// Symmetries in table order
    pub fn symmetries(&self) -> &[Symmetry] {
        &self.symmetries
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::board::{Player, Shape};

    #[test]
    fn test_generated_group_is_valid() {
        let group = symmetry_group();
        assert_eq!(group.len(), SYMMETRY_COUNT);
        for image in &group {
            assert!(Symmetry::from_image(*image).is_some(), "{:?}", image);
        }
        assert!(group.contains(&quadrant_swap()));
    }

    #[test]
    fn test_symmetry_inverse() {
        for image in symmetry_group().into_iter().take(20) {
            let symmetry = Symmetry::from_image(image).unwrap();
            let inverse = symmetry.inverse();
            for pos in Pos::all() {
                assert_eq!(inverse.map(symmetry.map(pos)), pos);
            }
        }
    }

    #[test]
    fn test_rejects_non_region_preserving_permutation() {
        // Swapping two cells of different rows and quadrants breaks regions
        let image = cycles(&[&[0, 15]]);
        assert!(Symmetry::from_image(image).is_none());

        let mut repeated = *Symmetry::identity().image();
        repeated[3] = 0;
        assert!(Symmetry::from_image(repeated).is_none());
    }

    #[test]
    fn test_from_bytes_loads_full_book() {
        let book = OpeningBook::from_bytes(&book_bytes(&symmetry_group(), &[])).unwrap();
        assert_eq!(book.symmetries().len(), SYMMETRY_COUNT);
        assert_eq!(book.records().len(), RECORD_COUNT);
        assert_eq!(book.symmetries()[0], Symmetry::identity());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let mut bytes = book_bytes(&[], &[]);
        bytes.push(0);
        assert!(matches!(
            OpeningBook::from_bytes(&bytes),
            Err(BookError::InvalidLength { found: 10957, .. })
        ));
        assert!(matches!(
            OpeningBook::from_bytes(&bytes[..100]),
            Err(BookError::InvalidLength { found: 100, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_symmetry() {
        let bytes = book_bytes(&[*Symmetry::identity().image(), cycles(&[&[0, 15]])], &[]);
        assert!(matches!(
            OpeningBook::from_bytes(&bytes),
            Err(BookError::InvalidSymmetry { index: 1 })
        ));
    }

    #[test]
    fn test_rejects_bad_records() {
        let bad_outcome = record(&[], &[(7, 3)]);
        assert!(matches!(
            OpeningBook::from_bytes(&book_bytes(&[], &[bad_outcome])),
            Err(BookError::InvalidRecord { index: 0, .. })
        ));

        let gap = record(&[5, PAD, 9], &[]);
        assert!(matches!(
            OpeningBook::from_bytes(&book_bytes(&[], &[record(&[], &[]), gap])),
            Err(BookError::InvalidRecord { index: 1, .. })
        ));

        let bad_code = record(&[64], &[]);
        assert!(matches!(
            OpeningBook::from_bytes(&book_bytes(&[], &[bad_code])),
            Err(BookError::InvalidRecord { index: 0, .. })
        ));

        let mut unpadded = record(&[1, 2, 3], &[]);
        unpadded[3] = 4;
        assert!(matches!(
            OpeningBook::from_bytes(&book_bytes(&[], &[unpadded])),
            Err(BookError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn test_record_prefix_length() {
        let records = vec![
            record(&[], &[]),
            record(&[17], &[]),
            record(&[0, 21], &[]),
            record(&[0, 21, 42], &[]),
        ];
        let book = OpeningBook::from_bytes(&book_bytes(&[], &records)).unwrap();
        for (record, expected) in book.records().iter().zip([0, 1, 2, 3]) {
            assert_eq!(record.prefix().len(), expected);
            assert!(record.prefix().len() <= MAX_BOOK_DEPTH as usize);
        }
        assert_eq!(book.records()[2].prefix()[1], Action::new(Pos::new(1, 1), Shape::Cylinder));
    }

    #[test]
    fn test_identity_projection_reproduces_records() {
        let records = vec![
            record(&[], &[(0, 0), (17, 1), (63, 0)]),
            record(&[5], &[(1, 1), (40, 0)]),
            record(&[5, 26], &[(12, 0), (33, 1)]),
        ];
        let book = OpeningBook::from_bytes(&book_bytes(&symmetry_group(), &records)).unwrap();
        for record in book.records() {
            let projected = record.project(&ShapeRelabel::identity(), &Symmetry::identity());
            assert_eq!(&projected, record.outcomes());
        }
        assert_eq!(book.records()[0].outcomes()[17], Outcome::Won(Player::Second));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OpeningBook::load(dir.path().join("missing.bin")).unwrap_err();
        assert!(matches!(err, BookError::Io(_)));
    }
}

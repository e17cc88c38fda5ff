//! Symmetry-compressed opening book
//!
//! Every position up to three plies deep is stored once per equivalence class
//! under board symmetries and shape relabelings. A live position is mapped
//! onto its stored representative and the stored per-action outcomes are
//! mapped back.
//!
//! Binary layout (10 956 bytes):
//!
//! ```text
//! [0, 2048)      128 symmetries x 16 bytes; byte k = image of cell k
//! [2048, 10956)  131 records x 68 bytes:
//!                  4 prefix bytes  action codes, padded with 255
//!                  64 outcome bytes  0 / 1 = winner, 255 = invalid
//! ```

mod canon;
mod table;

pub use canon::ShapeRelabel;
pub use table::{BookRecord, OpeningBook, Symmetry};

/// Deepest position the book answers for
pub const MAX_BOOK_DEPTH: u8 = 3;

pub const SYMMETRY_COUNT: usize = 128;
pub const SYMMETRY_BYTES: usize = 16;
pub const RECORD_COUNT: usize = 131;
/// Prefix slots per record; the last one is always padding
pub const PREFIX_BYTES: usize = 4;
pub const RECORD_BYTES: usize = PREFIX_BYTES + crate::board::NUM_ACTIONS; // 68
/// Exact size of a valid book file
pub const BOOK_BYTES: usize = SYMMETRY_COUNT * SYMMETRY_BYTES + RECORD_COUNT * RECORD_BYTES; // 10956

/// Prefix padding byte
pub(crate) const PAD: u8 = 255;

#[cfg(test)]
pub(crate) use table::fixtures;

//! Game rules for Quantik
//!
//! This module implements the rule set:
//! - Placement (supply, empty cell, no opposing same shape in any shared region)
//! - Win by completing a region (four distinct shapes in a row, column or quadrant)
//! - Loss by starvation (no legal placement on your turn)

pub mod placement;
pub mod win;

// Re-exports for convenient access
pub use placement::{has_legal_action, is_legal, legal_actions};
pub use win::{completed_regions, completes_region, is_region_complete};

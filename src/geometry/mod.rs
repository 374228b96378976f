//! 2D geometry helpers.

pub mod rect;

pub use rect::{area, overlap_area, swept_area, Rect};

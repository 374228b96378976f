//! Axis-aligned rectangle math for layout-shift impact.
//!
//! Trace rects arrive as `[x, y, width, height]`. Dimensions are assumed
//! non-negative; nothing here validates malformed geometry.

use serde::{Deserialize, Serialize};

/// A rectangle in CSS pixels with derived edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    /// Build a rect and derive its edges
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            bottom: y + height,
            left: x,
            right: x + width,
        }
    }

    /// Convert a trace `[x, y, width, height]` array
    ///
    /// Returns `None` unless exactly four values are present.
    pub fn from_trace(values: &[f64]) -> Option<Self> {
        match *values {
            [x, y, width, height] => Some(Self::new(x, y, width, height)),
            _ => None,
        }
    }

    pub fn area(&self) -> f64 {
        area(self)
    }
}

/// Area of a rect
pub fn area(rect: &Rect) -> f64 {
    rect.width * rect.height
}

/// Area shared by two rects, 0 when they do not intersect
pub fn overlap_area(a: &Rect, b: &Rect) -> f64 {
    let horizontal = (a.right.min(b.right) - a.left.max(b.left)).max(0.0);
    let vertical = (a.bottom.min(b.bottom) - a.top.max(b.top)).max(0.0);
    horizontal * vertical
}

/// Total area swept by an element moving from `old` to `new`
///
/// The overlap is counted once, so a zero-displacement shift still
/// contributes its full area.
pub fn swept_area(old: &Rect, new: &Rect) -> f64 {
    area(old) + area(new) - overlap_area(old, new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_derived() {
        let r = Rect::new(5.0, 10.0, 20.0, 30.0);
        assert_eq!(r.top, 10.0);
        assert_eq!(r.bottom, 40.0);
        assert_eq!(r.left, 5.0);
        assert_eq!(r.right, 25.0);
    }

    #[test]
    fn test_from_trace_requires_four_values() {
        assert!(Rect::from_trace(&[1.0, 2.0, 3.0]).is_none());
        assert!(Rect::from_trace(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
        assert_eq!(
            Rect::from_trace(&[1.0, 2.0, 3.0, 4.0]),
            Some(Rect::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn test_overlap_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &b), 25.0);
    }

    #[test]
    fn test_overlap_disjoint_and_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far = Rect::new(50.0, 50.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &far), 0.0);
        assert_eq!(overlap_area(&a, &touching), 0.0);
    }

    #[test]
    fn test_overlap_contained() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(overlap_area(&outer, &inner), 25.0);
    }

    #[test]
    fn test_swept_area_zero_displacement() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(swept_area(&r, &r), 100.0);
    }

    #[test]
    fn test_swept_area_vertical_move() {
        let old = Rect::new(0.0, 0.0, 10.0, 10.0);
        let new = Rect::new(0.0, 5.0, 10.0, 10.0);
        assert_eq!(swept_area(&old, &new), 150.0);
    }
}

//! Collision detection
//!
//! Axis-aligned bounding-box overlap is the only collision primitive.

use super::rect::Rect;

/// Check whether two rectangles overlap
///
/// Inequalities are strict, so rectangles that merely touch along an edge do
/// not overlap, and a rectangle with zero width or height overlaps nothing.
/// Symmetric in its arguments.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    has_area(a)
        && has_area(b)
        && a.x() < b.right()
        && a.right() > b.x()
        && a.y() < b.bottom()
        && a.bottom() > b.y()
}

#[inline]
fn has_area(rect: &Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}

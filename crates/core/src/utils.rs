//! Geometric primitives shared by both pipelines.
//!
//! Pipeline A (annotations) uses the PDF viewer convention: y grows downward,
//! so a line's `y1` is its baseline and a *smaller* `y1` means a *higher*
//! line on the page. Pipeline B (box decoding) uses the typesetting
//! convention: y grows upward from the bottom-left page corner.

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A rectangle defined by (x0, y0, x1, y1) with x0 <= x1 and y0 <= y1.
pub type Rect = (f64, f64, f64, f64);

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Whether two rectangles overlap (shared edges and corners count).
#[inline]
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.0 <= b.2 && b.0 <= a.2 && a.1 <= b.3 && b.1 <= a.3
}

/// Horizontal midpoint of a rectangle.
#[inline]
pub fn mid_x(r: Rect) -> f64 {
    (r.0 + r.2) / 2.0
}

/// Width of a rectangle.
#[inline]
pub fn width(r: Rect) -> f64 {
    r.2 - r.0
}

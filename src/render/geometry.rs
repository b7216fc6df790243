//! Shared geometry calculations for callouts
//!
//! This module contains constants and math shared between
//! screen rendering (tiny-skia) and document export (PDF).
//! Keep every sizing formula here so the two stay in sync.

use crate::domain::{Point, Rect};

/// Leader line curve constants
pub mod curve {
    /// Sample segments for the quadratic (Curved) shape
    pub const QUADRATIC_SAMPLES: usize = 50;
    /// Sample segments for the cubic (SCurved) shape
    pub const CUBIC_SAMPLES: usize = 60;
    /// Control point offset per unit of chord length at curvature 100 (Curved)
    pub const QUADRATIC_BEND: f32 = 0.5;
    /// Control point offset per unit of chord length at curvature 100 (SCurved)
    pub const CUBIC_BEND: f32 = 0.6;
    pub const MAX_CURVATURE: i32 = 100;
}

/// Terminator constants
pub mod terminator {
    /// Dot radius as a fraction of the terminator size
    pub const DOT_RATIO: f32 = 0.4;
    /// Arrow base half-width as a fraction of the terminator size
    pub const ARROW_HALF_WIDTH: f32 = 0.5;
}

/// Label box constants
pub mod label {
    /// Approximate advance of one digit as a fraction of the font size
    pub const DIGIT_WIDTH: f32 = 0.6;
    /// Padding as a fraction of the font size
    pub const PADDING_RATIO: f32 = 0.2;
    /// Smallest padding regardless of font size
    pub const MIN_PADDING: f32 = 6.0;
}

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Width the decimal text of `label` occupies at `font_size`
#[inline]
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * label::DIGIT_WIDTH
}

#[inline]
pub fn label_padding(font_size: f32) -> f32 {
    label::MIN_PADDING.max(font_size * label::PADDING_RATIO)
}

/// Label background rectangle centered on the label anchor
pub fn label_rect(center: Point, text: &str, font_size: f32) -> Rect {
    let padding = label_padding(font_size);
    let width = text_width(text, font_size) + padding * 2.0;
    let height = font_size + padding * 2.0;
    Rect::from_center(center, width, height)
}

/// Exclusion radius around the label anchor: half the label box diagonal
///
/// Any point at least this far from the center is outside the box.
#[inline]
pub fn label_radius(rect: &Rect) -> f32 {
    0.5 * (rect.width() * rect.width() + rect.height() * rect.height()).sqrt()
}

/// Four cubic segments approximating a circle, as (from, ctrl1, ctrl2, to) tuples
pub fn circle_cubics(center: Point, radius: f32) -> [(Point, Point, Point, Point); 4] {
    let k = radius * BEZIER_K;
    let (cx, cy, r) = (center.x, center.y, radius);
    let top = Point::new(cx, cy - r);
    let right = Point::new(cx + r, cy);
    let bottom = Point::new(cx, cy + r);
    let left = Point::new(cx - r, cy);
    [
        (top, Point::new(cx + k, cy - r), Point::new(cx + r, cy - k), right),
        (right, Point::new(cx + r, cy + k), Point::new(cx + k, cy + r), bottom),
        (bottom, Point::new(cx - k, cy + r), Point::new(cx - r, cy + k), left),
        (left, Point::new(cx - r, cy - k), Point::new(cx - k, cy - r), top),
    ]
}

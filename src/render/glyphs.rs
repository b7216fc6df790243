//! Stroke font for label digits
//!
//! tiny-skia has no text support, so the screen overlay draws label numbers as
//! pen strokes. Glyph cells use the same digit advance as the label box
//! formula, which keeps the text centered the same way the exporter centers it.
//!
//! Only placement is shared. The PDF shows Helvetica stretched to this advance,
//! so digit shapes differ between the overlay and the exported page and label
//! text is not pixel-identical across the two.

use super::geometry::label::DIGIT_WIDTH;
use crate::domain::Point;

/// Digit height as a fraction of the font size
pub const CAP_HEIGHT: f32 = 0.7;
/// Pen width as a fraction of the font size
pub const PEN_WIDTH: f32 = 0.1;

const L: f32 = 0.2;
const R: f32 = 0.8;
const T: f32 = 0.0;
const M: f32 = 0.5;
const B: f32 = 1.0;

type Stroke = &'static [(f32, f32)];

const ZERO: &[Stroke] = &[&[(L, T), (R, T), (R, B), (L, B), (L, T)]];
const ONE: &[Stroke] = &[&[(0.3, 0.2), (0.5, T), (0.5, B)], &[(0.3, B), (0.7, B)]];
const TWO: &[Stroke] = &[&[(L, T), (R, T), (R, M), (L, M), (L, B), (R, B)]];
const THREE: &[Stroke] = &[&[(L, T), (R, T), (R, B), (L, B)], &[(L, M), (R, M)]];
const FOUR: &[Stroke] = &[&[(L, T), (L, M), (R, M)], &[(R, T), (R, B)]];
const FIVE: &[Stroke] = &[&[(R, T), (L, T), (L, M), (R, M), (R, B), (L, B)]];
const SIX: &[Stroke] = &[&[(R, T), (L, T), (L, B), (R, B), (R, M), (L, M)]];
const SEVEN: &[Stroke] = &[&[(L, T), (R, T), (0.4, B)]];
const EIGHT: &[Stroke] = &[&[(L, T), (R, T), (R, B), (L, B), (L, T)], &[(L, M), (R, M)]];
const NINE: &[Stroke] = &[&[(R, M), (L, M), (L, T), (R, T), (R, B), (L, B)]];

/// Pen strokes for one digit in unit cell coordinates (Y down), empty for anything else
pub fn digit_strokes(c: char) -> &'static [Stroke] {
    match c {
        '0' => ZERO,
        '1' => ONE,
        '2' => TWO,
        '3' => THREE,
        '4' => FOUR,
        '5' => FIVE,
        '6' => SIX,
        '7' => SEVEN,
        '8' => EIGHT,
        '9' => NINE,
        _ => &[],
    }
}

/// Lay out `text` centered on `center` as absolute polylines (Y down)
pub fn layout_text(text: &str, center: Point, font_size: f32) -> Vec<Vec<Point>> {
    let advance = font_size * DIGIT_WIDTH;
    let height = font_size * CAP_HEIGHT;
    let total = advance * text.chars().count() as f32;
    let left = center.x - total * 0.5;
    let top = center.y - height * 0.5;

    text.chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let cell_x = left + advance * i as f32;
            digit_strokes(c).iter().map(move |stroke| {
                stroke
                    .iter()
                    .map(|&(u, v)| Point::new(cell_x + u * advance, top + v * height))
                    .collect::<Vec<_>>()
            })
        })
        .collect()
}

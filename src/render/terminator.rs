//! Terminator geometry (arrowhead / dot) at the far end of a leader line

use super::geometry::terminator as consts;
use crate::domain::{Point, Terminator};

/// Filled shape drawn at the end of the leader line
#[derive(Clone, Debug, PartialEq)]
pub enum TerminatorShape {
    /// Isosceles triangle: apex first, then the two base corners
    Arrow([Point; 3]),
    Dot { center: Point, radius: f32 },
}

impl TerminatorShape {
    /// Build the terminator at `end` for a line arriving along `direction`
    ///
    /// `direction` need not be normalized; a zero vector points along +x.
    pub fn build(kind: Terminator, end: Point, direction: Point, size: f32) -> Option<Self> {
        match kind {
            Terminator::None => None,
            Terminator::Dot => Some(TerminatorShape::Dot {
                center: end,
                radius: size * consts::DOT_RATIO,
            }),
            Terminator::Arrow => Some(TerminatorShape::Arrow(arrow_points(end, direction, size))),
        }
    }

    /// Map every point through `f`
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            TerminatorShape::Arrow(pts) => TerminatorShape::Arrow(pts.map(f)),
            TerminatorShape::Dot { center, radius } => TerminatorShape::Dot {
                center: f(center),
                radius,
            },
        }
    }
}

/// Unit direction for the arrowhead, falling back to +x
#[inline]
pub fn arrow_direction(direction: Point) -> Point {
    let unit = direction.unit();
    if unit == Point::ZERO {
        Point::new(1.0, 0.0)
    } else {
        unit
    }
}

/// Where the stroke stops so it tucks under the arrowhead
///
/// A zero direction (start == end) leaves the end where it is.
#[inline]
pub fn setback(end: Point, direction: Point, size: f32) -> Point {
    end - direction.unit() * size
}

/// Arrowhead triangle with its apex exactly at `tip`
pub fn arrow_points(tip: Point, direction: Point, size: f32) -> [Point; 3] {
    let dir = arrow_direction(direction);
    let base = tip - dir * size;
    let lateral = dir.perp() * (size * consts::ARROW_HALF_WIDTH);
    [tip, base + lateral, base - lateral]
}

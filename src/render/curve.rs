//! Curve sampling and crop search for bent leader lines
//!
//! The ideal curve runs from the label center to the terminator-adjusted end.
//! Only the part outside the label's exclusion radius is drawn; the crop point
//! is found by a linear nearest-sample search.

use super::geometry::curve as consts;
use crate::domain::{LineShape, Point};

/// A parametric leader curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bezier {
    Quadratic {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl Bezier {
    /// Build the ideal curve for a bent line shape
    ///
    /// Returns None for `Straight`, for curvature 0 after clamping, and for a
    /// zero-length chord, all of which render as straight lines.
    pub fn ideal(
        start: Point,
        end: Point,
        shape: LineShape,
        curvature: i32,
        flipped: bool,
    ) -> Option<Bezier> {
        let curvature = curvature.clamp(0, consts::MAX_CURVATURE);
        if shape == LineShape::Straight || curvature == 0 {
            return None;
        }

        let chord = end - start;
        let length = chord.length();
        if length <= 0.0 {
            return None;
        }

        let side = if flipped { -1.0 } else { 1.0 };
        let normal = chord.unit().perp() * side;
        let amount = curvature as f32 / consts::MAX_CURVATURE as f32 * length;

        match shape {
            LineShape::Straight => None,
            LineShape::Curved => {
                let offset = amount * consts::QUADRATIC_BEND;
                Some(Bezier::Quadratic {
                    from: start,
                    ctrl: start.lerp(end, 0.5) + normal * offset,
                    to: end,
                })
            }
            LineShape::SCurved => {
                // Opposite offsets at the thirds make the curve inflect at its midpoint
                let offset = amount * consts::CUBIC_BEND;
                Some(Bezier::Cubic {
                    from: start,
                    ctrl1: start.lerp(end, 1.0 / 3.0) + normal * offset,
                    ctrl2: start.lerp(end, 2.0 / 3.0) - normal * offset,
                    to: end,
                })
            }
        }
    }

    pub fn from(&self) -> Point {
        match *self {
            Bezier::Quadratic { from, .. } | Bezier::Cubic { from, .. } => from,
        }
    }

    pub fn to(&self) -> Point {
        match *self {
            Bezier::Quadratic { to, .. } | Bezier::Cubic { to, .. } => to,
        }
    }

    /// Same control points with a different end point
    pub fn with_end(self, end: Point) -> Bezier {
        match self {
            Bezier::Quadratic { from, ctrl, .. } => Bezier::Quadratic { from, ctrl, to: end },
            Bezier::Cubic {
                from, ctrl1, ctrl2, ..
            } => Bezier::Cubic {
                from,
                ctrl1,
                ctrl2,
                to: end,
            },
        }
    }

    /// Evaluate the curve at parameter `t` in [0, 1]
    ///
    /// Bernstein form, so t = 0 and t = 1 land exactly on the end points.
    pub fn point_at(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        match *self {
            Bezier::Quadratic { from, ctrl, to } => {
                from * (mt * mt) + ctrl * (2.0 * mt * t) + to * (t * t)
            }
            Bezier::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                from * (mt * mt * mt)
                    + ctrl1 * (3.0 * mt * mt * t)
                    + ctrl2 * (3.0 * mt * t * t)
                    + to * (t * t * t)
            }
        }
    }

    /// Derivative at t = 1, the direction the curve arrives at its end
    pub fn end_tangent(&self) -> Point {
        match *self {
            Bezier::Quadratic { ctrl, to, .. } => (to - ctrl) * 2.0,
            Bezier::Cubic { ctrl2, to, .. } => (to - ctrl2) * 3.0,
        }
    }

    pub fn sample_count(&self) -> usize {
        match self {
            Bezier::Quadratic { .. } => consts::QUADRATIC_SAMPLES,
            Bezier::Cubic { .. } => consts::CUBIC_SAMPLES,
        }
    }

    /// Sample the curve at its fixed resolution, end points included
    pub fn sample(&self) -> Vec<Point> {
        let segments = self.sample_count();
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }
}

/// Visible part of a sampled curve
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedCurve {
    /// Samples from the crop index to the end
    pub visible: Vec<Point>,
    /// Straight filler from the label-offset point to the first visible sample
    pub filler: Option<Vec<Point>>,
    pub crop_index: usize,
}

/// Index of the sample closest to `target`; the first one wins ties
pub fn nearest_index(samples: &[Point], target: Point) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, p) in samples.iter().enumerate() {
        let d = p.distance(target);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Drop the samples hidden behind the label
///
/// `samples` must hold at least two points. The crop index starts at the sample
/// nearest `offset_start`, then moves forward past any sample still within
/// `exclusion_radius` of `center`, and always leaves two visible points.
pub fn crop_samples(
    samples: &[Point],
    center: Point,
    offset_start: Point,
    exclusion_radius: f32,
) -> CroppedCurve {
    debug_assert!(samples.len() >= 2);
    let last_start = samples.len().saturating_sub(2);

    let mut crop = nearest_index(samples, offset_start);
    while crop < last_start && samples[crop].distance(center) < exclusion_radius {
        crop += 1;
    }
    let crop = crop.min(last_start);

    let filler = (crop > 0).then(|| vec![offset_start, samples[crop]]);
    CroppedCurve {
        visible: samples[crop..].to_vec(),
        filler,
        crop_index: crop,
    }
}

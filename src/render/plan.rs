//! Callout render plans
//!
//! `render` turns one `AnnotationGeometry` into a `RenderPlan`: the exact
//! points both draw adapters paint. It is a pure function with no state, so
//! calling it per annotation per frame (or from several threads) is fine.

use thiserror::Error;

use super::curve::{Bezier, crop_samples};
use super::geometry::{label_radius, label_rect};
use super::terminator::{TerminatorShape, setback};
use crate::domain::{AnnotationGeometry, CoordinateSpace, Point, Rect, Terminator};

/// Input the renderer refuses to draw
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be {requirement}, got {value}")]
    InvalidSize {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
    #[error("label must be at least 1")]
    InvalidLabel,
    #[error("document page height must be positive, got {0}")]
    InvalidPageHeight(f32),
}

/// Opaque rectangle behind the label text
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBox {
    pub rect: Rect,
    pub text: String,
    pub font_size: f32,
}

impl LabelBox {
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn corners(&self) -> [Point; 4] {
        self.rect.corners()
    }

    /// Exclusion radius the visible line keeps from the label center
    pub fn radius(&self) -> f32 {
        label_radius(&self.rect)
    }
}

/// Everything needed to draw one callout, in the caller's coordinate space
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Visible stroke, at least two points
    pub main_path: Vec<Point>,
    /// Background-colored filler from the label-offset point to the curve
    pub underlay_path: Option<Vec<Point>>,
    pub terminator: Option<TerminatorShape>,
    pub label_box: LabelBox,
}

impl RenderPlan {
    fn is_finite(&self) -> bool {
        let terminator = match &self.terminator {
            None => true,
            Some(TerminatorShape::Arrow(pts)) => pts.iter().all(|p| p.is_finite()),
            Some(TerminatorShape::Dot { center, radius }) => center.is_finite() && radius.is_finite(),
        };
        terminator
            && self.main_path.iter().all(|p| p.is_finite())
            && self.underlay_path.iter().flatten().all(|p| p.is_finite())
            && self.label_box.rect.min.is_finite()
            && self.label_box.rect.max.is_finite()
    }

    /// Reflect every point about the page's horizontal midline
    fn flip_y(self, page_height: f32) -> Self {
        let flip = |p: Point| p.flip_y(page_height);
        let rect = Rect::from_corners(
            flip(self.label_box.rect.min),
            flip(self.label_box.rect.max),
        );
        Self {
            main_path: self.main_path.into_iter().map(flip).collect(),
            underlay_path: self
                .underlay_path
                .map(|path| path.into_iter().map(flip).collect()),
            terminator: self.terminator.map(|t| t.map_points(flip)),
            label_box: LabelBox { rect, ..self.label_box },
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, RenderError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RenderError::NonFinite { field })
    }
}

fn finite_point(field: &'static str, p: Point) -> Result<Point, RenderError> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(RenderError::NonFinite { field })
    }
}

fn validate(geo: &AnnotationGeometry) -> Result<(), RenderError> {
    finite_point("start", geo.start)?;
    finite_point("end", geo.end)?;

    if finite("label_font_size", geo.label_font_size)? <= 0.0 {
        return Err(RenderError::InvalidSize {
            field: "label_font_size",
            requirement: "positive",
            value: geo.label_font_size,
        });
    }
    if finite("terminator_size", geo.terminator_size)? < 0.0 {
        return Err(RenderError::InvalidSize {
            field: "terminator_size",
            requirement: "non-negative",
            value: geo.terminator_size,
        });
    }
    if finite("label_gap", geo.label_gap)? < 0.0 {
        return Err(RenderError::InvalidSize {
            field: "label_gap",
            requirement: "non-negative",
            value: geo.label_gap,
        });
    }
    if geo.label == 0 {
        return Err(RenderError::InvalidLabel);
    }
    if let CoordinateSpace::Document { page_height } = geo.space
        && finite("page_height", page_height)? <= 0.0
    {
        return Err(RenderError::InvalidPageHeight(page_height));
    }
    Ok(())
}

/// Compute the render plan for one callout
///
/// Document-space input is reflected into a Y-down working space up front and
/// the finished plan is reflected back, so a curve bulges to the same visual
/// side on the page as it did on screen.
pub fn render(geo: &AnnotationGeometry) -> Result<RenderPlan, RenderError> {
    validate(geo)?;

    let page_height = match geo.space {
        CoordinateSpace::Screen => None,
        CoordinateSpace::Document { page_height } => Some(page_height),
    };
    let to_working = |p: Point| page_height.map_or(p, |h| p.flip_y(h));
    let start = to_working(geo.start);
    let end = to_working(geo.end);

    let text = geo.label.to_string();
    let rect = label_rect(start, &text, geo.label_font_size);
    let radius = label_radius(&rect);
    if !radius.is_finite() {
        return Err(RenderError::NonFinite { field: "label_box" });
    }

    let chord = end - start;
    if !chord.length().is_finite() {
        return Err(RenderError::NonFinite { field: "chord" });
    }
    let offset_start = start + chord.unit() * (radius + geo.label_gap);
    let arrow = geo.terminator == Terminator::Arrow;

    let curve = Bezier::ideal(
        start,
        end,
        geo.line_shape,
        geo.curvature,
        geo.curve_flipped,
    );

    let (main_path, underlay_path, arrival) = match curve {
        None => {
            let path_end = if arrow {
                setback(end, chord, geo.terminator_size)
            } else {
                end
            };
            (vec![offset_start, path_end], None, chord)
        }
        Some(curve) => {
            let tangent = curve.end_tangent();
            let arrival = if tangent.length() > 0.0 { tangent } else { chord };
            let curve = if arrow {
                curve.with_end(setback(end, arrival, geo.terminator_size))
            } else {
                curve
            };
            let samples = curve.sample();
            let cropped = crop_samples(&samples, start, offset_start, radius);
            log::trace!(
                "label {} cropped at sample {}/{}",
                geo.label,
                cropped.crop_index,
                samples.len()
            );
            (cropped.visible, cropped.filler, arrival)
        }
    };

    let plan = RenderPlan {
        main_path,
        underlay_path,
        terminator: TerminatorShape::build(geo.terminator, end, arrival, geo.terminator_size),
        label_box: LabelBox {
            rect,
            text,
            font_size: geo.label_font_size,
        },
    };

    let plan = match page_height {
        Some(h) => plan.flip_y(h),
        None => plan,
    };
    if !plan.is_finite() {
        return Err(RenderError::NonFinite { field: "geometry" });
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineShape;

    fn scenario_a() -> AnnotationGeometry {
        AnnotationGeometry {
            start: Point::new(100.0, 100.0),
            end: Point::new(300.0, 100.0),
            line_shape: LineShape::Straight,
            terminator: Terminator::Arrow,
            label: 5,
            curvature: 0,
            curve_flipped: false,
            label_font_size: 20.0,
            terminator_size: 15.0,
            label_gap: 8.0,
            space: CoordinateSpace::Screen,
        }
    }

    #[test]
    fn test_straight_arrow_path() {
        let plan = render(&scenario_a()).unwrap();
        // Label box 24x32, radius 20, gap 8
        assert_eq!(
            plan.main_path,
            vec![Point::new(128.0, 100.0), Point::new(285.0, 100.0)]
        );
        assert!(plan.underlay_path.is_none());
        let Some(TerminatorShape::Arrow(pts)) = plan.terminator else {
            panic!("expected arrow");
        };
        assert_eq!(pts[0], Point::new(300.0, 100.0));
        assert_eq!(plan.label_box.center(), Point::new(100.0, 100.0));
        assert_eq!(plan.label_box.text, "5");
    }

    #[test]
    fn test_dot_and_none_end_at_target() {
        let mut geo = scenario_a();
        geo.terminator = Terminator::Dot;
        let plan = render(&geo).unwrap();
        assert_eq!(*plan.main_path.last().unwrap(), geo.end);
        assert!(matches!(plan.terminator, Some(TerminatorShape::Dot { .. })));

        geo.terminator = Terminator::None;
        let plan = render(&geo).unwrap();
        assert_eq!(*plan.main_path.last().unwrap(), geo.end);
        assert!(plan.terminator.is_none());
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let mut geo = scenario_a();
        geo.end.x = f32::NAN;
        assert_eq!(
            render(&geo),
            Err(RenderError::NonFinite { field: "end" })
        );

        let mut geo = scenario_a();
        geo.label_gap = f32::INFINITY;
        assert_eq!(
            render(&geo),
            Err(RenderError::NonFinite { field: "label_gap" })
        );
    }

    #[test]
    fn test_rejects_bad_sizes_and_label() {
        let mut geo = scenario_a();
        geo.label_font_size = 0.0;
        assert!(matches!(
            render(&geo),
            Err(RenderError::InvalidSize { field: "label_font_size", .. })
        ));

        let mut geo = scenario_a();
        geo.terminator_size = -1.0;
        assert!(matches!(
            render(&geo),
            Err(RenderError::InvalidSize { field: "terminator_size", .. })
        ));

        let mut geo = scenario_a();
        geo.label = 0;
        assert_eq!(render(&geo), Err(RenderError::InvalidLabel));

        let mut geo = scenario_a();
        geo.space = CoordinateSpace::Document { page_height: 0.0 };
        assert_eq!(render(&geo), Err(RenderError::InvalidPageHeight(0.0)));
    }

    #[test]
    fn test_rejects_overflowing_geometry() {
        let mut geo = scenario_a();
        geo.end = Point::new(3e38, 100.0);
        assert_eq!(render(&geo), Err(RenderError::NonFinite { field: "chord" }));

        geo.line_shape = LineShape::SCurved;
        geo.curvature = 100;
        assert_eq!(render(&geo), Err(RenderError::NonFinite { field: "chord" }));

        let mut geo = scenario_a();
        geo.label_font_size = 3e38;
        assert_eq!(render(&geo), Err(RenderError::NonFinite { field: "label_box" }));

        let mut geo = scenario_a();
        geo.start = Point::new(100.0, -3e38);
        geo.end = Point::new(300.0, -3e38);
        geo.space = CoordinateSpace::Document { page_height: 3e38 };
        assert!(matches!(render(&geo), Err(RenderError::NonFinite { .. })));
    }

    #[test]
    fn test_error_messages() {
        let err = RenderError::InvalidSize {
            field: "label_gap",
            requirement: "non-negative",
            value: -2.0,
        };
        assert_eq!(err.to_string(), "label_gap must be non-negative, got -2");
    }

    #[test]
    fn test_document_label_box_stays_centered() {
        let mut geo = scenario_a();
        geo.space = CoordinateSpace::Document { page_height: 800.0 };
        let plan = render(&geo).unwrap();
        assert_eq!(plan.label_box.center(), Point::new(100.0, 100.0));
        assert_eq!(plan.label_box.rect.width(), 24.0);
        assert_eq!(plan.label_box.rect.height(), 32.0);
    }
}

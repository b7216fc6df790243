//! Annotation types for numbered reference callouts
//!
//! `CalloutAnnotation` is the record the editor keeps and saves.
//! `AnnotationGeometry` is the immutable input handed to the renderer.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Shape of the leader line between the label and the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineShape {
    #[default]
    Straight,
    Curved,
    SCurved,
}

impl LineShape {
    /// Get the next line shape in the cycle
    pub fn next(self) -> Self {
        match self {
            LineShape::Straight => LineShape::Curved,
            LineShape::Curved => LineShape::SCurved,
            LineShape::SCurved => LineShape::Straight,
        }
    }
}

/// Shape drawn at the far end of the leader line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terminator {
    None,
    Dot,
    #[default]
    Arrow,
}

/// Coordinate space the geometry is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// Y increases downward
    #[default]
    Screen,
    /// Y increases upward on a page of the given height
    Document { page_height: f32 },
}

/// Renderer input for a single callout
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationGeometry {
    /// Label anchor (center of the number)
    pub start: Point,
    /// Far endpoint the callout points at
    pub end: Point,
    pub line_shape: LineShape,
    pub terminator: Terminator,
    /// Rendered as decimal text, must be at least 1
    pub label: u32,
    /// 0 = straight, 100 = maximum bend; clamped by the renderer
    pub curvature: i32,
    pub curve_flipped: bool,
    pub label_font_size: f32,
    pub terminator_size: f32,
    /// Clearance between the label edge and the start of the visible line
    pub label_gap: f32,
    pub space: CoordinateSpace,
}

/// Per-annotation sizing, falling back to the configured defaults when absent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalloutSizes {
    pub label_font_size: f32,
    pub terminator_size: f32,
    pub label_gap: f32,
}

impl Default for CalloutSizes {
    fn default() -> Self {
        Self {
            label_font_size: 20.0,
            terminator_size: 15.0,
            label_gap: 8.0,
        }
    }
}

/// Callout record as stored by the editor
///
/// Coordinates are in page-image pixels with Y growing downward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalloutAnnotation {
    pub label: u32,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub line_shape: LineShape,
    #[serde(default)]
    pub terminator: Terminator,
    #[serde(default)]
    pub curvature: i32,
    #[serde(default)]
    pub curve_flipped: bool,
    /// Overrides the configured sizes for this callout only
    #[serde(default)]
    pub sizes: Option<CalloutSizes>,
}

impl CalloutAnnotation {
    /// Straight arrow callout with default sizing
    pub fn new(label: u32, start: Point, end: Point) -> Self {
        Self {
            label,
            start,
            end,
            line_shape: LineShape::Straight,
            terminator: Terminator::Arrow,
            curvature: 0,
            curve_flipped: false,
            sizes: None,
        }
    }

    /// Renderer input in screen space
    pub fn screen_geometry(&self, defaults: CalloutSizes) -> AnnotationGeometry {
        self.geometry(defaults, self.start, self.end, CoordinateSpace::Screen)
    }

    /// Renderer input in document space for a page of `page_height`
    ///
    /// The record is Y-down, so points are reflected into the page's Y-up space.
    pub fn document_geometry(&self, defaults: CalloutSizes, page_height: f32) -> AnnotationGeometry {
        self.geometry(
            defaults,
            self.start.flip_y(page_height),
            self.end.flip_y(page_height),
            CoordinateSpace::Document { page_height },
        )
    }

    fn geometry(
        &self,
        defaults: CalloutSizes,
        start: Point,
        end: Point,
        space: CoordinateSpace,
    ) -> AnnotationGeometry {
        let sizes = self.sizes.unwrap_or(defaults);
        AnnotationGeometry {
            start,
            end,
            line_shape: self.line_shape,
            terminator: self.terminator,
            label: self.label,
            curvature: self.curvature,
            curve_flipped: self.curve_flipped,
            label_font_size: sizes.label_font_size,
            terminator_size: sizes.terminator_size,
            label_gap: sizes.label_gap,
            space,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shape_cycle() {
        assert_eq!(LineShape::Straight.next(), LineShape::Curved);
        assert_eq!(LineShape::Curved.next(), LineShape::SCurved);
        assert_eq!(LineShape::SCurved.next(), LineShape::Straight);
    }

    #[test]
    fn test_document_geometry_reflects_points() {
        let record = CalloutAnnotation::new(3, Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        let geo = record.document_geometry(CalloutSizes::default(), 100.0);
        assert_eq!(geo.start, Point::new(10.0, 80.0));
        assert_eq!(geo.end, Point::new(50.0, 20.0));
        assert_eq!(geo.space, CoordinateSpace::Document { page_height: 100.0 });
    }

    #[test]
    fn test_sizes_override_defaults() {
        let mut record = CalloutAnnotation::new(1, Point::ZERO, Point::new(1.0, 1.0));
        let custom = CalloutSizes {
            label_font_size: 30.0,
            terminator_size: 4.0,
            label_gap: 0.0,
        };
        record.sizes = Some(custom);
        let geo = record.screen_geometry(CalloutSizes::default());
        assert_eq!(geo.label_font_size, 30.0);
        assert_eq!(geo.terminator_size, 4.0);
        assert_eq!(geo.label_gap, 0.0);
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json = r#"{"label": 7, "start": {"x": 1.0, "y": 2.0}, "end": {"x": 3.0, "y": 4.0}}"#;
        let record: CalloutAnnotation = serde_json::from_str(json).unwrap();
        assert_eq!(record.line_shape, LineShape::Straight);
        assert_eq!(record.terminator, Terminator::Arrow);
        assert_eq!(record.curvature, 0);
        assert!(record.sizes.is_none());
    }
}

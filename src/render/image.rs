//! Screen overlay rendering for callouts using tiny-skia
//!
//! These functions paint render plans onto an RgbaImage, scaled by the
//! current zoom factor. Plans are expected in screen space (Y down, page units).

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::circle_cubics;
use super::glyphs::{self, PEN_WIDTH};
use super::plan::{RenderPlan, render};
use super::terminator::TerminatorShape;
use crate::config::{CalloutConfig, ShapeColor};
use crate::domain::{CalloutAnnotation, CalloutSizes, Point};

/// How the overlay paints a plan
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Screen pixels per page unit
    pub zoom: f32,
    pub foreground: ShapeColor,
    pub background: ShapeColor,
    pub highlight: ShapeColor,
    pub highlight_opacity: f32,
    /// Leader line width in page units
    pub stroke_width: f32,
    /// Draw the selection highlight under the paths
    pub selected: bool,
}

impl OverlayStyle {
    pub fn from_config(config: &CalloutConfig, zoom: f32) -> Self {
        Self {
            zoom,
            foreground: config.foreground,
            background: config.background,
            highlight: config.highlight,
            highlight_opacity: config.highlight_opacity,
            stroke_width: config.stroke_width,
            selected: false,
        }
    }
}

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn build_polyline(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

fn build_polygon(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Build a circle path from the shared cubic approximation
fn build_circle_path(center: Point, radius: f32) -> Option<Path> {
    let segments = circle_cubics(center, radius);
    let mut pb = PathBuilder::new();
    pb.move_to(segments[0].0.x, segments[0].0.y);
    for (_, c1, c2, to) in segments {
        pb.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
    }
    pb.close();
    pb.finish()
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    let [r, g, b, a] = rgba;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Paint one plan in layer order: underlay, line, terminator, label box, text
pub fn draw_plan(pixmap: &mut Pixmap, plan: &RenderPlan, style: &OverlayStyle) {
    let transform = Transform::from_scale(style.zoom, style.zoom);
    let fg = paint(style.foreground.to_rgba_u8());
    let bg = paint(style.background.to_rgba_u8());
    let line = round_stroke(style.stroke_width);

    let main = build_polyline(&plan.main_path);
    let underlay = plan.underlay_path.as_deref().and_then(build_polyline);

    // Selection highlight first so the callout itself stays crisp on top
    if style.selected {
        let glow = paint(style.highlight.with_alpha_u8(style.highlight_opacity));
        let wide = round_stroke(style.stroke_width * 4.0);
        for path in [&underlay, &main].into_iter().flatten() {
            pixmap.stroke_path(path, &glow, &wide, transform, None);
        }
    }

    if let Some(path) = &underlay {
        pixmap.stroke_path(path, &bg, &line, transform, None);
    }
    if let Some(path) = &main {
        pixmap.stroke_path(path, &fg, &line, transform, None);
    }

    let terminator = match &plan.terminator {
        Some(TerminatorShape::Arrow(pts)) => build_polygon(pts),
        Some(TerminatorShape::Dot { center, radius }) => build_circle_path(*center, *radius),
        None => None,
    };
    if let Some(path) = terminator {
        pixmap.fill_path(&path, &fg, FillRule::Winding, transform, None);
    }

    let label = &plan.label_box;
    if let Some(path) = build_polygon(&label.corners()) {
        pixmap.fill_path(&path, &bg, FillRule::Winding, transform, None);
        pixmap.stroke_path(&path, &fg, &round_stroke(style.stroke_width * 0.5), transform, None);
    }

    let pen = round_stroke(label.font_size * PEN_WIDTH);
    for stroke in glyphs::layout_text(&label.text, label.center(), label.font_size) {
        if let Some(path) = build_polyline(&stroke) {
            pixmap.stroke_path(&path, &fg, &pen, transform, None);
        }
    }
}

/// Draw callouts onto an image already scaled to `style.zoom`
///
/// Callouts the renderer rejects are logged and skipped. Returns how many were drawn.
pub fn draw_callouts_on_image(
    img: &mut RgbaImage,
    callouts: &[CalloutAnnotation],
    sizes: CalloutSizes,
    style: &OverlayStyle,
    selected: Option<usize>,
) -> usize {
    if callouts.is_empty() {
        return 0;
    }

    let mut drawn = 0;
    with_pixmap(img, |pixmap| {
        for (index, callout) in callouts.iter().enumerate() {
            let plan = match render(&callout.screen_geometry(sizes)) {
                Ok(plan) => plan,
                Err(err) => {
                    log::warn!("Skipping callout {}: {}", callout.label, err);
                    continue;
                }
            };
            let style = OverlayStyle {
                selected: selected == Some(index),
                ..*style
            };
            draw_plan(pixmap, &plan, &style);
            drawn += 1;
        }
    });
    drawn
}

/// Scale the page image by the zoom factor and draw every callout on top
pub fn compose_overlay(
    page: &RgbaImage,
    callouts: &[CalloutAnnotation],
    config: &CalloutConfig,
    zoom: f32,
    selected: Option<usize>,
) -> RgbaImage {
    let mut img = if (zoom - 1.0).abs() > f32::EPSILON {
        let w = ((page.width() as f32 * zoom).round() as u32).max(1);
        let h = ((page.height() as f32 * zoom).round() as u32).max(1);
        image::imageops::resize(page, w, h, image::imageops::FilterType::Triangle)
    } else {
        page.clone()
    };

    let style = OverlayStyle::from_config(config, zoom);
    let drawn = draw_callouts_on_image(&mut img, callouts, config.sizes, &style, selected);
    log::debug!("Drew {}/{} callouts at zoom {}", drawn, callouts.len(), zoom);
    img
}

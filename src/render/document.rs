//! Document export for callouts using pdf-writer
//!
//! Plans are drawn 1:1 into a PDF page in its native Y-up space. Curves go
//! out as straight segments between the same samples the overlay uses, so
//! the page matches the screen.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use pdf_writer::types::{LineCapStyle, LineJoinStyle};
use pdf_writer::{Content, Finish, Name, Pdf, Ref, Str};

use super::geometry::label::DIGIT_WIDTH;
use super::geometry::{circle_cubics, text_width};
use super::glyphs::CAP_HEIGHT;
use super::plan::{RenderPlan, render};
use super::terminator::TerminatorShape;
use crate::config::{CalloutConfig, ShapeColor};
use crate::domain::{CalloutAnnotation, CalloutSizes, Point};

const FONT_NAME: Name<'static> = Name(b"F1");
const IMAGE_NAME: Name<'static> = Name(b"Im1");
/// Helvetica digit advance per unit of font size
const HELVETICA_DIGIT: f32 = 0.556;

/// Colors and line width for exported callouts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentStyle {
    pub foreground: ShapeColor,
    pub background: ShapeColor,
    pub stroke_width: f32,
}

impl DocumentStyle {
    pub fn from_config(config: &CalloutConfig) -> Self {
        Self {
            foreground: config.foreground,
            background: config.background,
            stroke_width: config.stroke_width,
        }
    }
}

/// Page image painted full-page underneath the callouts
struct PageBackground {
    rgb: Vec<u8>,
    width: u32,
    height: u32,
}

/// Writes one PDF page with callouts drawn over an optional page image
pub struct DocumentExporter {
    page_width: f32,
    page_height: f32,
    style: DocumentStyle,
    background: Option<PageBackground>,
}

impl DocumentExporter {
    pub fn new(page_width: f32, page_height: f32, style: DocumentStyle) -> Result<Self> {
        if !(page_width.is_finite() && page_width > 0.0) {
            anyhow::bail!("Page width must be positive, got {page_width}");
        }
        if !(page_height.is_finite() && page_height > 0.0) {
            anyhow::bail!("Page height must be positive, got {page_height}");
        }
        Ok(Self {
            page_width,
            page_height,
            style,
            background: None,
        })
    }

    /// Page sized 1:1 to the image, with the image as background
    pub fn for_page_image(page: &RgbaImage, style: DocumentStyle) -> Result<Self> {
        let mut exporter = Self::new(page.width() as f32, page.height() as f32, style)?;
        exporter.background = Some(PageBackground {
            rgb: page.pixels().flat_map(|p| [p[0], p[1], p[2]]).collect(),
            width: page.width(),
            height: page.height(),
        });
        Ok(exporter)
    }

    /// Build the page content stream for the given callouts
    ///
    /// Callout records are Y-down page pixels; they are converted into the
    /// page's Y-up space before rendering. Rejected callouts are logged and skipped.
    pub fn page_content(&self, callouts: &[CalloutAnnotation], sizes: CalloutSizes) -> Content {
        let mut content = Content::new();

        if self.background.is_some() {
            content.save_state();
            content.transform([self.page_width, 0.0, 0.0, self.page_height, 0.0, 0.0]);
            content.x_object(IMAGE_NAME);
            content.restore_state();
        }

        for callout in callouts {
            match render(&callout.document_geometry(sizes, self.page_height)) {
                Ok(plan) => draw_plan(&mut content, &plan, &self.style),
                Err(err) => log::warn!("Skipping callout {} in export: {}", callout.label, err),
            }
        }
        content
    }

    /// Serialize a complete single-page PDF
    pub fn export(&self, callouts: &[CalloutAnnotation], sizes: CalloutSizes) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let font_id = Ref::new(5);
        let image_id = Ref::new(6);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(pdf_writer::Rect::new(0.0, 0.0, self.page_width, self.page_height));
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        resources.fonts().pair(FONT_NAME, font_id);
        if self.background.is_some() {
            resources.x_objects().pair(IMAGE_NAME, image_id);
        }
        resources.finish();
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        if let Some(bg) = &self.background {
            let mut image = pdf.image_xobject(image_id, &bg.rgb);
            image.width(bg.width as i32);
            image.height(bg.height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();
        }

        let content = self.page_content(callouts, sizes);
        pdf.stream(content_id, &content.finish());

        log::debug!(
            "Exported {} callouts on a {}x{} page",
            callouts.len(),
            self.page_width,
            self.page_height
        );
        pdf.finish()
    }

    pub fn write_to(
        &self,
        path: &Path,
        callouts: &[CalloutAnnotation],
        sizes: CalloutSizes,
    ) -> Result<()> {
        std::fs::write(path, self.export(callouts, sizes))
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn polyline(content: &mut Content, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    content.move_to(first.x, first.y);
    for p in rest {
        content.line_to(p.x, p.y);
    }
}

fn polygon(content: &mut Content, points: &[Point]) {
    polyline(content, points);
    content.close_path();
}

/// Paint one Y-up plan in layer order: underlay, line, terminator, label box, text
pub fn draw_plan(content: &mut Content, plan: &RenderPlan, style: &DocumentStyle) {
    let fg = style.foreground;
    let bg = style.background;

    content.save_state();
    content.set_line_width(style.stroke_width);
    content.set_line_cap(LineCapStyle::RoundCap);
    content.set_line_join(LineJoinStyle::RoundJoin);

    if let Some(underlay) = &plan.underlay_path {
        content.set_stroke_rgb(bg.r, bg.g, bg.b);
        polyline(content, underlay);
        content.stroke();
    }

    content.set_stroke_rgb(fg.r, fg.g, fg.b);
    polyline(content, &plan.main_path);
    content.stroke();

    content.set_fill_rgb(fg.r, fg.g, fg.b);
    match &plan.terminator {
        Some(TerminatorShape::Arrow(pts)) => {
            polygon(content, pts);
            content.fill_nonzero();
        }
        Some(TerminatorShape::Dot { center, radius }) => {
            let segments = circle_cubics(*center, *radius);
            content.move_to(segments[0].0.x, segments[0].0.y);
            for (_, c1, c2, to) in segments {
                content.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
            }
            content.close_path();
            content.fill_nonzero();
        }
        None => {}
    }

    let label = &plan.label_box;
    content.set_fill_rgb(bg.r, bg.g, bg.b);
    content.set_line_width(style.stroke_width * 0.5);
    polygon(content, &label.corners());
    content.fill_nonzero_and_stroke();

    // Stretch Helvetica digits to the shared digit advance so centering matches the overlay
    let center = label.center();
    let width = text_width(&label.text, label.font_size);
    content.begin_text();
    content.set_font(FONT_NAME, label.font_size);
    content.set_horizontal_scaling(DIGIT_WIDTH / HELVETICA_DIGIT * 100.0);
    content.set_fill_rgb(fg.r, fg.g, fg.b);
    content.next_line(
        center.x - width * 0.5,
        center.y - label.font_size * CAP_HEIGHT * 0.5,
    );
    content.show(Str(label.text.as_bytes()));
    content.end_text();

    content.restore_state();
}

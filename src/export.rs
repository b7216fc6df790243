//! Scene loading and file output for the callout binary

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::config::CalloutConfig;
use crate::domain::CalloutAnnotation;
use crate::render::document::{DocumentExporter, DocumentStyle};
use crate::render::image::compose_overlay;

/// One annotated page as saved by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Page image, relative paths resolve against the scene file
    #[serde(default)]
    pub page: Option<PathBuf>,
    /// Page size used when there is no page image
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub callouts: Vec<CalloutAnnotation>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        let mut scene: Scene = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse scene {}", path.display()))?;
        if let (Some(page), Some(dir)) = (&scene.page, path.parent())
            && page.is_relative()
        {
            scene.page = Some(dir.join(page));
        }
        Ok(scene)
    }

    /// The page image, or a blank white page of the declared size
    pub fn page_image(&self) -> Result<RgbaImage> {
        if let Some(path) = &self.page {
            let img = image::open(path)
                .with_context(|| format!("Failed to open page image {}", path.display()))?;
            return Ok(img.to_rgba8());
        }
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => {
                Ok(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255])))
            }
            _ => anyhow::bail!("Scene needs either a page image or a width and height"),
        }
    }
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

pub fn save_rgba(img: &RgbaImage, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(write_png(io::BufWriter::new(file), img)?)
}

/// Files written by one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub overlay_png: PathBuf,
    pub document_pdf: PathBuf,
}

/// Write the zoomed overlay PNG and the 1:1 PDF for a scene
///
/// `stem` is the output path without extension.
pub fn export_scene(
    scene: &Scene,
    config: &CalloutConfig,
    zoom: f32,
    stem: &Path,
) -> Result<ExportOutput> {
    let page = scene.page_image()?;

    let overlay_png = stem.with_extension("png");
    let overlay = compose_overlay(&page, &scene.callouts, config, zoom, None);
    save_rgba(&overlay, &overlay_png)?;
    log::info!("Wrote overlay {}", overlay_png.display());

    let document_pdf = stem.with_extension("pdf");
    let exporter = DocumentExporter::for_page_image(&page, DocumentStyle::from_config(config))?;
    exporter.write_to(&document_pdf, &scene.callouts, config.sizes)?;
    log::info!("Wrote document {}", document_pdf.display());

    Ok(ExportOutput {
        overlay_png,
        document_pdf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    #[test]
    fn test_scene_needs_page_or_size() {
        let scene = Scene {
            page: None,
            width: None,
            height: Some(10),
            callouts: Vec::new(),
        };
        assert!(scene.page_image().is_err());
    }

    #[test]
    fn test_relative_page_resolves_against_scene_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"page": "page.png", "callouts": []}"#).unwrap();
        let scene = Scene::load(&path).unwrap();
        assert_eq!(scene.page, Some(dir.path().join("page.png")));
    }

    #[test]
    fn test_export_scene_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let scene = Scene {
            page: None,
            width: Some(320),
            height: Some(160),
            callouts: vec![CalloutAnnotation::new(
                1,
                Point::new(40.0, 40.0),
                Point::new(250.0, 120.0),
            )],
        };
        let out = export_scene(&scene, &CalloutConfig::default(), 1.5, &dir.path().join("page1"))
            .unwrap();

        let png = image::open(&out.overlay_png).unwrap();
        assert_eq!((png.width(), png.height()), (480, 240));
        let pdf = std::fs::read(&out.document_pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }
}

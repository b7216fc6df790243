//! Configuration persistence for callout settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::CalloutSizes;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Default red callout color
        Self {
            r: 0.9,
            g: 0.1,
            b: 0.1,
        }
    }
}

impl ShapeColor {
    pub const WHITE: ShapeColor = ShapeColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }

    /// Same color with the given opacity, as RGBA (0-255)
    pub fn with_alpha_u8(self, alpha: f32) -> [u8; 4] {
        let [r, g, b, _] = self.to_rgba_u8();
        [r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8]
    }
}

/// Where exported files go when no path is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    pub fn dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }

    /// Timestamped output path with the given extension
    pub fn output_path(self, extension: &str) -> Option<PathBuf> {
        let mut path = self.dir()?;
        let name = chrono::Local::now()
            .format("Callouts_%Y-%m-%d_%H-%M-%S")
            .to_string();
        path.push(format!("{name}.{extension}"));
        Some(path)
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutConfig {
    /// Where to save exports when no path is given
    #[serde(default)]
    pub save_location: SaveLocation,
    /// Stroke, terminator, and label text color
    #[serde(default)]
    pub foreground: ShapeColor,
    /// Label box fill and underlay color
    #[serde(default = "default_background")]
    pub background: ShapeColor,
    /// Selection highlight color in the overlay
    #[serde(default = "default_highlight")]
    pub highlight: ShapeColor,
    /// Selection highlight opacity (0.0-1.0)
    #[serde(default = "default_highlight_opacity")]
    pub highlight_opacity: f32,
    /// Leader line width in page units
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Sizes used by callouts without their own
    #[serde(default)]
    pub sizes: CalloutSizes,
    /// Grab distance for endpoint handles, in page units
    #[serde(default = "default_handle_radius")]
    pub handle_radius: f32,
}

fn default_background() -> ShapeColor {
    ShapeColor::WHITE
}

fn default_highlight() -> ShapeColor {
    ShapeColor {
        r: 0.2,
        g: 0.5,
        b: 1.0,
    } // Blue
}

fn default_highlight_opacity() -> f32 {
    0.35
}

fn default_stroke_width() -> f32 {
    2.0
}

fn default_handle_radius() -> f32 {
    10.0
}

impl CalloutConfig {
    pub const APP_DIR: &'static str = "callout";
    pub const FILE_NAME: &'static str = "config.json";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl Default for CalloutConfig {
    fn default() -> Self {
        Self {
            save_location: SaveLocation::Pictures,
            foreground: ShapeColor::default(),
            background: default_background(),
            highlight: default_highlight(),
            highlight_opacity: default_highlight_opacity(),
            stroke_width: default_stroke_width(),
            sizes: CalloutSizes::default(),
            handle_radius: default_handle_radius(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(ShapeColor::WHITE.to_rgba_u8(), [255, 255, 255, 255]);
        assert_eq!(ShapeColor::WHITE.with_alpha_u8(0.5), [255, 255, 255, 128]);
        assert_eq!(ShapeColor::WHITE.with_alpha_u8(3.0)[3], 255);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CalloutConfig = serde_json::from_str(r#"{"stroke_width": 3.5}"#).unwrap();
        assert_eq!(config.stroke_width, 3.5);
        assert_eq!(config.background, ShapeColor::WHITE);
        assert_eq!(config.sizes, CalloutSizes::default());
        assert_eq!(config.handle_radius, 10.0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = CalloutConfig::default();
        config.save_location = SaveLocation::Documents;
        config.sizes.label_gap = 2.0;
        config.save_to(&path).unwrap();
        assert_eq!(CalloutConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = CalloutConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}

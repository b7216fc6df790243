//! Callout rendering module
//!
//! This module contains:
//! - Geometry shared between screen rendering and document export
//! - The pure render plan computation (curves, terminators, label boxes)
//! - Image rendering using tiny-skia (interactive overlay)
//! - PDF content writing using pdf-writer (document export)

pub mod curve;
pub mod document;
pub mod geometry;
pub mod glyphs;
pub mod image;
pub mod plan;
pub mod terminator;

pub use plan::{LabelBox, RenderError, RenderPlan, render};
pub use terminator::TerminatorShape;

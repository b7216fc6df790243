//! Numbered reference callouts
//!
//! A callout is a number label, a leader line, and a terminator. The same
//! `render` call feeds both the interactive overlay and the PDF exporter so
//! the two always agree.

pub mod config;
pub mod domain;
pub mod export;
pub mod overlay;
pub mod render;

pub use domain::{
    AnnotationGeometry, CalloutAnnotation, CoordinateSpace, LineShape, Point, Terminator,
};
pub use render::{RenderError, RenderPlan, render};

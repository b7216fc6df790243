//! Interactive overlay editing
//!
//! This module provides:
//! - The endpoint drag state machine
//! - The editing session that applies overlay messages and draws frames

pub mod drag;
pub mod session;

pub use drag::{DragEffect, DragState, EndpointRef, Handle, PointerEvent};
pub use session::{OverlayMsg, OverlaySession};

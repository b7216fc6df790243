//! Overlay editing session
//!
//! Owns the callout list for one page plus the drag state machine. Input
//! arrives as `OverlayMsg` values on a channel and is drained once per frame.

use crossbeam_channel::Receiver;
use image::RgbaImage;

use super::drag::{DragEffect, DragState, PointerEvent};
use crate::config::CalloutConfig;
use crate::domain::{CalloutAnnotation, Point, Terminator};
use crate::render::image::compose_overlay;

/// Messages the overlay accepts
#[derive(Debug, Clone)]
pub enum OverlayMsg {
    /// Pointer input in screen pixels
    Pointer(PointerEvent),
    /// Set the zoom factor (screen pixels per page unit)
    Zoom(f32),
    /// Add a new callout
    Add(CalloutAnnotation),
    /// Select a callout by index, or clear the selection
    Select(Option<usize>),
    /// Cycle the selected callout's line shape
    CycleLineShape,
    /// Set the selected callout's curvature
    SetCurvature(i32),
    /// Mirror the selected callout's curve
    FlipCurve,
    /// Set the selected callout's terminator
    SetTerminator(Terminator),
    /// Remove the selected callout
    Delete,
    /// Undo last edit
    Undo,
    /// Redo undone edit
    Redo,
}

/// A reversible change to the callout list
#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Add(CalloutAnnotation),
    Replace {
        index: usize,
        before: CalloutAnnotation,
        after: CalloutAnnotation,
    },
    Remove {
        index: usize,
        callout: CalloutAnnotation,
    },
}

#[derive(Debug, Clone)]
pub struct OverlaySession {
    callouts: Vec<CalloutAnnotation>,
    drag: DragState,
    history: Vec<Edit>,
    history_index: usize,
    zoom: f32,
    selected: Option<usize>,
    handle_radius: f32,
}

impl OverlaySession {
    pub fn new(callouts: Vec<CalloutAnnotation>, config: &CalloutConfig) -> Self {
        Self {
            callouts,
            drag: DragState::Idle,
            history: Vec::new(),
            history_index: 0,
            zoom: 1.0,
            selected: None,
            handle_radius: config.handle_radius,
        }
    }

    pub fn callouts(&self) -> &[CalloutAnnotation] {
        &self.callouts
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Handle every pending message; returns true if anything needs a redraw
    pub fn drain(&mut self, rx: &Receiver<OverlayMsg>) -> bool {
        let mut changed = false;
        for msg in rx.try_iter() {
            changed |= self.handle(msg);
        }
        changed
    }

    /// Handle one message; returns true if anything needs a redraw
    pub fn handle(&mut self, msg: OverlayMsg) -> bool {
        match msg {
            OverlayMsg::Pointer(event) => self.handle_pointer(event),
            OverlayMsg::Zoom(zoom) => {
                if !(zoom.is_finite() && zoom > 0.0) {
                    log::warn!("Ignoring invalid zoom {}", zoom);
                    return false;
                }
                self.zoom = zoom;
                true
            }
            OverlayMsg::Add(callout) => {
                self.callouts.push(callout.clone());
                self.selected = Some(self.callouts.len() - 1);
                self.record(Edit::Add(callout));
                true
            }
            OverlayMsg::Select(index) => {
                let index = index.filter(|&i| i < self.callouts.len());
                let changed = self.selected != index;
                self.selected = index;
                changed
            }
            OverlayMsg::CycleLineShape => self.edit_selected(|c| c.line_shape = c.line_shape.next()),
            OverlayMsg::SetCurvature(curvature) => {
                self.edit_selected(|c| c.curvature = curvature.clamp(0, 100))
            }
            OverlayMsg::FlipCurve => self.edit_selected(|c| c.curve_flipped = !c.curve_flipped),
            OverlayMsg::SetTerminator(terminator) => self.edit_selected(|c| c.terminator = terminator),
            OverlayMsg::Delete => {
                if !self.drag.is_idle() {
                    return false;
                }
                let Some(index) = self.selected.take() else {
                    return false;
                };
                let callout = self.callouts.remove(index);
                self.record(Edit::Remove { index, callout });
                true
            }
            OverlayMsg::Undo => self.undo(),
            OverlayMsg::Redo => self.redo(),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let to_page = |p: Point| p * (1.0 / self.zoom);
        let event = match event {
            PointerEvent::Press(p) => PointerEvent::Press(to_page(p)),
            PointerEvent::Move(p) => PointerEvent::Move(to_page(p)),
            PointerEvent::Release(p) => PointerEvent::Release(to_page(p)),
            other => other,
        };

        let (state, effect) = self.drag.handle(event, &self.callouts, self.handle_radius);
        self.drag = state;
        match effect {
            DragEffect::None => false,
            DragEffect::Grabbed(endpoint) => {
                self.selected = Some(endpoint.index);
                true
            }
            DragEffect::Moved { endpoint, to } | DragEffect::Reverted { endpoint, to } => {
                endpoint.set(&mut self.callouts, to);
                true
            }
            DragEffect::Committed { endpoint, from, to } => {
                let Some(callout) = self.callouts.get_mut(endpoint.index) else {
                    return false;
                };
                endpoint.move_on(callout, to);
                let after = callout.clone();
                let mut before = after.clone();
                endpoint.move_on(&mut before, from);
                if before != after {
                    self.record(Edit::Replace {
                        index: endpoint.index,
                        before,
                        after,
                    });
                }
                true
            }
        }
    }

    fn edit_selected(&mut self, f: impl FnOnce(&mut CalloutAnnotation)) -> bool {
        // Property edits wait until a drag settles
        if !self.drag.is_idle() {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        let Some(callout) = self.callouts.get_mut(index) else {
            return false;
        };
        let before = callout.clone();
        f(callout);
        if *callout == before {
            return false;
        }
        let after = callout.clone();
        self.record(Edit::Replace {
            index,
            before,
            after,
        });
        true
    }

    fn record(&mut self, edit: Edit) {
        // Truncate any redo history
        self.history.truncate(self.history_index);
        self.history.push(edit);
        self.history_index = self.history.len();
    }

    pub fn undo(&mut self) -> bool {
        if self.history_index == 0 || !self.drag.is_idle() {
            return false;
        }
        self.history_index -= 1;
        match self.history[self.history_index].clone() {
            Edit::Add(_) => {
                self.callouts.pop();
            }
            Edit::Replace { index, before, .. } => self.callouts[index] = before,
            Edit::Remove { index, callout } => self.callouts.insert(index, callout),
        }
        self.selected = self.selected.filter(|&i| i < self.callouts.len());
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history_index >= self.history.len() || !self.drag.is_idle() {
            return false;
        }
        match self.history[self.history_index].clone() {
            Edit::Add(callout) => self.callouts.push(callout),
            Edit::Replace { index, after, .. } => self.callouts[index] = after,
            Edit::Remove { index, .. } => {
                self.callouts.remove(index);
            }
        }
        self.history_index += 1;
        self.selected = self.selected.filter(|&i| i < self.callouts.len());
        true
    }

    /// Current frame: the page at the current zoom with every callout drawn
    pub fn frame(&self, page: &RgbaImage, config: &CalloutConfig) -> RgbaImage {
        compose_overlay(page, &self.callouts, config, self.zoom, self.selected)
    }
}

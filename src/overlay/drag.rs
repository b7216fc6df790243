//! Endpoint drag state machine for the interactive overlay
//!
//! Pointer input moves a callout endpoint through
//! `Idle -> Dragging -> Confirming -> Idle`. Cancel restores the original point.

use crate::domain::{CalloutAnnotation, Point};

/// Which end of a callout is grabbed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    /// The label anchor
    Start,
    /// The far endpoint
    End,
}

/// A grabbed endpoint of one callout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointRef {
    pub index: usize,
    pub handle: Handle,
}

impl EndpointRef {
    pub fn get(self, callouts: &[CalloutAnnotation]) -> Option<Point> {
        let callout = callouts.get(self.index)?;
        Some(match self.handle {
            Handle::Start => callout.start,
            Handle::End => callout.end,
        })
    }

    pub fn set(self, callouts: &mut [CalloutAnnotation], to: Point) {
        if let Some(callout) = callouts.get_mut(self.index) {
            self.move_on(callout, to);
        }
    }

    /// Move this handle's point on an already looked-up callout
    pub fn move_on(self, callout: &mut CalloutAnnotation, to: Point) {
        match self.handle {
            Handle::Start => callout.start = to,
            Handle::End => callout.end = to,
        }
    }
}

/// Pointer input in page units
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
    /// Accept the pending move (Enter)
    Confirm,
    /// Abandon the drag (Escape)
    Cancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        endpoint: EndpointRef,
        origin: Point,
    },
    Confirming {
        endpoint: EndpointRef,
        origin: Point,
        to: Point,
    },
}

/// What the caller has to apply after a transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEffect {
    None,
    /// A handle was grabbed
    Grabbed(EndpointRef),
    /// Live update while dragging
    Moved { endpoint: EndpointRef, to: Point },
    /// The move was accepted
    Committed {
        endpoint: EndpointRef,
        from: Point,
        to: Point,
    },
    /// The endpoint goes back where it started
    Reverted { endpoint: EndpointRef, to: Point },
}

/// Endpoint within `radius` of `p`, nearest first; later callouts win ties since they draw on top
pub fn hit_test(callouts: &[CalloutAnnotation], p: Point, radius: f32) -> Option<EndpointRef> {
    let mut best: Option<(EndpointRef, f32)> = None;
    for (index, callout) in callouts.iter().enumerate() {
        for (handle, at) in [(Handle::Start, callout.start), (Handle::End, callout.end)] {
            let d = at.distance(p);
            if d <= radius && best.is_none_or(|(_, best_d)| d <= best_d) {
                best = Some((EndpointRef { index, handle }, d));
            }
        }
    }
    best.map(|(endpoint, _)| endpoint)
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }

    /// Advance the machine by one event
    pub fn handle(
        self,
        event: PointerEvent,
        callouts: &[CalloutAnnotation],
        radius: f32,
    ) -> (DragState, DragEffect) {
        match (self, event) {
            (DragState::Idle, PointerEvent::Press(p)) => match hit_test(callouts, p, radius) {
                Some(endpoint) => {
                    let origin = endpoint.get(callouts).unwrap_or(p);
                    (
                        DragState::Dragging { endpoint, origin },
                        DragEffect::Grabbed(endpoint),
                    )
                }
                None => (DragState::Idle, DragEffect::None),
            },
            (DragState::Dragging { endpoint, origin }, PointerEvent::Move(to)) => (
                DragState::Dragging { endpoint, origin },
                DragEffect::Moved { endpoint, to },
            ),
            (DragState::Dragging { endpoint, origin }, PointerEvent::Release(to)) => (
                DragState::Confirming {
                    endpoint,
                    origin,
                    to,
                },
                DragEffect::Moved { endpoint, to },
            ),
            (
                DragState::Confirming {
                    endpoint,
                    origin,
                    to,
                },
                PointerEvent::Confirm,
            ) => (
                DragState::Idle,
                DragEffect::Committed {
                    endpoint,
                    from: origin,
                    to,
                },
            ),
            (
                DragState::Dragging { endpoint, origin }
                | DragState::Confirming {
                    endpoint, origin, ..
                },
                PointerEvent::Cancel,
            ) => (
                DragState::Idle,
                DragEffect::Reverted {
                    endpoint,
                    to: origin,
                },
            ),
            (state, _) => (state, DragEffect::None),
        }
    }
}

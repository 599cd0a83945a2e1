//! Pointer input and gesture output types.

use glam::Vec2;
use horizon_gesture_core::{GestureId, MemberId, Point};
use serde::Serialize;

use crate::descriptor::{GestureCallback, GestureFamily};

/// Phase of a pointer event within one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// First contact; starts a new stream.
    Down,
    /// Contact moved.
    Move,
    /// Last contact lifted; ends the stream.
    Up,
    /// The platform took the stream away.
    Cancel,
}

/// One contact point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: u64,
    pub position: Point,
}

impl Pointer {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

/// A pointer event as delivered by the platform.
///
/// `position` is the primary pointer in device pixels; `pointers` lists every
/// contact currently down (the primary included). Timestamps are platform
/// milliseconds and only their differences matter.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub pointers: Vec<Pointer>,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Creates a single-pointer event.
    pub fn new(phase: PointerPhase, position: Point, timestamp_ms: u64) -> Self {
        Self {
            phase,
            position,
            pointers: vec![Pointer::new(0, position)],
            timestamp_ms,
        }
    }

    /// Replaces the contact list. The first pointer becomes the primary position.
    pub fn with_pointers(mut self, pointers: Vec<Pointer>) -> Self {
        if let Some(first) = pointers.first() {
            self.position = first.position;
        }
        self.pointers = pointers;
        self
    }

    /// The same event with a different phase.
    pub fn with_phase(&self, phase: PointerPhase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    #[inline]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// The first two contacts, if present.
    pub fn pointer_pair(&self) -> Option<(Point, Point)> {
        match self.pointers.as_slice() {
            [a, b, ..] => Some((a.position, b.position)),
            _ => None,
        }
    }
}

/// Family-specific payload of a gesture callback. Lengths are in dip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GestureParams {
    /// Raw contact report (touches callbacks, tap, long-press).
    #[serde(rename_all = "camelCase")]
    Touch {
        x: f32,
        y: f32,
        timestamp: u64,
    },
    /// Scrolling families (pan, default, native).
    #[serde(rename_all = "camelCase")]
    Scroll {
        x: f32,
        y: f32,
        delta_x: f32,
        delta_y: f32,
        scroll_x: f32,
        scroll_y: f32,
        is_at_start: bool,
        is_at_end: bool,
    },
    /// Release velocity in dip per second.
    #[serde(rename_all = "camelCase")]
    Fling {
        velocity_x: f32,
        velocity_y: f32,
        scroll_x: f32,
        scroll_y: f32,
    },
    /// Two-pointer spread around a focal point.
    #[serde(rename_all = "camelCase")]
    Pinch {
        focus_x: f32,
        focus_y: f32,
        scale: f32,
    },
    /// Two-pointer twist around a focal point, in degrees.
    #[serde(rename_all = "camelCase")]
    Rotation {
        focus_x: f32,
        focus_y: f32,
        rotation: f32,
    },
}

impl GestureParams {
    pub(crate) fn touch(position: Vec2, timestamp: u64) -> Self {
        Self::Touch {
            x: position.x,
            y: position.y,
            timestamp,
        }
    }
}

/// A resolved gesture callback addressed to the runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent {
    pub member: MemberId,
    pub gesture: GestureId,
    pub family: GestureFamily,
    pub callback: GestureCallback,
    pub params: GestureParams,
}

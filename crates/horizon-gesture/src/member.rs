//! The capability a UI node implements to take part in arbitration.

use glam::Vec2;
use horizon_gesture_core::MemberId;

use crate::descriptor::DescriptorSet;

/// Which end of a scrollable range a border check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderEdge {
    Start,
    End,
}

/// Inclusive range of drag angles, in degrees, that a node claims.
///
/// Angles follow [`Point::angle_to`](horizon_gesture_core::Point::angle_to):
/// 0 is rightwards, 90 downwards, and values lie in `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start: f32,
    pub end: f32,
}

impl AngleRange {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.start && angle <= self.end
    }
}

/// A UI node that can compete for pointer streams.
///
/// The registry owns members behind `Box<dyn ArenaMember>`; the node keeps only
/// the [`MemberHandle`](horizon_gesture_core::MemberHandle) it was given at
/// registration.
pub trait ArenaMember {
    /// Stable id assigned by the runtime.
    fn member_id(&self) -> MemberId;

    /// Current declarations. Read at registration and after
    /// [`set_descriptors`](Self::set_descriptors).
    fn descriptors(&self) -> &DescriptorSet;

    /// Replaces the declarations wholesale.
    fn set_descriptors(&mut self, descriptors: DescriptorSet);

    /// Horizontal scroll offset in pixels.
    fn scroll_x(&self) -> f32 {
        0.0
    }

    /// Vertical scroll offset in pixels.
    fn scroll_y(&self) -> f32 {
        0.0
    }

    /// Whether the scroll position rests on `edge`.
    fn is_at_border(&self, _edge: BorderEdge) -> bool {
        false
    }

    /// Whether the node would absorb a scroll by `delta` pixels.
    fn can_consume_gesture(&self, delta: Vec2) -> bool;

    /// Scrolls the node by `delta` pixels on behalf of a Default recognizer.
    fn on_gesture_scroll_by(&mut self, _delta: Vec2) {}

    /// Asks the node to redraw after gesture-driven changes.
    fn on_invalidate(&mut self) {}

    /// Drag angle ranges for which the node wants the native ancestor to stop
    /// intercepting.
    fn consume_slide_angles(&self) -> &[AngleRange] {
        &[]
    }

    /// Whether the node declares any slide angle ranges.
    fn has_slide_angles(&self) -> bool {
        !self.consume_slide_angles().is_empty()
    }
}

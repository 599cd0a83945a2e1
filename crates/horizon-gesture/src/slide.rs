//! Slide-angle escalation to the native ancestor.
//!
//! Members may declare drag angle ranges they want to own
//! ([`ArenaMember::consume_slide_angles`](crate::member::ArenaMember::consume_slide_angles)).
//! While a stream is armed the dispatcher keeps asking the nearest native
//! ancestor to stop intercepting; once the drag leaves the dead zone its angle
//! is checked once and the answer is kept for the rest of the stream.

use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{MemberId, Point};

use crate::event::{PointerEvent, PointerPhase};
use crate::registry::ArenaRegistry;
use crate::sink::GestureSink;

/// Outcome of the angle check for the current stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideStatus {
    /// Not decided yet (press, or still inside the dead zone).
    #[default]
    Undefined,
    /// A chain member claims the drag angle.
    Enable,
    /// No member claims it; the ancestor may intercept.
    Disable,
}

/// Per-stream slide escalation state.
#[derive(Debug, Clone, Default)]
pub struct SlideConsumer {
    armed: bool,
    origin: Point,
    status: SlideStatus,
}

impl SlideConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn status(&self) -> SlideStatus {
        self.status
    }

    /// Whether some member of the current chain declared angles at press time.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feeds one pointer event. Returns `true` while the event is being
    /// claimed by a member's slide angles.
    pub fn consume(
        &mut self,
        registry: &ArenaRegistry,
        chain: &[MemberId],
        event: &PointerEvent,
        sink: &mut dyn GestureSink,
    ) -> bool {
        match event.phase {
            PointerPhase::Down => self.on_press(registry, chain, event, sink),
            PointerPhase::Move => self.on_move(registry, chain, event, sink),
            PointerPhase::Up | PointerPhase::Cancel => self.on_release(sink),
        }
    }

    fn on_press(
        &mut self,
        registry: &ArenaRegistry,
        chain: &[MemberId],
        event: &PointerEvent,
        sink: &mut dyn GestureSink,
    ) -> bool {
        self.status = SlideStatus::Undefined;
        self.origin = event.position;
        self.armed = chain
            .iter()
            .filter_map(|&id| registry.member(id))
            .any(|member| member.has_slide_angles());
        if self.armed {
            tracing::trace!(target: targets::SLIDE, "slide escalation armed");
            sink.request_disallow_intercept(true);
        }
        false
    }

    fn on_move(
        &mut self,
        registry: &ArenaRegistry,
        chain: &[MemberId],
        event: &PointerEvent,
        sink: &mut dyn GestureSink,
    ) -> bool {
        if !self.armed {
            return false;
        }
        let dead_zone = registry.config().dip_to_px(registry.config().slide_dead_zone);
        let travelled = (event.position.to_vec2() - self.origin.to_vec2()).abs();
        if travelled.x <= dead_zone && travelled.y <= dead_zone {
            sink.request_disallow_intercept(true);
            return false;
        }

        if self.status == SlideStatus::Undefined {
            let angle = self.origin.angle_to(event.position);
            let claimant = chain.iter().copied().find(|&id| {
                registry.member(id).is_some_and(|member| {
                    member
                        .consume_slide_angles()
                        .iter()
                        .any(|range| range.contains(angle))
                })
            });
            self.status = if claimant.is_some() {
                SlideStatus::Enable
            } else {
                SlideStatus::Disable
            };
            tracing::debug!(
                target: targets::SLIDE,
                angle,
                claimant = ?claimant,
                status = ?self.status,
                "slide angle decided"
            );
        }
        sink.request_disallow_intercept(self.status == SlideStatus::Enable)
    }

    fn on_release(&mut self, sink: &mut dyn GestureSink) -> bool {
        sink.request_disallow_intercept(false);
        self.armed = false;
        self.status = SlideStatus::Undefined;
        false
    }
}

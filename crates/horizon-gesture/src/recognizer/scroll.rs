use glam::Vec2;
use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Delta-driven scrolling for the `Default` and `Native` families.
///
/// Each move produces `delta = last - current`. While the member can consume
/// the delta the recognizer stays ACTIVE; the first delta it cannot consume
/// yields one last update and then FAIL, handing the stream to the next
/// candidate. `Default` scrolls the member itself through
/// [`ArenaMember::on_gesture_scroll_by`](crate::member::ArenaMember::on_gesture_scroll_by);
/// `Native` leaves scrolling to the platform view.
#[derive(Debug, Clone)]
pub struct ScrollRecognizer {
    native: bool,
    last: Option<Point>,
    delta: Vec2,
}

impl ScrollRecognizer {
    pub(super) fn new(native: bool) -> Self {
        Self {
            native,
            last: None,
            delta: Vec2::ZERO,
        }
    }

    /// Whether scrolling is left to the platform.
    pub fn is_native(&self) -> bool {
        self.native
    }

    pub(super) fn handle(
        &mut self,
        core: &mut RecognizerCore,
        cx: &mut RecognizerContext<'_>,
        event: &PointerEvent,
    ) {
        match event.phase {
            PointerPhase::Down => {
                self.last = Some(event.position);
                self.delta = Vec2::ZERO;
            }
            PointerPhase::Move => {
                let last = self.last.replace(event.position).unwrap_or(event.position);
                self.delta = last.to_vec2() - event.position.to_vec2();
                if self.delta == Vec2::ZERO {
                    return;
                }
                core.begin(cx, self.params(cx));
                if !cx.member.can_consume_gesture(self.delta) {
                    core.update(cx, self.params(cx));
                    core.fail(cx, self.params(cx));
                    return;
                }
                core.activate(cx, self.params(cx));
                if !self.native {
                    cx.member.on_gesture_scroll_by(self.delta);
                }
                core.update(cx, self.params(cx));
                cx.member.on_invalidate();
            }
            PointerPhase::Up => {
                self.delta = Vec2::ZERO;
                if core.state() == GestureState::Active {
                    core.end(cx, self.params(cx));
                } else {
                    core.fail(cx, self.params(cx));
                }
            }
            PointerPhase::Cancel => core.fail(cx, self.params(cx)),
        }
    }

    pub(super) fn params(&self, cx: &RecognizerContext<'_>) -> GestureParams {
        cx.scroll_params(self.last.unwrap_or(Point::ZERO), self.delta)
    }

    pub(super) fn reset(&mut self) {
        self.last = None;
        self.delta = Vec2::ZERO;
    }
}

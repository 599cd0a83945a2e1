use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::config::{ArenaConfig, DEFAULT_PINCH_MIN_SPAN};
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Two-pointer spread.
///
/// The first event carrying two contacts fixes the reference span; the
/// recognizer begins there and commits once the span has changed by more
/// than `minSpan` (dip). Scale is reported relative to the reference span.
#[derive(Debug, Clone)]
pub struct PinchRecognizer {
    min_span: f32,
    initial_span: Option<f32>,
    span: f32,
    focus: Point,
}

impl PinchRecognizer {
    pub(super) fn new(tuning: &GestureConfig, config: &ArenaConfig) -> Self {
        Self {
            min_span: config.dip_to_px(tuning.f32_or("minSpan", DEFAULT_PINCH_MIN_SPAN)),
            initial_span: None,
            span: 0.0,
            focus: Point::ZERO,
        }
    }

    fn scale(&self) -> f32 {
        match self.initial_span {
            Some(initial) if initial > 0.0 => self.span / initial,
            _ => 1.0,
        }
    }

    pub(super) fn handle(
        &mut self,
        core: &mut RecognizerCore,
        cx: &mut RecognizerContext<'_>,
        event: &PointerEvent,
    ) {
        match event.phase {
            PointerPhase::Down | PointerPhase::Move => {
                let Some((a, b)) = event.pointer_pair() else {
                    return;
                };
                self.span = a.distance(b);
                self.focus = a.midpoint(b);
                let initial = *self.initial_span.get_or_insert(self.span);
                core.begin(cx, self.params(cx));
                if (self.span - initial).abs() > self.min_span {
                    core.activate(cx, self.params(cx));
                }
                core.update(cx, self.params(cx));
            }
            PointerPhase::Up => {
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
        let focus = cx.to_dip(self.focus.to_vec2());
        GestureParams::Pinch {
            focus_x: focus.x,
            focus_y: focus.y,
            scale: self.scale(),
        }
    }

    pub(super) fn reset(&mut self) {
        self.initial_span = None;
        self.span = 0.0;
        self.focus = Point::ZERO;
    }
}

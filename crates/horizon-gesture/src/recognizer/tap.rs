use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::config::ArenaConfig;
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Short press and release in place.
///
/// Begins on the press. Moving further than `maxDistance` (dip) or holding
/// longer than `maxDuration` (ms) fails it; a release within both limits
/// commits and ends in one step.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    max_distance: f32,
    max_duration_ms: u64,
    origin: Option<(Point, u64)>,
    last: Point,
    timestamp: u64,
}

impl TapRecognizer {
    pub(super) fn new(tuning: &GestureConfig, config: &ArenaConfig) -> Self {
        Self {
            max_distance: config.dip_to_px(tuning.f32_or("maxDistance", config.tap_slop)),
            max_duration_ms: tuning.u64_or("maxDuration", config.tap_timeout_ms),
            origin: None,
            last: Point::ZERO,
            timestamp: 0,
        }
    }

    fn within_limits(&self, event: &PointerEvent) -> bool {
        let Some((origin, down_at)) = self.origin else {
            return false;
        };
        origin.distance(event.position) <= self.max_distance
            && event.timestamp_ms.saturating_sub(down_at) <= self.max_duration_ms
    }

    pub(super) fn handle(
        &mut self,
        core: &mut RecognizerCore,
        cx: &mut RecognizerContext<'_>,
        event: &PointerEvent,
    ) {
        self.last = event.position;
        self.timestamp = event.timestamp_ms;
        match event.phase {
            PointerPhase::Down => {
                self.origin = Some((event.position, event.timestamp_ms));
                core.begin(cx, self.params(cx));
            }
            PointerPhase::Move => {
                if !self.within_limits(event) {
                    core.fail(cx, self.params(cx));
                }
            }
            PointerPhase::Up => {
                if core.state() == GestureState::Begin && self.within_limits(event) {
                    core.activate(cx, self.params(cx));
                    core.end(cx, self.params(cx));
                } else {
                    core.fail(cx, self.params(cx));
                }
            }
            PointerPhase::Cancel => core.fail(cx, self.params(cx)),
        }
    }

    pub(super) fn params(&self, cx: &RecognizerContext<'_>) -> GestureParams {
        cx.touch_params(self.last, self.timestamp)
    }

    pub(super) fn reset(&mut self) {
        self.origin = None;
        self.last = Point::ZERO;
        self.timestamp = 0;
    }
}

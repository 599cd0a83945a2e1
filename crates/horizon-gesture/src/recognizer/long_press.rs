use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::config::ArenaConfig;
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Press held in place.
///
/// Hold time is measured between event timestamps; there is no timer, so
/// activation is observed on the first event at or after `minDuration` (ms).
/// Moving further than `maxDistance` (dip) fails it.
#[derive(Debug, Clone)]
pub struct LongPressRecognizer {
    max_distance: f32,
    min_duration_ms: u64,
    origin: Option<(Point, u64)>,
    last: Point,
    timestamp: u64,
}

impl LongPressRecognizer {
    pub(super) fn new(tuning: &GestureConfig, config: &ArenaConfig) -> Self {
        Self {
            max_distance: config.dip_to_px(tuning.f32_or("maxDistance", config.tap_slop)),
            min_duration_ms: tuning.u64_or("minDuration", config.long_press_timeout_ms),
            origin: None,
            last: Point::ZERO,
            timestamp: 0,
        }
    }

    fn held_long_enough(&self, event: &PointerEvent) -> bool {
        self.origin.is_some_and(|(_, down_at)| {
            event.timestamp_ms.saturating_sub(down_at) >= self.min_duration_ms
        })
    }

    fn moved_too_far(&self, event: &PointerEvent) -> bool {
        self.origin
            .is_some_and(|(origin, _)| origin.distance(event.position) > self.max_distance)
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
                if self.moved_too_far(event) {
                    core.fail(cx, self.params(cx));
                } else if core.state() == GestureState::Begin && self.held_long_enough(event) {
                    core.activate(cx, self.params(cx));
                }
            }
            PointerPhase::Up => {
                if core.state() == GestureState::Begin
                    && self.held_long_enough(event)
                    && !self.moved_too_far(event)
                {
                    core.activate(cx, self.params(cx));
                }
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
        cx.touch_params(self.last, self.timestamp)
    }

    pub(super) fn reset(&mut self) {
        self.origin = None;
        self.last = Point::ZERO;
        self.timestamp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::GestureState;
    use crate::descriptor::{GestureCallback, GestureDescriptor, GestureFamily};
    use crate::event::PointerPhase;

    #[test]
    fn test_hold_activates_on_timestamps() {
        let mut h = Harness::new();
        let mut press = make_recognizer(GestureDescriptor::new(1, GestureFamily::LongPress));
        h.feed(&mut press, &make_pointer(PointerPhase::Down, 0.0, 0.0, 1000));
        h.feed(&mut press, &make_pointer(PointerPhase::Move, 1.0, 0.0, 1200));
        assert_eq!(press.state(), GestureState::Begin);
        h.feed(&mut press, &make_pointer(PointerPhase::Move, 1.0, 1.0, 1500));
        assert_eq!(press.state(), GestureState::Active);
        h.feed(&mut press, &make_pointer(PointerPhase::Up, 1.0, 1.0, 1700));
        assert_eq!(press.state(), GestureState::End);
        assert_eq!(
            h.callbacks(),
            vec![
                GestureCallback::Begin,
                GestureCallback::Start,
                GestureCallback::End
            ]
        );
    }

    #[test]
    fn test_release_after_duration_without_moves() {
        let mut h = Harness::new();
        let mut press = make_recognizer(
            GestureDescriptor::new(1, GestureFamily::LongPress).with_config("minDuration", 200),
        );
        h.feed(&mut press, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut press, &make_pointer(PointerPhase::Up, 0.0, 0.0, 250));
        assert_eq!(press.state(), GestureState::End);
    }

    #[test]
    fn test_early_release_fails() {
        let mut h = Harness::new();
        let mut press = make_recognizer(GestureDescriptor::new(1, GestureFamily::LongPress));
        h.feed(&mut press, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut press, &make_pointer(PointerPhase::Up, 0.0, 0.0, 100));
        assert_eq!(press.state(), GestureState::Fail);
    }

    #[test]
    fn test_drift_fails() {
        let mut h = Harness::new();
        let mut press = make_recognizer(GestureDescriptor::new(1, GestureFamily::LongPress));
        h.feed(&mut press, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut press, &make_pointer(PointerPhase::Move, 0.0, 40.0, 600));
        assert_eq!(press.state(), GestureState::Fail);
    }
}

use glam::Vec2;
use horizon_gesture_core::Point;

use super::{RecognizerContext, RecognizerCore};
use crate::config::ArenaConfig;
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Release-velocity gesture.
///
/// Tracks the drag in BEGIN without reporting it. On release the stream
/// velocity decides: above `minVelocity` (dip/s) on either axis the
/// recognizer commits, reports the velocity once and ends; otherwise it fails.
#[derive(Debug, Clone)]
pub struct FlingRecognizer {
    min_velocity: f32,
    origin: Option<Point>,
    velocity: Vec2,
}

impl FlingRecognizer {
    pub(super) fn new(tuning: &GestureConfig, config: &ArenaConfig) -> Self {
        Self {
            min_velocity: tuning.f32_or("minVelocity", config.fling_velocity_threshold),
            origin: None,
            velocity: Vec2::ZERO,
        }
    }

    pub(super) fn handle(
        &mut self,
        core: &mut RecognizerCore,
        cx: &mut RecognizerContext<'_>,
        event: &PointerEvent,
    ) {
        match event.phase {
            PointerPhase::Down => {
                self.origin = Some(event.position);
                self.velocity = Vec2::ZERO;
            }
            PointerPhase::Move => {
                let origin = *self.origin.get_or_insert(event.position);
                if origin != event.position {
                    core.begin(cx, self.params(cx));
                }
            }
            PointerPhase::Up => {
                self.velocity = cx.velocity;
                let velocity = cx.to_dip(self.velocity).abs();
                if velocity.x > self.min_velocity || velocity.y > self.min_velocity {
                    core.activate(cx, self.params(cx));
                    core.update(cx, self.params(cx));
                    core.end(cx, self.params(cx));
                } else {
                    core.fail(cx, self.params(cx));
                }
            }
            PointerPhase::Cancel => core.fail(cx, self.params(cx)),
        }
    }

    pub(super) fn params(&self, cx: &RecognizerContext<'_>) -> GestureParams {
        let velocity = cx.to_dip(self.velocity);
        let scroll = cx.to_dip(Vec2::new(cx.member.scroll_x(), cx.member.scroll_y()));
        GestureParams::Fling {
            velocity_x: velocity.x,
            velocity_y: velocity.y,
            scroll_x: scroll.x,
            scroll_y: scroll.y,
        }
    }

    pub(super) fn reset(&mut self) {
        self.origin = None;
        self.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::super::test_support::*;
    use super::super::GestureState;
    use crate::descriptor::{GestureCallback, GestureDescriptor, GestureFamily};
    use crate::event::{GestureParams, PointerPhase};

    #[test]
    fn test_fast_release_flings() {
        let mut h = Harness::new();
        let mut fling = make_recognizer(GestureDescriptor::new(1, GestureFamily::Fling));

        h.feed(&mut fling, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut fling, &make_pointer(PointerPhase::Move, 40.0, 0.0, 16));
        assert_eq!(fling.state(), GestureState::Begin);
        assert_eq!(h.callbacks(), vec![GestureCallback::Begin]);

        h.velocity = Vec2::new(2500.0, 0.0);
        h.feed(&mut fling, &make_pointer(PointerPhase::Up, 40.0, 0.0, 32));
        assert_eq!(fling.state(), GestureState::End);
        assert_eq!(
            h.callbacks(),
            vec![
                GestureCallback::Begin,
                GestureCallback::Start,
                GestureCallback::Update,
                GestureCallback::End
            ]
        );
        match h.sink.events()[2].params {
            GestureParams::Fling { velocity_x, .. } => assert_eq!(velocity_x, 2500.0),
            ref other => panic!("unexpected params {other:?}"),
        }
    }

    #[test]
    fn test_slow_release_fails() {
        let mut h = Harness::new();
        let mut fling = make_recognizer(GestureDescriptor::new(1, GestureFamily::Fling));

        h.feed(&mut fling, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut fling, &make_pointer(PointerPhase::Move, 4.0, 0.0, 200));
        h.velocity = Vec2::new(20.0, 0.0);
        h.feed(&mut fling, &make_pointer(PointerPhase::Up, 4.0, 0.0, 400));
        assert_eq!(fling.state(), GestureState::Fail);
    }

    #[test]
    fn test_min_velocity_override() {
        let mut h = Harness::new();
        let mut fling = make_recognizer(
            GestureDescriptor::new(1, GestureFamily::Fling).with_config("minVelocity", 10),
        );
        h.feed(&mut fling, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.velocity = Vec2::new(0.0, -20.0);
        h.feed(&mut fling, &make_pointer(PointerPhase::Up, 0.0, -4.0, 200));
        assert_eq!(fling.state(), GestureState::End);
    }
}

use glam::Vec2;
use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::config::ArenaConfig;
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Continuous drag.
///
/// Stays in INIT until the drag exceeds `minDistance` (dip) on either axis,
/// then begins and commits on the same move.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    min_distance: f32,
    start: Option<Point>,
    last: Point,
    delta: Vec2,
}

impl PanRecognizer {
    pub(super) fn new(tuning: &GestureConfig, config: &ArenaConfig) -> Self {
        Self {
            min_distance: config.dip_to_px(tuning.f32_or("minDistance", 0.0)),
            start: None,
            last: Point::ZERO,
            delta: Vec2::ZERO,
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
                self.start = Some(event.position);
                self.last = event.position;
                self.delta = Vec2::ZERO;
            }
            PointerPhase::Move => {
                let start = *self.start.get_or_insert(event.position);
                self.delta = event.position.to_vec2() - self.last.to_vec2();
                self.last = event.position;

                if core.state() == GestureState::Init {
                    let travelled = (event.position.to_vec2() - start.to_vec2()).abs();
                    if travelled.x <= self.min_distance && travelled.y <= self.min_distance {
                        return;
                    }
                    core.begin(cx, self.params(cx));
                    core.activate(cx, self.params(cx));
                }
                core.update(cx, self.params(cx));
            }
            PointerPhase::Up => {
                self.last = event.position;
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
        cx.scroll_params(self.last, self.delta)
    }

    pub(super) fn reset(&mut self) {
        self.start = None;
        self.last = Point::ZERO;
        self.delta = Vec2::ZERO;
    }
}

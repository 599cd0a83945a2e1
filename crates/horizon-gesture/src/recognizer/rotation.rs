use horizon_gesture_core::Point;

use super::{GestureState, RecognizerContext, RecognizerCore};
use crate::config::DEFAULT_ROTATION_MIN_ANGLE;
use crate::descriptor::GestureConfig;
use crate::event::{GestureParams, PointerEvent, PointerPhase};

/// Folds an angle difference into `(-180, 180]`.
fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Two-pointer twist.
///
/// Measures the angle of the line through the first two contacts against the
/// angle seen on the first two-contact event, and commits once it has turned
/// by at least `minAngle` degrees.
#[derive(Debug, Clone)]
pub struct RotationRecognizer {
    min_angle: f32,
    initial_angle: Option<f32>,
    rotation: f32,
    focus: Point,
}

impl RotationRecognizer {
    pub(super) fn new(tuning: &GestureConfig) -> Self {
        Self {
            min_angle: tuning.f32_or("minAngle", DEFAULT_ROTATION_MIN_ANGLE),
            initial_angle: None,
            rotation: 0.0,
            focus: Point::ZERO,
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
                let angle = a.angle_to(b);
                let initial = *self.initial_angle.get_or_insert(angle);
                self.rotation = normalize_degrees(angle - initial);
                self.focus = a.midpoint(b);
                core.begin(cx, self.params(cx));
                if self.rotation.abs() >= self.min_angle {
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
        GestureParams::Rotation {
            focus_x: focus.x,
            focus_y: focus.y,
            rotation: self.rotation,
        }
    }

    pub(super) fn reset(&mut self) {
        self.initial_angle = None;
        self.rotation = 0.0;
        self.focus = Point::ZERO;
    }
}

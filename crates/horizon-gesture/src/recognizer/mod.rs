//! Per-member, per-descriptor recognizer state machines.
//!
//! Every recognizer follows the same contract:
//!
//! ```text
//! INIT ──threshold──▶ BEGIN ──commit──▶ ACTIVE ──release──▶ END
//!   │                   │                  │
//!   └───────────────────┴──────fail()──────┴──────────────▶ FAIL
//! ```
//!
//! FAIL and END are terminal for the current pointer stream; only
//! [`Recognizer::reset`], issued when a new stream starts, brings a
//! recognizer back to INIT. Families differ only in their activation
//! predicate and in how they derive the payload from the pointer stream; that
//! logic lives in one module per family and is selected by matching on
//! [`RecognizerKind`].

mod fling;
mod long_press;
mod pan;
mod pinch;
mod rotation;
mod scroll;
mod tap;

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use horizon_gesture_core::logging::targets;
use horizon_gesture_core::{ArenaError, GestureId, MemberId, Point, vec_to_dip};

use crate::config::ArenaConfig;
use crate::descriptor::{GestureCallback, GestureDescriptor, GestureFamily};
use crate::event::{GestureEvent, GestureParams, PointerEvent, PointerPhase};
use crate::member::{ArenaMember, BorderEdge};
use crate::sink::GestureSink;

pub use fling::FlingRecognizer;
pub use long_press::LongPressRecognizer;
pub use pan::PanRecognizer;
pub use pinch::PinchRecognizer;
pub use rotation::RotationRecognizer;
pub use scroll::ScrollRecognizer;
pub use tap::TapRecognizer;

/// Progress of a recognizer within one pointer stream.
///
/// Ordered by wire code; the resolver relies on `Init < Begin < Active` being
/// the "still competing" states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum GestureState {
    #[default]
    Init = 0,
    Begin = 1,
    Active = 2,
    Fail = 3,
    End = 4,
}

impl GestureState {
    /// `true` in BEGIN or ACTIVE.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Begin | Self::Active)
    }

    /// `true` in FAIL or END.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fail | Self::End)
    }

    /// `true` while the recognizer may still claim the stream.
    #[inline]
    pub fn is_alive(self) -> bool {
        !self.is_terminal()
    }

    /// Wire code used by hosts.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a state by wire code.
    pub fn from_code(code: i32) -> Result<Self, ArenaError> {
        match code {
            0 => Ok(Self::Init),
            1 => Ok(Self::Begin),
            2 => Ok(Self::Active),
            3 => Ok(Self::Fail),
            4 => Ok(Self::End),
            other => Err(ArenaError::InvalidStateCode(other)),
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Begin => "BEGIN",
            Self::Active => "ACTIVE",
            Self::Fail => "FAIL",
            Self::End => "END",
        };
        f.write_str(name)
    }
}

/// Everything a recognizer may touch while handling an event.
pub struct RecognizerContext<'a> {
    pub member_id: MemberId,
    pub member: &'a mut dyn ArenaMember,
    pub sink: &'a mut dyn GestureSink,
    pub config: &'a ArenaConfig,
    /// Velocity of the stream so far, in pixels per second.
    pub velocity: Vec2,
}

impl RecognizerContext<'_> {
    #[inline]
    fn to_dip(&self, v: Vec2) -> Vec2 {
        vec_to_dip(v, self.config.density)
    }

    /// Payload shared by the scrolling families.
    fn scroll_params(&self, position: Point, delta: Vec2) -> GestureParams {
        let pos = self.to_dip(position.to_vec2());
        let delta = self.to_dip(delta);
        let scroll = self.to_dip(Vec2::new(self.member.scroll_x(), self.member.scroll_y()));
        GestureParams::Scroll {
            x: pos.x,
            y: pos.y,
            delta_x: delta.x,
            delta_y: delta.y,
            scroll_x: scroll.x,
            scroll_y: scroll.y,
            is_at_start: self.member.is_at_border(BorderEdge::Start),
            is_at_end: self.member.is_at_border(BorderEdge::End),
        }
    }

    fn touch_params(&self, position: Point, timestamp: u64) -> GestureParams {
        GestureParams::touch(self.to_dip(position.to_vec2()), timestamp)
    }
}

/// Family-independent half of a recognizer: state, once-per-stream callback
/// bookkeeping and emission.
#[derive(Debug, Clone)]
pub struct RecognizerCore {
    descriptor: Arc<GestureDescriptor>,
    state: GestureState,
    began: bool,
    started: bool,
    finished: bool,
}

impl RecognizerCore {
    fn new(descriptor: Arc<GestureDescriptor>) -> Self {
        Self {
            descriptor,
            state: GestureState::Init,
            began: false,
            started: false,
            finished: false,
        }
    }

    #[inline]
    pub fn state(&self) -> GestureState {
        self.state
    }

    fn set_state(&mut self, member: MemberId, state: GestureState) {
        if self.state != state {
            tracing::trace!(
                target: targets::RECOGNIZER,
                %member,
                gesture = %self.descriptor.id(),
                family = %self.descriptor.family(),
                from = %self.state,
                to = %state,
                "recognizer transition"
            );
            self.state = state;
        }
    }

    fn emit(&self, cx: &mut RecognizerContext<'_>, callback: GestureCallback, params: GestureParams) {
        if !self.descriptor.callbacks().contains(callback) {
            return;
        }
        cx.sink.emit(GestureEvent {
            member: cx.member_id,
            gesture: self.descriptor.id(),
            family: self.descriptor.family(),
            callback,
            params,
        });
    }

    /// INIT -> BEGIN.
    fn begin(&mut self, cx: &mut RecognizerContext<'_>, params: GestureParams) {
        if self.state != GestureState::Init {
            return;
        }
        self.set_state(cx.member_id, GestureState::Begin);
        if !self.began {
            self.began = true;
            self.emit(cx, GestureCallback::Begin, params);
        }
    }

    /// INIT/BEGIN -> ACTIVE, passing through BEGIN if needed.
    fn activate(&mut self, cx: &mut RecognizerContext<'_>, params: GestureParams) {
        if self.state == GestureState::Init {
            self.begin(cx, params.clone());
        }
        if self.state != GestureState::Begin {
            return;
        }
        self.set_state(cx.member_id, GestureState::Active);
        if !self.started {
            self.started = true;
            self.emit(cx, GestureCallback::Start, params);
        }
    }

    /// Progress report; only delivered while ACTIVE.
    fn update(&mut self, cx: &mut RecognizerContext<'_>, params: GestureParams) {
        if self.state == GestureState::Active {
            self.emit(cx, GestureCallback::Update, params);
        }
    }

    /// Any live state -> END.
    fn end(&mut self, cx: &mut RecognizerContext<'_>, params: GestureParams) {
        if self.state.is_terminal() {
            return;
        }
        self.set_state(cx.member_id, GestureState::End);
        if self.began && !self.finished {
            self.finished = true;
            self.emit(cx, GestureCallback::End, params);
        }
    }

    /// Any live state -> FAIL. Recognizers that never began fail silently.
    fn fail(&mut self, cx: &mut RecognizerContext<'_>, params: GestureParams) {
        if self.state.is_terminal() {
            return;
        }
        self.set_state(cx.member_id, GestureState::Fail);
        if self.began && !self.finished {
            self.finished = true;
            self.emit(cx, GestureCallback::Fail, params);
        }
    }

    fn reset(&mut self) {
        self.state = GestureState::Init;
        self.began = false;
        self.started = false;
        self.finished = false;
    }
}

/// Family-specific half of a recognizer.
#[derive(Debug, Clone)]
pub enum RecognizerKind {
    Pan(PanRecognizer),
    Fling(FlingRecognizer),
    /// Default and Native share the scroll implementation.
    Scroll(ScrollRecognizer),
    Tap(TapRecognizer),
    LongPress(LongPressRecognizer),
    Rotation(RotationRecognizer),
    Pinch(PinchRecognizer),
}

impl RecognizerKind {
    fn for_descriptor(descriptor: &GestureDescriptor, config: &ArenaConfig) -> Self {
        let tuning = descriptor.config();
        match descriptor.family() {
            GestureFamily::Pan => Self::Pan(PanRecognizer::new(tuning, config)),
            GestureFamily::Fling => Self::Fling(FlingRecognizer::new(tuning, config)),
            GestureFamily::Default => Self::Scroll(ScrollRecognizer::new(false)),
            GestureFamily::Native => Self::Scroll(ScrollRecognizer::new(true)),
            GestureFamily::Tap => Self::Tap(TapRecognizer::new(tuning, config)),
            GestureFamily::LongPress => Self::LongPress(LongPressRecognizer::new(tuning, config)),
            GestureFamily::Rotation => Self::Rotation(RotationRecognizer::new(tuning)),
            GestureFamily::Pinch => Self::Pinch(PinchRecognizer::new(tuning, config)),
        }
    }

    fn handle(&mut self, core: &mut RecognizerCore, cx: &mut RecognizerContext<'_>, event: &PointerEvent) {
        match self {
            Self::Pan(r) => r.handle(core, cx, event),
            Self::Fling(r) => r.handle(core, cx, event),
            Self::Scroll(r) => r.handle(core, cx, event),
            Self::Tap(r) => r.handle(core, cx, event),
            Self::LongPress(r) => r.handle(core, cx, event),
            Self::Rotation(r) => r.handle(core, cx, event),
            Self::Pinch(r) => r.handle(core, cx, event),
        }
    }

    fn params(&self, cx: &RecognizerContext<'_>) -> GestureParams {
        match self {
            Self::Pan(r) => r.params(cx),
            Self::Fling(r) => r.params(cx),
            Self::Scroll(r) => r.params(cx),
            Self::Tap(r) => r.params(cx),
            Self::LongPress(r) => r.params(cx),
            Self::Rotation(r) => r.params(cx),
            Self::Pinch(r) => r.params(cx),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Pan(r) => r.reset(),
            Self::Fling(r) => r.reset(),
            Self::Scroll(r) => r.reset(),
            Self::Tap(r) => r.reset(),
            Self::LongPress(r) => r.reset(),
            Self::Rotation(r) => r.reset(),
            Self::Pinch(r) => r.reset(),
        }
    }
}

/// One recognizer state machine, bound to a descriptor on a member.
#[derive(Debug, Clone)]
pub struct Recognizer {
    core: RecognizerCore,
    kind: RecognizerKind,
}

impl Recognizer {
    /// Builds the recognizer for `descriptor`, reading its tuning once.
    pub fn new(descriptor: Arc<GestureDescriptor>, config: &ArenaConfig) -> Self {
        let kind = RecognizerKind::for_descriptor(&descriptor, config);
        Self {
            core: RecognizerCore::new(descriptor),
            kind,
        }
    }

    #[inline]
    pub fn state(&self) -> GestureState {
        self.core.state
    }

    /// `true` in BEGIN or ACTIVE.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.core.state.is_active()
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<GestureDescriptor> {
        &self.core.descriptor
    }

    #[inline]
    pub fn gesture_id(&self) -> GestureId {
        self.core.descriptor.id()
    }

    #[inline]
    pub fn family(&self) -> GestureFamily {
        self.core.descriptor.family()
    }

    pub fn kind(&self) -> &RecognizerKind {
        &self.kind
    }

    /// Feeds one pointer event. Terminal recognizers ignore input.
    pub fn handle(&mut self, cx: &mut RecognizerContext<'_>, event: &PointerEvent) {
        if self.core.state.is_terminal() {
            return;
        }
        self.kind.handle(&mut self.core, cx, event);
    }

    /// Forces FAIL (lost arbitration, host request or cancel).
    pub fn fail(&mut self, cx: &mut RecognizerContext<'_>) {
        let params = self.kind.params(cx);
        self.core.fail(cx, params);
    }

    /// Forces END (host request).
    pub fn end(&mut self, cx: &mut RecognizerContext<'_>) {
        let params = self.kind.params(cx);
        self.core.end(cx, params);
    }

    /// Forces a commit (host request). Terminal recognizers are left alone.
    pub fn activate(&mut self, cx: &mut RecognizerContext<'_>) {
        let params = self.kind.params(cx);
        self.core.activate(cx, params);
    }

    /// Back to INIT for a new stream.
    pub fn reset(&mut self) {
        self.core.reset();
        self.kind.reset();
    }

    /// Bubble delivery of the raw contact report (`onTouches*`).
    ///
    /// Independent of the recognizer's state.
    pub fn touches(&mut self, cx: &mut RecognizerContext<'_>, event: &PointerEvent) {
        let callback = match event.phase {
            PointerPhase::Down => GestureCallback::TouchesDown,
            PointerPhase::Move => GestureCallback::TouchesMove,
            PointerPhase::Up => GestureCallback::TouchesUp,
            PointerPhase::Cancel => GestureCallback::TouchesCancel,
        };
        let params = cx.touch_params(event.position, event.timestamp_ms);
        self.core.emit(cx, callback, params);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_state_codes() {
        for code in 0..5 {
            assert_eq!(GestureState::from_code(code).unwrap().code(), code);
        }
        assert!(GestureState::from_code(5).is_err());
        assert!(GestureState::Init < GestureState::Active);
        assert!(GestureState::Active < GestureState::Fail);
    }

    #[test]
    fn test_is_active_only_in_begin_or_active() {
        assert!(!GestureState::Init.is_active());
        assert!(GestureState::Begin.is_active());
        assert!(GestureState::Active.is_active());
        assert!(!GestureState::Fail.is_active());
        assert!(!GestureState::End.is_active());
    }

    #[test]
    fn test_terminal_state_ignores_input_until_reset() {
        let mut h = Harness::new();
        let mut pan = make_recognizer(GestureDescriptor::new(1, GestureFamily::Pan));

        h.feed(&mut pan, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut pan, &make_pointer(PointerPhase::Move, 5.0, 0.0, 16));
        assert_eq!(pan.state(), GestureState::Active);

        h.fail(&mut pan);
        assert_eq!(pan.state(), GestureState::Fail);
        let emitted = h.sink.events().len();

        h.feed(&mut pan, &make_pointer(PointerPhase::Move, 20.0, 0.0, 32));
        h.feed(&mut pan, &make_pointer(PointerPhase::Up, 20.0, 0.0, 48));
        assert_eq!(h.sink.events().len(), emitted);
        assert_eq!(pan.state(), GestureState::Fail);

        pan.reset();
        assert_eq!(pan.state(), GestureState::Init);
        h.feed(&mut pan, &make_pointer(PointerPhase::Down, 0.0, 0.0, 100));
        h.feed(&mut pan, &make_pointer(PointerPhase::Move, 5.0, 0.0, 116));
        assert_eq!(pan.state(), GestureState::Active);
        assert!(h.sink.events().len() > emitted);
    }

    #[test]
    fn test_fail_without_begin_is_silent() {
        let mut h = Harness::new();
        let mut pan = make_recognizer(GestureDescriptor::new(1, GestureFamily::Pan));
        h.fail(&mut pan);
        assert_eq!(pan.state(), GestureState::Fail);
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn test_disabled_callbacks_are_not_emitted() {
        let mut h = Harness::new();
        let descriptor = GestureDescriptor::new(1, GestureFamily::Pan)
            .with_callbacks([GestureCallback::Update].into_iter().collect());
        let mut pan = make_recognizer(descriptor);

        h.feed(&mut pan, &make_pointer(PointerPhase::Down, 0.0, 0.0, 0));
        h.feed(&mut pan, &make_pointer(PointerPhase::Move, 5.0, 0.0, 16));
        h.feed(&mut pan, &make_pointer(PointerPhase::Up, 5.0, 0.0, 32));
        assert_eq!(h.callbacks(), vec![GestureCallback::Update]);
    }

    #[test]
    fn test_touches_callbacks_follow_phase() {
        let mut h = Harness::new();
        let descriptor = GestureDescriptor::new(1, GestureFamily::Tap).with_callbacks(
            crate::descriptor::CallbackSet::from_names(["onTouchesDown", "onTouchesUp"]),
        );
        let mut tap = make_recognizer(descriptor);
        let mut cx = RecognizerContext {
            member_id: MemberId(1),
            member: &mut h.member,
            sink: &mut h.sink,
            config: &h.config,
            velocity: Vec2::ZERO,
        };
        tap.touches(&mut cx, &make_pointer(PointerPhase::Down, 2.0, 2.0, 0));
        tap.touches(&mut cx, &make_pointer(PointerPhase::Move, 3.0, 2.0, 5));
        tap.touches(&mut cx, &make_pointer(PointerPhase::Up, 3.0, 2.0, 10));
        assert_eq!(
            h.callbacks(),
            vec![GestureCallback::TouchesDown, GestureCallback::TouchesUp]
        );
        assert_eq!(tap.state(), GestureState::Init);
    }
}

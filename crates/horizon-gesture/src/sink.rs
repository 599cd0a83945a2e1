//! Delivery channel back to the embedding runtime.

use horizon_gesture_core::MemberId;

use crate::descriptor::GestureCallback;
use crate::event::GestureEvent;

/// Receives resolved gesture callbacks and ancestor-interception requests.
///
/// Implemented by the embedding runtime. All calls happen synchronously on the
/// UI-event thread while a pointer event is being processed.
pub trait GestureSink {
    /// Delivers one gesture callback.
    fn emit(&mut self, event: GestureEvent);

    /// Asks the nearest native ancestor view to stop (or resume) intercepting
    /// the stream.
    ///
    /// Returns the value that was actually applied; a host without a native
    /// ancestor returns `false`.
    fn request_disallow_intercept(&mut self, disallow: bool) -> bool {
        disallow
    }
}

/// A sink that records everything it receives.
///
/// Handy for tests and for hosts that batch callbacks before forwarding them.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<GestureEvent>,
    intercept_requests: Vec<bool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded callbacks, oldest first.
    pub fn events(&self) -> &[GestureEvent] {
        &self.events
    }

    /// All interception requests, oldest first.
    pub fn intercept_requests(&self) -> &[bool] {
        &self.intercept_requests
    }

    /// Callbacks addressed to `member`.
    pub fn events_for(&self, member: MemberId) -> impl Iterator<Item = &GestureEvent> {
        self.events.iter().filter(move |e| e.member == member)
    }

    /// The callback kinds addressed to `member`, in order.
    pub fn callbacks_for(&self, member: MemberId) -> Vec<GestureCallback> {
        self.events_for(member).map(|e| e.callback).collect()
    }

    /// Takes the recorded callbacks, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<GestureEvent> {
        self.intercept_requests.clear();
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.intercept_requests.clear();
    }
}

impl GestureSink for RecordingSink {
    fn emit(&mut self, event: GestureEvent) {
        self.events.push(event);
    }

    fn request_disallow_intercept(&mut self, disallow: bool) -> bool {
        self.intercept_requests.push(disallow);
        disallow
    }
}

impl<S: GestureSink + ?Sized> GestureSink for &mut S {
    fn emit(&mut self, event: GestureEvent) {
        (**self).emit(event);
    }

    fn request_disallow_intercept(&mut self, disallow: bool) -> bool {
        (**self).request_disallow_intercept(disallow)
    }
}

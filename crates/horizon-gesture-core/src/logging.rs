//! Logging and tracing facilities for Horizon Gesture.
//!
//! Horizon Gesture uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see arbitration traces install one in the
//! embedding application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_gesture=trace")
//!     .init();
//! ```
//!
//! State transitions are logged at `trace`, arbitration outcomes (winner
//! changes, chain invalidation) at `debug`, and integration mistakes such as a
//! hit-tested node missing from the registry at `warn`.

/// Span names used throughout Horizon Gesture for tracing.
pub mod span_names {
    /// One pointer event, from hit-test to callback delivery.
    pub const POINTER_EVENT: &str = "horizon_gesture::pointer_event";
    /// Compete-chain construction.
    pub const COMPETE: &str = "horizon_gesture::compete";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Per-event timing spans.
    pub const PERF: &str = "horizon_gesture::perf";
    /// Member registration and relation index.
    pub const REGISTRY: &str = "horizon_gesture::registry";
    /// Compete-chain construction and re-competition.
    pub const RESOLVER: &str = "horizon_gesture::resolver";
    /// Recognizer state transitions.
    pub const RECOGNIZER: &str = "horizon_gesture::recognizer";
    /// Pointer-stream dispatch.
    pub const DISPATCHER: &str = "horizon_gesture::dispatcher";
    /// Slide-angle escalation to the native ancestor.
    pub const SLIDE: &str = "horizon_gesture::slide";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time a unit of work such as processing one pointer event.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

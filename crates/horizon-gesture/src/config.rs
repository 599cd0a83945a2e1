//! Arena-wide tuning.
//!
//! Values expressed in dip are converted to pixels with [`ArenaConfig::density`]
//! at the point of use. Per-descriptor `config` entries override the family
//! defaults listed here.

/// Default release speed, in dip per second, above which a fling is recognized.
pub const DEFAULT_FLING_VELOCITY_THRESHOLD: f32 = 300.0;

/// Default radius, in dip, inside which slide-angle checks are deferred.
pub const DEFAULT_SLIDE_DEAD_ZONE: f32 = 10.0;

/// Default maximum movement for a tap or long-press, in dip.
pub const DEFAULT_TAP_SLOP: f32 = 10.0;

/// Default tap timeout in milliseconds.
///
/// A tap must complete within this duration to be recognized.
pub const DEFAULT_TAP_TIMEOUT_MS: u64 = 300;

/// Default long-press timeout in milliseconds.
///
/// A press must be held for at least this duration to trigger a long-press.
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 500;

/// Default horizon of the velocity tracker in milliseconds.
pub const DEFAULT_VELOCITY_WINDOW_MS: u64 = 100;

/// Default span change, in dip, before a pinch commits.
pub const DEFAULT_PINCH_MIN_SPAN: f32 = 8.0;

/// Default angle change, in degrees, before a rotation commits.
pub const DEFAULT_ROTATION_MIN_ANGLE: f32 = 2.0;

/// What the dispatcher does when a move lands outside the active chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainInvalidation {
    /// Any move whose hit-test chain no longer ends with the active chain
    /// clears the stream; the next move starts a fresh arbitration.
    #[default]
    Always,
    /// Same as `Always` until the winner reaches ACTIVE; afterwards the chain
    /// is kept so a drag may leave the node it started on.
    UntilActive,
}

/// How `simultaneous` relations are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimultaneousMode {
    /// Two members co-win only if each lists a gesture of the other.
    #[default]
    Mutual,
    /// A member co-wins as soon as the winner lists one of its gestures.
    Declared,
}

/// Configuration for a gesture arena.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Device pixels per device-independent unit.
    pub density: f32,
    /// Fling threshold in dip per second.
    pub fling_velocity_threshold: f32,
    /// Slide-angle dead zone in dip.
    pub slide_dead_zone: f32,
    /// Tap / long-press movement slop in dip.
    pub tap_slop: f32,
    /// Tap timeout in milliseconds.
    pub tap_timeout_ms: u64,
    /// Long-press hold duration in milliseconds.
    pub long_press_timeout_ms: u64,
    /// Velocity tracker horizon in milliseconds.
    pub velocity_window_ms: u64,
    /// Mid-stream chain invalidation policy.
    pub chain_invalidation: ChainInvalidation,
    /// Simultaneous relation matching.
    pub simultaneous: SimultaneousMode,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            fling_velocity_threshold: DEFAULT_FLING_VELOCITY_THRESHOLD,
            slide_dead_zone: DEFAULT_SLIDE_DEAD_ZONE,
            tap_slop: DEFAULT_TAP_SLOP,
            tap_timeout_ms: DEFAULT_TAP_TIMEOUT_MS,
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
            chain_invalidation: ChainInvalidation::default(),
            simultaneous: SimultaneousMode::default(),
        }
    }
}

impl ArenaConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display density.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Sets the fling threshold in dip per second.
    pub fn with_fling_velocity_threshold(mut self, threshold: f32) -> Self {
        self.fling_velocity_threshold = threshold;
        self
    }

    /// Sets the slide-angle dead zone in dip.
    pub fn with_slide_dead_zone(mut self, dead_zone: f32) -> Self {
        self.slide_dead_zone = dead_zone;
        self
    }

    /// Sets the tap slop in dip.
    pub fn with_tap_slop(mut self, slop: f32) -> Self {
        self.tap_slop = slop;
        self
    }

    /// Sets the tap timeout in milliseconds.
    pub fn with_tap_timeout_ms(mut self, timeout: u64) -> Self {
        self.tap_timeout_ms = timeout;
        self
    }

    /// Sets the long-press duration in milliseconds.
    pub fn with_long_press_timeout_ms(mut self, timeout: u64) -> Self {
        self.long_press_timeout_ms = timeout;
        self
    }

    /// Sets the velocity tracker horizon in milliseconds.
    pub fn with_velocity_window_ms(mut self, window: u64) -> Self {
        self.velocity_window_ms = window;
        self
    }

    /// Sets the chain invalidation policy.
    pub fn with_chain_invalidation(mut self, policy: ChainInvalidation) -> Self {
        self.chain_invalidation = policy;
        self
    }

    /// Sets the simultaneous matching mode.
    pub fn with_simultaneous(mut self, mode: SimultaneousMode) -> Self {
        self.simultaneous = mode;
        self
    }

    /// Converts a dip length to pixels at this density.
    #[inline]
    pub fn dip_to_px(&self, dip: f32) -> f32 {
        horizon_gesture_core::dip_to_px(dip, self.density)
    }

    /// Converts a pixel length to dip at this density.
    #[inline]
    pub fn px_to_dip(&self, px: f32) -> f32 {
        horizon_gesture_core::px_to_dip(px, self.density)
    }
}

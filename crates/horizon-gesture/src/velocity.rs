//! Pointer velocity estimation.

use std::collections::VecDeque;

use glam::Vec2;
use horizon_gesture_core::Point;

use crate::config::DEFAULT_VELOCITY_WINDOW_MS;

/// Samples kept regardless of age, so a stream with sparse events still has
/// two points to measure.
const MIN_SAMPLES: usize = 2;

/// Windowed velocity tracker for one pointer stream.
///
/// Keeps the samples of the last `window_ms` milliseconds and estimates
/// velocity from the oldest to the newest retained sample, in pixels per
/// second.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window_ms: u64,
    samples: VecDeque<(u64, Point)>,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VELOCITY_WINDOW_MS)
    }
}

impl VelocityTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            samples: VecDeque::new(),
        }
    }

    /// Records a sample. Samples older than the newest one are dropped.
    pub fn add(&mut self, timestamp_ms: u64, position: Point) {
        if let Some(&(last, _)) = self.samples.back() {
            if timestamp_ms < last {
                return;
            }
        }
        self.samples.push_back((timestamp_ms, position));
        while self.samples.len() > MIN_SAMPLES {
            match self.samples.front() {
                Some(&(t, _)) if timestamp_ms.saturating_sub(t) > self.window_ms => {
                    self.samples.pop_front();
                }
                _ => break,
            }
        }
    }

    /// Estimated velocity in pixels per second; zero with fewer than two
    /// samples or no elapsed time.
    pub fn velocity(&self) -> Vec2 {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.samples.front(), self.samples.back())
        else {
            return Vec2::ZERO;
        };
        if t1 <= t0 {
            return Vec2::ZERO;
        }
        let seconds = (t1 - t0) as f32 / 1000.0;
        (p1.to_vec2() - p0.to_vec2()) / seconds
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

//! Pointer geometry in device pixels.

use serde::{Deserialize, Serialize};

/// A position in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Convert to a glam Vec2.
    #[inline]
    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }

    /// Create from a glam Vec2.
    #[inline]
    pub fn from_vec2(v: glam::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    /// Direction from `self` to `other` in degrees, in `(-180, 180]`.
    ///
    /// Zero points along +x; positive angles turn towards +y (screen down).
    #[inline]
    pub fn angle_to(self, other: Point) -> f32 {
        let d = other.to_vec2() - self.to_vec2();
        d.y.atan2(d.x).to_degrees()
    }

    /// Midpoint between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::from_vec2((self.to_vec2() + other.to_vec2()) * 0.5)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<glam::Vec2> for Point {
    fn from(v: glam::Vec2) -> Self {
        Self::from_vec2(v)
    }
}

impl From<Point> for glam::Vec2 {
    fn from(p: Point) -> Self {
        p.to_vec2()
    }
}

/// Convert a device-pixel length to device-independent units.
///
/// Non-positive densities are treated as 1.0.
#[inline]
pub fn px_to_dip(px: f32, density: f32) -> f32 {
    if density > 0.0 { px / density } else { px }
}

/// Convert a device-independent length to device pixels.
#[inline]
pub fn dip_to_px(dip: f32, density: f32) -> f32 {
    if density > 0.0 { dip * density } else { dip }
}

/// Convert a vector from device pixels to device-independent units.
#[inline]
pub fn vec_to_dip(v: glam::Vec2, density: f32) -> glam::Vec2 {
    glam::Vec2::new(px_to_dip(v.x, density), px_to_dip(v.y, density))
}

use std::ops::{Add, Mul, Sub};

/// Position or direction in continuous map space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

/// Discrete tile or pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2f {
    pub const ZERO: Vec2f = Vec2f { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2f) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, `None` for zero or non-finite length.
    pub fn normalize(self) -> Option<Vec2f> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Vec2f::new(self.x / len, self.y / len))
    }

    /// Standard counter-clockwise rotation by `angle` radians.
    #[inline]
    pub fn rotated(self, angle: f32) -> Vec2f {
        let (s, c) = angle.sin_cos();
        Vec2f::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Truncates toward zero, like a C cast.
    #[inline]
    pub fn to_vec2i(self) -> Vec2i {
        Vec2i::new(self.x as i32, self.y as i32)
    }

    /// Grid cell containing this point.
    #[inline]
    pub fn floor_to_vec2i(self) -> Vec2i {
        Vec2i::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl Vec2i {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec2f(self) -> Vec2f {
        Vec2f::new(self.x as f32, self.y as f32)
    }
}

impl Add for Vec2f {
    type Output = Vec2f;
    #[inline]
    fn add(self, rhs: Vec2f) -> Vec2f {
        Vec2f::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2f {
    type Output = Vec2f;
    #[inline]
    fn sub(self, rhs: Vec2f) -> Vec2f {
        Vec2f::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2f {
        Vec2f::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_length() {
        let v = Vec2f::new(3.0, 4.0);
        assert_eq!(v.dot(Vec2f::new(1.0, 0.0)), 3.0);
        assert_eq!(v.length(), 5.0);
    }

    #[test]
    fn normalize_rejects_zero() {
        assert_eq!(Vec2f::ZERO.normalize(), None);
        let n = Vec2f::new(0.0, -2.0).normalize().unwrap();
        assert_eq!(n, Vec2f::new(0.0, -1.0));
    }

    #[test]
    fn conversions_truncate_or_floor() {
        let v = Vec2f::new(-1.5, 2.7);
        assert_eq!(v.to_vec2i(), Vec2i::new(-1, 2));
        assert_eq!(v.floor_to_vec2i(), Vec2i::new(-2, 2));
        assert_eq!(Vec2i::new(3, -4).to_vec2f(), Vec2f::new(3.0, -4.0));
    }

    #[test]
    fn quarter_turn() {
        let r = Vec2f::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }
}

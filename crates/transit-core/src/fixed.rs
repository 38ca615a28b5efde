use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Checked division for Fixed64 that returns None on zero divisor or overflow.
#[inline]
pub fn checked_div_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_div(b)
}

// ---------------------------------------------------------------------------
// 2D points
// ---------------------------------------------------------------------------

/// A point on the playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: Fixed64,
    pub y: Fixed64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
    };

    pub fn new(x: Fixed64, y: Fixed64) -> Self {
        Self { x, y }
    }

    /// Build a point from integer coordinates.
    pub fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: Fixed64::from_num(x),
            y: Fixed64::from_num(y),
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec2) -> Fixed64 {
        let dx = other.x.to_bits() as i128 - self.x.to_bits() as i128;
        let dy = other.y.to_bits() as i128 - self.y.to_bits() as i128;
        let dx = dx.unsigned_abs();
        let dy = dy.unsigned_abs();
        // Squares of raw Q32.32 values are Q64.64; the integer square root
        // lands back on Q32.32 bits.
        let sq = dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy));
        Fixed64::from_bits(i64::try_from(sq.isqrt()).unwrap_or(i64::MAX))
    }

    /// Linear interpolation toward `other` by `t` (0 = self, 1 = other).
    /// Works on raw bits, so any two points interpolate without overflow.
    pub fn lerp(self, other: Vec2, t: Fixed64) -> Vec2 {
        let t = t.to_bits() as i128;
        let step = |from: Fixed64, to: Fixed64| {
            let delta = to.to_bits() as i128 - from.to_bits() as i128;
            let bits = from.to_bits() as i128 + (delta.saturating_mul(t) >> 32);
            Fixed64::from_bits(bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
        };
        Vec2 {
            x: step(self.x, other.x),
            y: step(self.y, other.y),
        }
    }

    /// Shortest distance from `self` to the segment `a..b`.
    pub fn distance_to_segment(self, a: Vec2, b: Vec2) -> Fixed64 {
        // Projection in Q32.16: squares of any coordinate difference fit i128.
        let raw = |v: Fixed64| (v.to_bits() >> 16) as i128;
        let abx = raw(b.x) - raw(a.x);
        let aby = raw(b.y) - raw(a.y);
        let mut len_sq = abx * abx + aby * aby;
        let mut dot = (raw(self.x) - raw(a.x)) * abx + (raw(self.y) - raw(a.y)) * aby;

        let t = if len_sq == 0 || dot <= 0 {
            Fixed64::ZERO
        } else if dot >= len_sq {
            Fixed64::ONE
        } else {
            // 0 < dot < len_sq; keep `dot << 32` inside i128.
            let shift = (128 - len_sq.leading_zeros()).saturating_sub(95);
            len_sq >>= shift;
            dot >>= shift;
            Fixed64::from_bits(((dot << 32) / len_sq) as i64)
        };
        self.distance(a.lerp(b, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = Fixed64::from_num(1.5);
        let b = Fixed64::from_num(2.0);
        assert_eq!((a + b).to_num::<f64>(), 3.5);
    }

    #[test]
    fn fixed64_checked_div_by_zero() {
        let a = Fixed64::from_num(1.0);
        assert!(checked_div_64(a, Fixed64::ZERO).is_none());
    }

    #[test]
    fn distance_pythagorean_triple() {
        let a = Vec2::from_ints(0, 0);
        let b = Vec2::from_ints(3, 4);
        assert_eq!(a.distance(b), Fixed64::from_num(5));
        assert_eq!(b.distance(a), Fixed64::from_num(5));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = Vec2::from_ints(120, -40);
        assert_eq!(a.distance(a), Fixed64::ZERO);
    }

    #[test]
    fn distance_is_deterministic() {
        let a = Vec2::new(Fixed64::from_num(10.25), Fixed64::from_num(3.5));
        let b = Vec2::new(Fixed64::from_num(-7.75), Fixed64::from_num(99.0));
        assert_eq!(a.distance(b), a.distance(b));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vec2::from_ints(0, 0);
        let b = Vec2::from_ints(10, 20);
        assert_eq!(a.lerp(b, Fixed64::ZERO), a);
        assert_eq!(a.lerp(b, Fixed64::ONE), b);
        assert_eq!(a.lerp(b, Fixed64::from_num(0.5)), Vec2::from_ints(5, 10));
    }

    #[test]
    fn lerp_across_the_whole_range() {
        let a = Vec2::from_ints(-2_000_000_000, 0);
        let b = Vec2::from_ints(2_000_000_000, 0);
        assert_eq!(a.lerp(b, Fixed64::from_num(0.5)), Vec2::ZERO);
        assert_eq!(a.lerp(b, Fixed64::ONE), b);
    }

    #[test]
    fn segment_distance_perpendicular() {
        let p = Vec2::from_ints(5, 3);
        let d = p.distance_to_segment(Vec2::from_ints(0, 0), Vec2::from_ints(10, 0));
        assert_eq!(d, Fixed64::from_num(3));
    }

    #[test]
    fn segment_distance_past_endpoint_clamps() {
        let p = Vec2::from_ints(13, 4);
        let d = p.distance_to_segment(Vec2::from_ints(0, 0), Vec2::from_ints(10, 0));
        assert_eq!(d, Fixed64::from_num(5));
    }

    #[test]
    fn segment_distance_long_segment() {
        let p = Vec2::from_ints(30_000, 5);
        let d = p.distance_to_segment(Vec2::from_ints(0, 0), Vec2::from_ints(60_000, 0));
        assert_eq!(d, Fixed64::from_num(5));

        let p = Vec2::from_ints(0, 7);
        let a = Vec2::from_ints(-2_000_000_000, 0);
        let b = Vec2::from_ints(2_000_000_000, 0);
        assert_eq!(p.distance_to_segment(a, b), Fixed64::from_num(7));
        assert_eq!(
            Vec2::from_ints(2_100_000_000, 0).distance_to_segment(a, b),
            Fixed64::from_num(100_000_000)
        );
    }

    #[test]
    fn segment_distance_degenerate_segment() {
        let p = Vec2::from_ints(3, 4);
        let a = Vec2::from_ints(0, 0);
        assert_eq!(p.distance_to_segment(a, a), Fixed64::from_num(5));
    }
}

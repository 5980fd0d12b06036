use crate::*;

pub trait Vector2Ext: Sized {
    /// Unit vector in the same direction, or zero if there is no direction to speak of
    fn normalize_or_zero(self) -> Self;

    /// Scales down to `max` length if longer, otherwise unchanged
    fn clamp_magnitude(self, max: F) -> Self;
}

impl Vector2Ext for Vector2 {
    fn normalize_or_zero(self) -> Self {
        let len = self.x.hypot(self.y);
        if len > F::EPSILON && len.is_finite() {
            self / len
        } else {
            Vector2::zero()
        }
    }

    fn clamp_magnitude(self, max: F) -> Self {
        debug_assert!(max >= 0.0, "negative max magnitude {}", max);
        // hypot doesn't overflow for huge components like squaring does
        let len = self.x.hypot(self.y);
        if len > max {
            self * (max / len)
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        let v = Vector2::new(3.0, 4.0).normalize_or_zero();
        assert!(v.x.approx_eq(0.6, (F::EPSILON, 2)));
        assert!(v.y.approx_eq(0.8, (F::EPSILON, 2)));

        // no NaNs from zero
        let v = Vector2::zero().normalize_or_zero();
        assert_eq!(v, Vector2::zero());
    }

    #[test]
    fn clamp() {
        // shorter is untouched
        let v = Vector2::new(1.0, 1.0);
        assert_eq!(v.clamp_magnitude(4.0), v);

        // longer is scaled down but keeps direction
        let v = Vector2::new(10.0, 0.0).clamp_magnitude(4.0);
        assert!(v.x.approx_eq(4.0, (F::EPSILON, 2)));
        assert!(v.y.approx_eq(0.0, (F::EPSILON, 2)));

        let v = Vector2::new(-6.0, 8.0).clamp_magnitude(5.0);
        assert!(v.magnitude().approx_eq(5.0, (F::EPSILON, 4)));
        assert!(v.x < 0.0 && v.y > 0.0);

        assert_eq!(Vector2::new(3.0, 4.0).clamp_magnitude(0.0), Vector2::zero());
    }

    #[test]
    fn huge_vectors() {
        let v = Vector2::new(3e19, -4e19);

        let clamped = v.clamp_magnitude(5.0);
        assert!(clamped.x.approx_eq(3.0, (F::EPSILON, 4)), "{:?}", clamped);
        assert!(clamped.y.approx_eq(-4.0, (F::EPSILON, 4)), "{:?}", clamped);

        let unit = v.normalize_or_zero();
        assert!(unit.x.approx_eq(0.6, (F::EPSILON, 4)), "{:?}", unit);
        assert!(unit.y.approx_eq(-0.8, (F::EPSILON, 4)), "{:?}", unit);
    }
}

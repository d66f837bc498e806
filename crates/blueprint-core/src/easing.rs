//! Scalar easing and smoothing helpers shared by the motion and orbit code.

/// Ease-out exponential: fast start, decelerating into 1.
#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One step of exponential smoothing toward `target`.
#[inline]
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_expo_endpoints_and_midpoint() {
        assert_eq!(ease_out_expo(0.0), 0.0);
        assert_eq!(ease_out_expo(1.0), 1.0);
        let mid = ease_out_expo(0.5);
        assert!((mid - (1.0 - 2.0_f32.powi(-5))).abs() < 1e-6);
    }

    #[test]
    fn ease_out_expo_is_monotonic_and_clamped() {
        let mut prev = ease_out_expo(-1.0);
        for i in 0..=100 {
            let v = ease_out_expo(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
        assert_eq!(ease_out_expo(3.0), 1.0);
    }

    #[test]
    fn approach_never_overshoots() {
        let mut x = 0.0;
        for _ in 0..200 {
            x = approach(x, 10.0, 0.06);
            assert!(x <= 10.0);
        }
        assert!((x - 10.0).abs() < 0.01);
    }
}

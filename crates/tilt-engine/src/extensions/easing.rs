// extensions/easing.rs
//
// Easing curves for the tween system. Pure functions over normalized time,
// nothing here touches Entity/Scene.

use std::f32::consts::PI;

/// Shape of a tween's progress curve. The set covers what the game
/// animations need: snappy pops (quad), gentle idle pulses (sine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Accelerate from rest.
    QuadIn,
    /// Decelerate into the target.
    QuadOut,
    QuadInOut,
    SineIn,
    SineOut,
    /// Symmetric smooth ramp; the natural choice for ping-pong loops.
    SineInOut,
}

impl Easing {
    /// Map normalized time `t` in [0, 1] through the curve.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

/// Plain linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate scalar values along an easing curve.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec2 values along an easing curve.
#[inline]
pub fn ease_vec2(a: glam::Vec2, b: glam::Vec2, t: f32, easing: Easing) -> glam::Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_hits_both_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::SineIn,
            Easing::SineOut,
            Easing::SineInOut,
        ];
        for c in curves {
            assert!(c.apply(0.0).abs() < 1e-6, "{c:?} at 0");
            assert!((c.apply(1.0) - 1.0).abs() < 1e-6, "{c:?} at 1");
        }
    }

    #[test]
    fn quad_out_leads_linear() {
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
        assert!(Easing::QuadIn.apply(0.5) < 0.5);
    }

    #[test]
    fn out_of_range_time_is_clamped() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn ease_vec2_midpoint() {
        let v = ease_vec2(
            glam::Vec2::ZERO,
            glam::Vec2::new(100.0, 50.0),
            0.5,
            Easing::Linear,
        );
        assert!((v.x - 50.0).abs() < 1e-4);
        assert!((v.y - 25.0).abs() < 1e-4);
    }
}

// extensions/easing.rs
//
// Normalized easing curves and interpolation helpers.
// Pure math: no dependency on hitboxes or stages.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Curve family. Each family is defined by its ease-in shape; the out and
/// in-out variants are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    /// Exponential (dramatic).
    Expo,
    /// Circular (quarter-circle arc).
    Circ,
}

impl Curve {
    pub const ALL: [Curve; 7] = [
        Curve::Sine,
        Curve::Quad,
        Curve::Cubic,
        Curve::Quart,
        Curve::Quint,
        Curve::Expo,
        Curve::Circ,
    ];

    /// The ease-in shape of this family.
    #[inline]
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
            Curve::Quad => t * t,
            Curve::Cubic => t * t * t,
            Curve::Quart => t.powi(4),
            Curve::Quint => t.powi(5),
            Curve::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            }
            Curve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        }
    }
}

/// Easing applied to the progress fraction of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Slow start.
    In(Curve),
    /// Slow end.
    Out(Curve),
    /// Slow start and end.
    InOut(Curve),
}

impl Easing {
    /// Apply the easing to a progress value `t` in [0, 1].
    /// Input is clamped; the result is exactly 0 at t=0 and 1 at t=1 for every variant.
    /// The clamping is deliberate: no family overshoots, including the
    /// exponential one, so a dash never travels past its target.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::In(curve) => curve.ease_in(t),
            Easing::Out(curve) => 1.0 - curve.ease_in(1.0 - t),
            Easing::InOut(curve) => {
                if t < 0.5 {
                    curve.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - curve.ease_in(2.0 - 2.0 * t) / 2.0
                }
            }
        }
    }

    /// Every available easing: linear plus in/out/in-out of each curve family.
    pub fn all() -> impl Iterator<Item = Easing> {
        std::iter::once(Easing::Linear).chain(Curve::ALL.into_iter().flat_map(|c| {
            [Easing::In(c), Easing::Out(c), Easing::InOut(c)]
        }))
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linear interpolation `a + t * (b - a)`.
///
/// # Panics
/// When `t` is outside [0, 1]; that is a caller bug, not a recoverable condition.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    assert!((0.0..=1.0).contains(&t), "lerp: t = {t} is outside [0, 1]");
    a + t * (b - a)
}

/// Per-axis `lerp` on two points.
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Interpolate between two points along an eased progress curve.
#[inline]
pub fn ease(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}

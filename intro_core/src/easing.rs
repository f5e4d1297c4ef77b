// Easing curves shared by every tween in the intro.
// CSS keywords, power eases, and arbitrary cubic-bezier().

use serde::{Deserialize, Serialize};

/// CSS `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        // x control points must stay in [0, 1] for the curve to be a function of time.
        CubicBezier {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    fn sample(a1: f64, a2: f64, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    }

    fn sample_dx(&self, s: f64) -> f64 {
        let inv = 1.0 - s;
        3.0 * inv * inv * self.x1
            + 6.0 * inv * s * (self.x2 - self.x1)
            + 3.0 * s * s * (1.0 - self.x2)
    }

    /// Solve for the curve parameter whose x equals `t`.
    fn solve_param(&self, t: f64) -> f64 {
        // Newton first, bisection if the slope flattens out.
        let mut s = t;
        for _ in 0..8 {
            let x = Self::sample(self.x1, self.x2, s) - t;
            if x.abs() < 1e-7 {
                return s;
            }
            let dx = self.sample_dx(s);
            if dx.abs() < 1e-6 {
                break;
            }
            s -= x / dx;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = t;
        for _ in 0..40 {
            let x = Self::sample(self.x1, self.x2, s);
            if (x - t).abs() < 1e-7 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_param(t))
    }
}

/// Easing function for tweens and overlay transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EasingType {
    Linear,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2Out,
    Power4In,
    Bezier(CubicBezier),
}

impl EasingType {
    /// Map linear progress `t` in [0, 1] to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::EaseIn => CubicBezier::new(0.42, 0.0, 1.0, 1.0).apply(t),
            EasingType::EaseOut => CubicBezier::new(0.0, 0.0, 0.58, 1.0).apply(t),
            EasingType::EaseInOut => CubicBezier::new(0.42, 0.0, 0.58, 1.0).apply(t),
            EasingType::Power1In => t * t,
            EasingType::Power1Out => 1.0 - (1.0 - t).powi(2),
            EasingType::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingType::Power2Out => 1.0 - (1.0 - t).powi(3),
            EasingType::Power4In => t.powi(5),
            EasingType::Bezier(curve) => curve.apply(t),
        }
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

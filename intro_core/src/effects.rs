// Pre-roll pull lines: radial streaks drawn in from the screen edges before the orb appears.
// Pure function of the viewport at mount time; resizes do not regenerate them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::*;

/// Generates the decorative pull lines for the loading screen.
pub struct PullLineGenerator {
    settings: PreRollSettings,
}

impl PullLineGenerator {
    pub fn new(settings: PreRollSettings) -> Self {
        PullLineGenerator { settings }
    }

    /// Generate one line per evenly spaced angle, randomized by `seed`.
    pub fn generate(&self, viewport: &Viewport, seed: u64) -> Vec<PullLine> {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = self.settings.line_count;
        let mut lines = Vec::with_capacity(count);

        for i in 0..count {
            let angle = std::f64::consts::TAU * i as f64 / count as f64;
            let (sin, cos) = angle.sin_cos();

            let length = sample(&mut rng, self.settings.length_pct);
            let thickness = sample(&mut rng, self.settings.thickness_pct);
            let delay_us = if self.settings.max_delay_us == 0 {
                0
            } else {
                rng.gen_range(0..=self.settings.max_delay_us)
            };

            let start = OriginPoint::new(cos * viewport.width, sin * viewport.height);
            let mid = OriginPoint::new(
                start.x * self.settings.mid_fraction,
                start.y * self.settings.mid_fraction,
            );

            let axis = if sin.abs() > cos.abs() {
                LineAxis::Vertical
            } else {
                LineAxis::Horizontal
            };
            let (width_pct, height_pct) = match axis {
                LineAxis::Vertical => (thickness, length),
                LineAxis::Horizontal => (length, thickness),
            };

            lines.push(PullLine {
                id: i,
                angle,
                width_pct,
                height_pct,
                left_pct: 50.0 + cos * 50.0,
                top_pct: 50.0 + sin * 50.0,
                start,
                mid,
                axis,
                direction: gradient_direction(sin, cos),
                delay_us,
            });
        }

        lines
    }
}

fn sample(rng: &mut StdRng, range: [f64; 2]) -> f64 {
    if range[1] > range[0] {
        rng.gen_range(range[0]..range[1])
    } else {
        range[0]
    }
}

/// The gradient fades away from the edge the line enters from.
fn gradient_direction(sin: f64, cos: f64) -> LineDirection {
    if cos.abs() > sin.abs() {
        if cos > 0.0 {
            LineDirection::Left
        } else {
            LineDirection::Right
        }
    } else if sin > 0.0 {
        LineDirection::Top
    } else {
        LineDirection::Bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64) -> Vec<PullLine> {
        PullLineGenerator::new(PreRollSettings::default())
            .generate(&Viewport::new(1920.0, 1080.0), seed)
    }

    #[test]
    fn generates_configured_count() {
        let lines = generate(7);
        assert_eq!(lines.len(), 30);
        assert_eq!(lines[0].angle, 0.0);
        assert!((lines[15].angle - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn values_within_ranges() {
        for line in generate(42) {
            let (length, thickness) = match line.axis {
                LineAxis::Vertical => (line.height_pct, line.width_pct),
                LineAxis::Horizontal => (line.width_pct, line.height_pct),
            };
            assert!((50.0..=100.0).contains(&length));
            assert!((1.0..=3.0).contains(&thickness));
            assert!(line.delay_us <= 500_000);
        }
    }

    #[test]
    fn start_lies_on_viewport_ellipse_and_mid_is_pulled_in() {
        for line in generate(3) {
            let nx = line.start.x / 1920.0;
            let ny = line.start.y / 1080.0;
            assert!((nx * nx + ny * ny - 1.0).abs() < 1e-9);
            assert!((line.mid.x - line.start.x * 0.4).abs() < 1e-9);
            assert!((line.mid.y - line.start.y * 0.4).abs() < 1e-9);
        }
    }

    #[test]
    fn axis_follows_dominant_component() {
        let lines = generate(1);
        assert_eq!(lines[0].axis, LineAxis::Horizontal);
        assert_eq!(lines[0].direction, LineDirection::Left);
        // 8/30 of a turn is 96 degrees.
        assert_eq!(lines[8].axis, LineAxis::Vertical);
        assert_eq!(lines[8].direction, LineDirection::Top);
    }

    #[test]
    fn same_seed_is_reproducible() {
        assert_eq!(generate(9), generate(9));
        assert_ne!(generate(9), generate(10));
    }

    #[test]
    fn lines_are_staggered() {
        let lines = generate(5);
        let first = lines[0].delay_us;
        assert!(lines.iter().any(|l| l.delay_us != first));
    }
}

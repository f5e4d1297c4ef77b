// Perspective camera geometry for the orb: apparent size, screen projection, covering scale.
// Rule: the orb may fill the screen but its near surface never reaches the camera.

use tracing::debug;

use crate::types::*;

/// Result of the commit target computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverScale {
    /// Scale whose radius reaches the farthest viewport corner from the origin, plus buffer.
    pub unclamped: f64,
    /// Scale after the near-plane margin clamp. Always finite and >= 0.
    pub target: f64,
    pub clamped: bool,
}

/// Camera at (0, 0, distance) looking down -Z.
#[derive(Debug, Clone, Copy)]
pub struct OrbCamera {
    settings: CameraSettings,
}

impl OrbCamera {
    pub fn new(settings: CameraSettings) -> Self {
        OrbCamera { settings }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.settings.distance)
    }

    pub fn distance_to(&self, target: Vec3) -> f64 {
        let eye = self.position();
        let dx = target.x - eye.x;
        let dy = target.y - eye.y;
        let dz = target.z - eye.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn half_fov(&self) -> f64 {
        self.settings.fov_deg.to_radians() / 2.0
    }

    /// Height of the visible frustum slice at `distance`, in world units.
    pub fn visible_height(&self, distance: f64) -> f64 {
        2.0 * self.half_fov().tan() * distance
    }

    pub fn world_per_pixel(&self, distance: f64, viewport: &Viewport) -> f64 {
        self.visible_height(distance) / viewport.height
    }

    /// Uniform scale that makes a sphere of `base_radius` at `target` project to `diameter_px`.
    pub fn apparent_size_scale(
        &self,
        diameter_px: f64,
        base_radius: f64,
        target: Vec3,
        viewport: &Viewport,
    ) -> f64 {
        let distance = self.distance_to(target);
        let world_radius = diameter_px * self.world_per_pixel(distance, viewport) / 2.0;
        world_radius / base_radius
    }

    /// Project a world point to viewport pixels. Points at or behind the camera map to the center.
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> OriginPoint {
        let depth = self.settings.distance - point.z;
        if depth <= 0.0 {
            return viewport.center();
        }
        let half_height = self.half_fov().tan() * depth;
        let half_width = half_height * viewport.aspect();
        let ndc_x = point.x / half_width;
        let ndc_y = point.y / half_height;
        OriginPoint::new(
            (ndc_x + 1.0) / 2.0 * viewport.width,
            (1.0 - ndc_y) / 2.0 * viewport.height,
        )
    }

    /// Largest radius whose near surface stays `margin` of the near-plane gap away from
    /// the near plane.
    pub fn max_safe_radius(&self, target: Vec3, margin: f64) -> f64 {
        let gap = self.distance_to(target) - self.settings.near;
        if gap.is_finite() && gap > 0.0 {
            gap * (1.0 - margin)
        } else {
            0.0
        }
    }

    /// Target scale for the commit expansion: cover the viewport from `origin`, clamped by
    /// the near margin.
    pub fn cover_scale(
        &self,
        origin: OriginPoint,
        target: Vec3,
        base_radius: f64,
        orb: &OrbSettings,
        viewport: &Viewport,
    ) -> CoverScale {
        let corner_px = farthest_corner(origin, viewport);
        let distance = self.distance_to(target);
        let cover_radius =
            corner_px * self.world_per_pixel(distance, viewport) * (1.0 + orb.cover_buffer);
        let unclamped = sanitize(cover_radius / base_radius);

        let safe = sanitize(self.max_safe_radius(target, orb.near_margin) / base_radius);
        let clamped = unclamped > safe;
        if clamped {
            debug!(unclamped, safe, distance, "cover scale clamped by near margin");
        }

        CoverScale {
            unclamped,
            target: unclamped.min(safe),
            clamped,
        }
    }
}

fn farthest_corner(origin: OriginPoint, viewport: &Viewport) -> f64 {
    [
        (0.0, 0.0),
        (viewport.width, 0.0),
        (0.0, viewport.height),
        (viewport.width, viewport.height),
    ]
    .iter()
    .map(|(cx, cy)| {
        let dx = cx - origin.x;
        let dy = cy - origin.y;
        (dx * dx + dy * dy).sqrt()
    })
    .fold(0.0, f64::max)
}

fn sanitize(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.max(0.0)
    } else {
        0.0
    }
}

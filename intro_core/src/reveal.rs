// Reveal overlay: staggered radial blobs anchored at the origin point.
// Blobs grow while expanding, fade from settling onward, and collapse once fading out.

use crate::tween::Tween;
use crate::types::*;

impl RevealTransitionState {
    /// Mount the overlay in its first phase.
    pub fn activate(&mut self) {
        self.active = true;
        self.phase = RevealPhase::Expanding;
    }

    /// Move to `phase` if it is ahead of the current one. Returns whether it moved.
    pub fn advance_to(&mut self, phase: RevealPhase) -> bool {
        if !self.active || phase <= self.phase {
            return false;
        }
        self.phase = phase;
        true
    }
}

/// Geometry and opacity of the fluid overlay over time.
#[derive(Debug, Clone)]
pub struct RevealOverlay {
    layers: Vec<BlobLayer>,
    expanding_at: Option<Timestamp>,
    settling_at: Option<Timestamp>,
    fading_at: Option<Timestamp>,
}

impl RevealOverlay {
    pub fn new(settings: &RevealSettings) -> Self {
        RevealOverlay {
            layers: settings.layers.clone(),
            expanding_at: None,
            settling_at: None,
            fading_at: None,
        }
    }

    /// Record when `phase` began. Each phase is marked once.
    pub fn mark(&mut self, phase: RevealPhase, at: Timestamp) {
        let slot = match phase {
            RevealPhase::Expanding => &mut self.expanding_at,
            RevealPhase::Settling => &mut self.settling_at,
            RevealPhase::FadingOut => &mut self.fading_at,
        };
        if slot.is_none() {
            *slot = Some(at);
        }
    }

    /// Time from `Settling` until every layer is fully transparent.
    pub fn fade_span_us(&self) -> u64 {
        self.layers
            .iter()
            .map(|l| l.delay_us + l.fade_us)
            .max()
            .unwrap_or(0)
    }

    /// Blobs to draw at `now`. Nothing is drawn while the overlay is inactive.
    pub fn render(
        &self,
        state: &RevealTransitionState,
        origin: OriginPoint,
        viewport: &Viewport,
        now: Timestamp,
    ) -> Vec<BlobFrame> {
        if !state.active {
            return Vec::new();
        }
        let Some(expanding_at) = self.expanding_at else {
            return Vec::new();
        };

        self.layers
            .iter()
            .map(|layer| {
                let max_diameter = layer.max_size_vmax * viewport.vmax();
                let grow = Tween::new(
                    (),
                    0.0,
                    max_diameter,
                    expanding_at.offset(layer.delay_us),
                    layer.expand_us,
                    layer.expand_easing,
                );

                let diameter = match (state.phase, self.fading_at) {
                    (RevealPhase::FadingOut, Some(fading_at)) => {
                        let start = fading_at.offset(layer.delay_us);
                        Tween::new(
                            (),
                            grow.value_at(start),
                            0.0,
                            start,
                            layer.expand_us,
                            layer.expand_easing,
                        )
                        .value_at(now)
                    }
                    _ => grow.value_at(now),
                };

                let opacity = match (state.phase, self.settling_at) {
                    (RevealPhase::Expanding, _) | (_, None) => layer.peak_opacity,
                    (_, Some(settling_at)) => Tween::new(
                        (),
                        layer.peak_opacity,
                        0.0,
                        settling_at.offset(layer.delay_us),
                        layer.fade_us,
                        layer.fade_easing,
                    )
                    .value_at(now),
                };

                BlobFrame {
                    center: OriginPoint::new(
                        origin.x + layer.offset[0],
                        origin.y + layer.offset[1],
                    ),
                    diameter_px: diameter.max(0.0),
                    opacity: opacity.clamp(0.0, 1.0),
                    blur_px: layer.blur_px,
                    solid_stop_pct: layer.solid_stop_pct,
                }
            })
            .collect()
    }
}

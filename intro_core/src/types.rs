// Strong typing over strings. Newtypes for timestamps, screen points, and scene vectors.
// All configuration defaults live here so `{}` deserializes to the stock intro.

use serde::{Deserialize, Serialize};

use crate::easing::{CubicBezier, EasingType};
use crate::error::IntroError;

/// Timestamp in microseconds since the intro mounted. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(1000))
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Timestamp shifted forward by `us` microseconds.
    pub fn offset(&self, us: u64) -> Self {
        Timestamp(self.0.saturating_add(us))
    }

    /// Microseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    pub fn center(&self) -> OriginPoint {
        OriginPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// One `vmax` unit in pixels.
    pub fn vmax(&self) -> f64 {
        self.width.max(self.height) / 100.0
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Screen-space point in viewport pixels where the reveal expands from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OriginPoint {
    pub x: f64,
    pub y: f64,
}

impl OriginPoint {
    pub fn new(x: f64, y: f64) -> Self {
        OriginPoint { x, y }
    }
}

/// World-space vector (scene units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Vec3 { x: v, y: v, z: v }
    }

    pub fn max_component(&self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

/// Top-level intro phase owned by the entry gate. Ordered: Loading < Revealing < Revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntroPhase {
    Loading,
    Revealing,
    Revealed,
}

/// Interactive orb state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbState {
    Idle,
    Hovered,
    Committed(CommitStage),
    Dissolved,
}

/// Internal sub-phase of the commit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommitStage {
    Expanding1,
    ViolentDistortion,
    Collapsing,
}

/// Reveal overlay phase. Only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RevealPhase {
    Expanding,
    Settling,
    FadingOut,
}

/// Overlay lifecycle as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTransitionState {
    pub active: bool,
    pub phase: RevealPhase,
}

impl Default for RevealTransitionState {
    fn default() -> Self {
        RevealTransitionState {
            active: false,
            phase: RevealPhase::Expanding,
        }
    }
}

/// Document-wide pointer affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CursorStyle {
    #[default]
    Auto,
    Pointer,
}

// =============================================================================
// Input
// =============================================================================

/// Batch of input events from JS (minimizes JS↔WASM crossings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBatch {
    pub events: Vec<InputEvent>,
}

/// Single input event from the host page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub timestamp: Timestamp,
    pub event_type: EventType,
}

/// Type of input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventType {
    /// Pointer entered the orb.
    PointerEnter,
    /// Pointer left the orb.
    PointerLeave,
    /// Commit gesture on the orb.
    Click,
    /// Window resized.
    Resize { width: f64, height: f64 },
    /// Orb panned in world space by the orbit controls.
    OrbMoved { x: f64, y: f64, z: f64 },
}

// =============================================================================
// Configuration
// =============================================================================

/// Intro configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntroConfig {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub camera: CameraSettings,
    /// Seed for the pre-roll line randomization.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub preroll: PreRollSettings,
    #[serde(default)]
    pub orb: OrbSettings,
    #[serde(default)]
    pub reveal: RevealSettings,
    #[serde(default)]
    pub gate: GateSettings,
}

impl IntroConfig {
    pub fn validate(&self) -> Result<(), IntroError> {
        if !self.viewport.is_valid() {
            return Err(IntroError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.camera.validate()?;
        if self.orb.base_radius <= 0.0 {
            return Err(IntroError::InvalidConfig(
                "orb.base_radius must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.orb.near_margin) {
            return Err(IntroError::InvalidConfig(
                "orb.near_margin must be in [0, 1)".to_string(),
            ));
        }
        if self.orb.apparent_diameter_px <= 0.0 || self.orb.hover_gain <= 0.0 {
            return Err(IntroError::InvalidConfig(
                "orb.apparent_diameter_px and orb.hover_gain must be positive".to_string(),
            ));
        }
        if self.orb.cover_buffer < 0.0 {
            return Err(IntroError::InvalidConfig(
                "orb.cover_buffer must not be negative".to_string(),
            ));
        }
        self.orb.commit.validate()?;
        if self.preroll.length_pct[0] > self.preroll.length_pct[1]
            || self.preroll.thickness_pct[0] > self.preroll.thickness_pct[1]
        {
            return Err(IntroError::InvalidConfig(
                "preroll ranges must be [min, max]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Perspective camera looking down -Z at the orb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_deg: f64,
    /// Near clipping plane distance.
    #[serde(default = "default_near")]
    pub near: f64,
    /// Camera distance from the world origin along +Z.
    #[serde(default = "default_distance")]
    pub distance: f64,
}

impl CameraSettings {
    pub fn validate(&self) -> Result<(), IntroError> {
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(IntroError::InvalidConfig(format!(
                "camera.fov_deg must be in (0, 180), got {}",
                self.fov_deg
            )));
        }
        if self.near <= 0.0 {
            return Err(IntroError::InvalidConfig(format!(
                "camera.near must be positive, got {}",
                self.near
            )));
        }
        if !self.distance.is_finite() {
            return Err(IntroError::InvalidConfig(
                "camera.distance must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            fov_deg: default_fov(),
            near: default_near(),
            distance: default_distance(),
        }
    }
}

fn default_fov() -> f64 {
    45.0
}

fn default_near() -> f64 {
    0.1
}

fn default_distance() -> f64 {
    3.5
}

/// Pre-roll pull-line settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreRollSettings {
    #[serde(default = "default_line_count")]
    pub line_count: usize,
    /// How long the pre-roll plays before the orb appears (microseconds).
    #[serde(default = "default_preroll_duration")]
    pub duration_us: u64,
    /// Upper bound of the per-line stagger delay (microseconds).
    #[serde(default = "default_max_delay")]
    pub max_delay_us: u64,
    /// Line length range, percent of viewport.
    #[serde(default = "default_length_pct")]
    pub length_pct: [f64; 2],
    /// Line thickness range, percent of viewport.
    #[serde(default = "default_thickness_pct")]
    pub thickness_pct: [f64; 2],
    /// Fraction of the start offset kept at the midpoint.
    #[serde(default = "default_mid_fraction")]
    pub mid_fraction: f64,
}

impl Default for PreRollSettings {
    fn default() -> Self {
        PreRollSettings {
            line_count: default_line_count(),
            duration_us: default_preroll_duration(),
            max_delay_us: default_max_delay(),
            length_pct: default_length_pct(),
            thickness_pct: default_thickness_pct(),
            mid_fraction: default_mid_fraction(),
        }
    }
}

fn default_line_count() -> usize {
    30
}

fn default_preroll_duration() -> u64 {
    1_500_000 // 1.5s
}

fn default_max_delay() -> u64 {
    500_000
}

fn default_length_pct() -> [f64; 2] {
    [50.0, 100.0]
}

fn default_thickness_pct() -> [f64; 2] {
    [1.0, 3.0]
}

fn default_mid_fraction() -> f64 {
    0.4
}

/// Orb look and interaction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbSettings {
    /// Sphere geometry radius in world units.
    #[serde(default = "default_base_radius")]
    pub base_radius: f64,
    /// On-screen diameter held while idle/hovered.
    #[serde(default = "default_apparent_diameter")]
    pub apparent_diameter_px: f64,
    #[serde(default = "default_rest_distortion")]
    pub rest_distortion: f64,
    #[serde(default = "default_hover_distortion")]
    pub hover_distortion: f64,
    /// Scale multiplier while hovered.
    #[serde(default = "default_hover_gain")]
    pub hover_gain: f64,
    #[serde(default = "default_hover_duration")]
    pub hover_duration_us: u64,
    /// Extra Y rotation added on each pointer enter (radians).
    #[serde(default = "default_hover_spin")]
    pub hover_spin: f64,
    /// Idle Y spin (radians per second).
    #[serde(default = "default_idle_spin_rate")]
    pub idle_spin_rate: f64,
    /// Idle X wobble amplitude (radians).
    #[serde(default = "default_wobble_amplitude")]
    pub wobble_amplitude: f64,
    /// Idle X wobble angular frequency (radians per second).
    #[serde(default = "default_wobble_rate")]
    pub wobble_rate: f64,
    /// Fade-in once the pre-roll ends.
    #[serde(default = "default_fade_in")]
    pub fade_in_us: u64,
    /// Extra radius on top of the screen-covering radius.
    #[serde(default = "default_cover_buffer")]
    pub cover_buffer: f64,
    /// Fraction of the near-plane-to-orb distance the surface must stay clear of.
    #[serde(default = "default_near_margin")]
    pub near_margin: f64,
    #[serde(default)]
    pub commit: CommitChoreography,
}

impl Default for OrbSettings {
    fn default() -> Self {
        OrbSettings {
            base_radius: default_base_radius(),
            apparent_diameter_px: default_apparent_diameter(),
            rest_distortion: default_rest_distortion(),
            hover_distortion: default_hover_distortion(),
            hover_gain: default_hover_gain(),
            hover_duration_us: default_hover_duration(),
            hover_spin: default_hover_spin(),
            idle_spin_rate: default_idle_spin_rate(),
            wobble_amplitude: default_wobble_amplitude(),
            wobble_rate: default_wobble_rate(),
            fade_in_us: default_fade_in(),
            cover_buffer: default_cover_buffer(),
            near_margin: default_near_margin(),
            commit: CommitChoreography::default(),
        }
    }
}

fn default_base_radius() -> f64 {
    1.2
}

fn default_apparent_diameter() -> f64 {
    500.0
}

fn default_rest_distortion() -> f64 {
    0.3
}

fn default_hover_distortion() -> f64 {
    0.5
}

fn default_hover_gain() -> f64 {
    1.1
}

fn default_hover_duration() -> u64 {
    800_000
}

fn default_hover_spin() -> f64 {
    0.3
}

fn default_idle_spin_rate() -> f64 {
    0.18 // 0.003 rad per frame at 60fps
}

fn default_wobble_amplitude() -> f64 {
    0.1
}

fn default_wobble_rate() -> f64 {
    0.3
}

fn default_fade_in() -> u64 {
    1_000_000
}

fn default_cover_buffer() -> f64 {
    0.12
}

fn default_near_margin() -> f64 {
    0.15
}

/// Timings and targets for the commit sequence. Offsets are relative to the gesture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitChoreography {
    /// End of `Expanding1` / start of `ViolentDistortion`.
    #[serde(default = "default_violent_at")]
    pub violent_at_us: u64,
    /// Primary expansion length, ending at the emissive peak.
    #[serde(default = "default_expansion")]
    pub expansion_us: u64,
    /// `Collapsing` length after the peak; the commit event fires when it ends.
    #[serde(default = "default_collapse")]
    pub collapse_us: u64,
    /// Per-axis multipliers on the target scale, each in (0, 1] so the clamp holds.
    #[serde(default = "default_asymmetry")]
    pub asymmetry: [f64; 3],
    #[serde(default = "default_expanded_distortion")]
    pub expanded_distortion: f64,
    #[serde(default = "default_violent_distortion")]
    pub violent_distortion: f64,
    #[serde(default = "default_peak_emissive")]
    pub peak_emissive: f64,
    /// (metalness, roughness) at the emissive peak.
    #[serde(default = "default_peak_material")]
    pub peak_material: [f64; 2],
    /// (metalness, roughness) once dissolved.
    #[serde(default = "default_final_material")]
    pub final_material: [f64; 2],
}

impl CommitChoreography {
    pub fn validate(&self) -> Result<(), IntroError> {
        if self.violent_at_us > self.expansion_us {
            return Err(IntroError::InvalidConfig(format!(
                "orb.commit.violent_at_us ({}) must not exceed expansion_us ({})",
                self.violent_at_us, self.expansion_us
            )));
        }
        if self.asymmetry.iter().any(|a| !(*a > 0.0 && *a <= 1.0)) {
            return Err(IntroError::InvalidConfig(format!(
                "orb.commit.asymmetry components must be in (0, 1], got {:?}",
                self.asymmetry
            )));
        }
        Ok(())
    }
}

impl Default for CommitChoreography {
    fn default() -> Self {
        CommitChoreography {
            violent_at_us: default_violent_at(),
            expansion_us: default_expansion(),
            collapse_us: default_collapse(),
            asymmetry: default_asymmetry(),
            expanded_distortion: default_expanded_distortion(),
            violent_distortion: default_violent_distortion(),
            peak_emissive: default_peak_emissive(),
            peak_material: default_peak_material(),
            final_material: default_final_material(),
        }
    }
}

fn default_violent_at() -> u64 {
    1_700_000
}

fn default_expansion() -> u64 {
    2_500_000
}

fn default_collapse() -> u64 {
    600_000
}

fn default_asymmetry() -> [f64; 3] {
    [1.0, 0.92, 0.96]
}

fn default_expanded_distortion() -> f64 {
    1.2
}

fn default_violent_distortion() -> f64 {
    2.5
}

fn default_peak_emissive() -> f64 {
    1.2
}

fn default_peak_material() -> [f64; 2] {
    [0.2, 0.6]
}

fn default_final_material() -> [f64; 2] {
    [0.0, 0.8]
}

/// One radial blob of the reveal overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobLayer {
    /// Offset of the blob center from the origin point (px).
    pub offset: [f64; 2],
    /// Fully expanded diameter in vmax units.
    pub max_size_vmax: f64,
    pub expand_us: u64,
    pub expand_easing: EasingType,
    pub peak_opacity: f64,
    pub fade_us: u64,
    pub fade_easing: EasingType,
    /// Start delay applied to every transition of this layer.
    pub delay_us: u64,
    pub blur_px: f64,
    /// Radial gradient stop (percent) where the solid color ends.
    pub solid_stop_pct: f64,
}

/// Reveal overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealSettings {
    #[serde(default = "default_layers")]
    pub layers: Vec<BlobLayer>,
    /// Delay between `Settling` and `FadingOut`.
    #[serde(default = "default_fade_out_delay")]
    pub fade_out_delay_us: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        RevealSettings {
            layers: default_layers(),
            fade_out_delay_us: default_fade_out_delay(),
        }
    }
}

fn default_layers() -> Vec<BlobLayer> {
    let smooth = EasingType::Bezier(CubicBezier::new(0.22, 1.0, 0.36, 1.0));
    let springy = EasingType::Bezier(CubicBezier::new(0.34, 1.56, 0.64, 1.0));
    vec![
        BlobLayer {
            offset: [0.0, 0.0],
            max_size_vmax: 300.0,
            expand_us: 1_800_000,
            expand_easing: smooth,
            peak_opacity: 0.9,
            fade_us: 1_200_000,
            fade_easing: smooth,
            delay_us: 0,
            blur_px: 30.0,
            solid_stop_pct: 80.0,
        },
        BlobLayer {
            offset: [100.0, -50.0],
            max_size_vmax: 200.0,
            expand_us: 1_400_000,
            expand_easing: springy,
            peak_opacity: 0.7,
            fade_us: 1_000_000,
            fade_easing: smooth,
            delay_us: 100_000,
            blur_px: 40.0,
            solid_stop_pct: 60.0,
        },
        BlobLayer {
            offset: [-80.0, 70.0],
            max_size_vmax: 250.0,
            expand_us: 1_600_000,
            expand_easing: smooth,
            peak_opacity: 0.8,
            fade_us: 1_100_000,
            fade_easing: smooth,
            delay_us: 50_000,
            blur_px: 35.0,
            solid_stop_pct: 70.0,
        },
    ]
}

fn default_fade_out_delay() -> u64 {
    200_000
}

/// Entry gate timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Delay from the commit report to `Revealed` / overlay `Settling`.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_us: u64,
    #[serde(default = "default_content_fade")]
    pub content_fade_us: u64,
    #[serde(default = "default_content_easing")]
    pub content_easing: EasingType,
    /// Force the reveal if no commit arrives within this long after mount.
    #[serde(default)]
    pub max_wait_us: Option<u64>,
}

impl Default for GateSettings {
    fn default() -> Self {
        GateSettings {
            settle_delay_us: default_settle_delay(),
            content_fade_us: default_content_fade(),
            content_easing: default_content_easing(),
            max_wait_us: None,
        }
    }
}

fn default_settle_delay() -> u64 {
    800_000 // 800ms
}

fn default_content_fade() -> u64 {
    1_000_000
}

fn default_content_easing() -> EasingType {
    EasingType::EaseIn
}

// =============================================================================
// Output
// =============================================================================

/// One pre-roll line, ready for CSS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullLine {
    pub id: usize,
    /// Radians, also the CSS rotation.
    pub angle: f64,
    pub width_pct: f64,
    pub height_pct: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub start: OriginPoint,
    pub mid: OriginPoint,
    pub axis: LineAxis,
    pub direction: LineDirection,
    pub delay_us: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineAxis {
    Horizontal,
    Vertical,
}

/// Gradient direction of a pull line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDirection {
    Left,
    Right,
    Top,
    Bottom,
}

/// Pre-roll state for a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreRollFrame {
    pub muted: bool,
    pub lines: Vec<PullLine>,
}

/// Orb render parameters for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbFrame {
    pub state: OrbState,
    pub visible: bool,
    pub opacity: f64,
    pub position: Vec3,
    pub scale: Vec3,
    /// (x, y) rotation in radians.
    pub rotation: [f64; 2],
    pub distortion: f64,
    pub metalness: f64,
    pub roughness: f64,
    pub emissive_intensity: f64,
}

/// One overlay blob for a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobFrame {
    pub center: OriginPoint,
    pub diameter_px: f64,
    pub opacity: f64,
    pub blur_px: f64,
    pub solid_stop_pct: f64,
}

/// Observable sequence changes, stamped with the instant they were scheduled for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GateEvent {
    PreRollMuted { at: Timestamp },
    OrbDissolved { at: Timestamp },
    PhaseChanged { phase: IntroPhase, at: Timestamp },
    RevealPhaseChanged { phase: RevealPhase, at: Timestamp },
    OverlayUnmounted { at: Timestamp },
}

impl GateEvent {
    pub fn at(&self) -> Timestamp {
        match self {
            GateEvent::PreRollMuted { at }
            | GateEvent::OrbDissolved { at }
            | GateEvent::PhaseChanged { at, .. }
            | GateEvent::RevealPhaseChanged { at, .. }
            | GateEvent::OverlayUnmounted { at } => *at,
        }
    }
}


/// Complete frame snapshot returned to JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroFrame {
    pub timestamp: Timestamp,
    pub phase: IntroPhase,
    pub origin: Option<OriginPoint>,
    pub content_opacity: f64,
    pub loading_mounted: bool,
    pub preroll: PreRollFrame,
    pub orb: OrbFrame,
    pub reveal: RevealTransitionState,
    pub blobs: Vec<BlobFrame>,
    pub cursor: CursorStyle,
    /// Sequence events fired since the previous delivery to the host.
    #[serde(default)]
    pub events: Vec<GateEvent>,
}

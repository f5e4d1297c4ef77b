// Interactive orb: hover affordance, single commit gesture, timed dissolution.
// The per-frame apparent-size writer and the commit timeline never own the scale at the same time.

use tracing::{debug, info};

use crate::camera::OrbCamera;
use crate::cursor::PointerAffordance;
use crate::easing::EasingType;
use crate::tween::{Timeline, Tween, TweenSpec};
use crate::types::*;

/// Animated orb properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbProperty {
    HoverGain,
    Distortion,
    Spin,
    ScaleX,
    ScaleY,
    ScaleZ,
    Metalness,
    Roughness,
    Emissive,
    Opacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrbCue {
    Violent,
    Peak,
    Dissolve,
}

/// Inputs to the orb state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbInput {
    PointerEnter,
    PointerLeave,
    Commit,
    StageElapsed,
    SequenceComplete,
}

impl OrbState {
    /// Transition table. `None` means the input is rejected in this state.
    pub fn next(self, input: OrbInput) -> Option<OrbState> {
        use CommitStage::*;
        match (self, input) {
            (OrbState::Idle, OrbInput::PointerEnter) => Some(OrbState::Hovered),
            (OrbState::Hovered, OrbInput::PointerLeave) => Some(OrbState::Idle),
            (OrbState::Idle | OrbState::Hovered, OrbInput::Commit) => {
                Some(OrbState::Committed(Expanding1))
            }
            (OrbState::Committed(Expanding1), OrbInput::StageElapsed) => {
                Some(OrbState::Committed(ViolentDistortion))
            }
            (OrbState::Committed(ViolentDistortion), OrbInput::StageElapsed) => {
                Some(OrbState::Committed(Collapsing))
            }
            (OrbState::Committed(_), OrbInput::SequenceComplete) => Some(OrbState::Dissolved),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, OrbState::Committed(_) | OrbState::Dissolved)
    }
}

/// Events reported upward by the orb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbEvent {
    /// Dissolution finished; `origin` is the on-screen center captured at the gesture.
    CommitReported { origin: OriginPoint, at: Timestamp },
    Dissolved { at: Timestamp },
}

/// Scene values the commit sequence starts from.
#[derive(Debug, Clone, Copy)]
struct CommitStart {
    scale: Vec3,
    target: Vec3,
    distortion: f64,
    metalness: f64,
    roughness: f64,
    emissive: f64,
}

const REST_METALNESS: f64 = 0.9;
const REST_ROUGHNESS: f64 = 0.1;

pub struct Orb {
    settings: OrbSettings,
    state: OrbState,
    camera: OrbCamera,
    viewport: Viewport,
    position: Vec3,
    mounted_at: Timestamp,
    visible_at: Timestamp,
    timeline: Timeline<OrbProperty, OrbCue>,
    affordance: Box<dyn PointerAffordance>,
    /// Set the instant a commit is accepted; disables the apparent-size writer for good.
    size_locked: bool,
    /// Pointer entered before the orb was visible; replayed once it appears.
    pending_enter: bool,
    origin: Option<OriginPoint>,
    base_scale: f64,
    hover_gain: f64,
    spin_offset: f64,
    rotation: [f64; 2],
    scale: Vec3,
    distortion: f64,
    metalness: f64,
    roughness: f64,
    emissive: f64,
    opacity: f64,
}

impl Orb {
    /// Mount the orb. It stays hidden and ignores gestures until `visible_at`, then fades in.
    pub fn new(
        settings: OrbSettings,
        camera: OrbCamera,
        viewport: Viewport,
        mounted_at: Timestamp,
        visible_at: Timestamp,
        affordance: Box<dyn PointerAffordance>,
    ) -> Self {
        let mut timeline = Timeline::new();
        timeline.push(Tween::new(
            OrbProperty::Opacity,
            0.0,
            1.0,
            visible_at,
            settings.fade_in_us,
            EasingType::EaseOut,
        ));

        let base_scale = camera.apparent_size_scale(
            settings.apparent_diameter_px,
            settings.base_radius,
            Vec3::default(),
            &viewport,
        );
        let distortion = settings.rest_distortion;

        Orb {
            settings,
            state: OrbState::Idle,
            camera,
            viewport,
            position: Vec3::default(),
            mounted_at,
            visible_at,
            timeline,
            affordance,
            size_locked: false,
            pending_enter: false,
            origin: None,
            base_scale,
            hover_gain: 1.0,
            spin_offset: 0.0,
            rotation: [0.0, 0.0],
            scale: Vec3::splat(base_scale),
            distortion,
            metalness: REST_METALNESS,
            roughness: REST_ROUGHNESS,
            emissive: 0.0,
            opacity: 0.0,
        }
    }

    pub fn state(&self) -> OrbState {
        self.state
    }

    pub fn is_visible(&self, now: Timestamp) -> bool {
        now >= self.visible_at && self.state != OrbState::Dissolved
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Orbit-control pan. Does not affect an origin already captured.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Where the orb's center currently projects on screen.
    pub fn screen_center(&self) -> OriginPoint {
        self.camera.project(self.position, &self.viewport)
    }

    fn apply(&mut self, input: OrbInput) -> bool {
        match self.state.next(input) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn pointer_enter(&mut self, now: Timestamp) {
        if now < self.visible_at {
            debug!("pointer enter before orb is visible deferred");
            self.pending_enter = true;
            return;
        }
        if !self.apply(OrbInput::PointerEnter) {
            return;
        }
        self.sample(now);
        self.affordance.set_cursor(CursorStyle::Pointer);

        let duration = self.settings.hover_duration_us;
        self.timeline.overwrite(Tween::new(
            OrbProperty::HoverGain,
            self.hover_gain,
            self.settings.hover_gain,
            now,
            duration,
            EasingType::Power2Out,
        ));
        self.timeline.overwrite(Tween::new(
            OrbProperty::Distortion,
            self.distortion,
            self.settings.hover_distortion,
            now,
            duration,
            EasingType::Power2Out,
        ));
        self.timeline.overwrite(Tween::new(
            OrbProperty::Spin,
            self.spin_offset,
            self.spin_offset + self.settings.hover_spin,
            now,
            duration,
            EasingType::Power1Out,
        ));
    }

    pub fn pointer_leave(&mut self, now: Timestamp) {
        self.pending_enter = false;
        if !self.apply(OrbInput::PointerLeave) {
            return;
        }
        self.sample(now);
        self.affordance.set_cursor(CursorStyle::Auto);

        let duration = self.settings.hover_duration_us;
        self.timeline.overwrite(Tween::new(
            OrbProperty::HoverGain,
            self.hover_gain,
            1.0,
            now,
            duration,
            EasingType::Power2Out,
        ));
        self.timeline.overwrite(Tween::new(
            OrbProperty::Distortion,
            self.distortion,
            self.settings.rest_distortion,
            now,
            duration,
            EasingType::Power2Out,
        ));
    }

    /// The commit gesture. Returns whether it was accepted; repeats are no-ops.
    pub fn commit(&mut self, now: Timestamp) -> bool {
        if now < self.visible_at {
            debug!("commit before orb is visible ignored");
            return false;
        }
        if !self.apply(OrbInput::Commit) {
            debug!(state = ?self.state, "duplicate commit ignored");
            return false;
        }

        // Bring the per-frame writer up to `now`, then retire it before the timeline
        // takes the scale.
        self.update_idle_motion(now);
        self.sample(now);
        self.size_locked = true;
        for property in [OrbProperty::HoverGain, OrbProperty::Distortion, OrbProperty::Spin] {
            self.timeline.kill(property);
        }

        let origin = self.screen_center();
        self.origin = Some(origin);

        let cover = self.camera.cover_scale(
            origin,
            self.position,
            self.settings.base_radius,
            &self.settings,
            &self.viewport,
        );
        let [ax, ay, az] = self.settings.commit.asymmetry;
        let start = CommitStart {
            scale: self.scale,
            target: Vec3::new(cover.target * ax, cover.target * ay, cover.target * az),
            distortion: self.distortion,
            metalness: self.metalness,
            roughness: self.roughness,
            emissive: self.emissive,
        };

        let specs = self.commit_sequence(&start);
        self.timeline.extend_at(now, &specs);

        let commit = &self.settings.commit;
        self.timeline.schedule(now.offset(commit.violent_at_us), OrbCue::Violent);
        self.timeline.schedule(now.offset(commit.expansion_us), OrbCue::Peak);
        self.timeline.schedule(
            now.offset(commit.expansion_us + commit.collapse_us),
            OrbCue::Dissolve,
        );

        self.affordance.set_cursor(CursorStyle::Auto);
        info!(
            origin_x = origin.x,
            origin_y = origin.y,
            target_scale = cover.target,
            clamped = cover.clamped,
            "orb committed"
        );
        true
    }

    fn commit_sequence(&self, start: &CommitStart) -> Vec<TweenSpec<OrbProperty>> {
        let c = &self.settings.commit;
        let violent = c.violent_at_us.min(c.expansion_us);
        let expansion = c.expansion_us;
        let collapse = c.collapse_us;

        vec![
            // Primary expansion, asymmetric per axis.
            TweenSpec::new(
                OrbProperty::ScaleX,
                start.scale.x,
                start.target.x,
                expansion,
                EasingType::Power2Out,
            ),
            TweenSpec::new(
                OrbProperty::ScaleY,
                start.scale.y,
                start.target.y,
                expansion,
                EasingType::Power2Out,
            ),
            TweenSpec::new(
                OrbProperty::ScaleZ,
                start.scale.z,
                start.target.z,
                expansion,
                EasingType::Power2Out,
            ),
            // Expanding1 then ViolentDistortion.
            TweenSpec::new(
                OrbProperty::Distortion,
                start.distortion,
                c.expanded_distortion,
                violent,
                EasingType::Power1InOut,
            ),
            TweenSpec::new(
                OrbProperty::Distortion,
                c.expanded_distortion,
                c.violent_distortion,
                expansion - violent,
                EasingType::Linear,
            )
            .at(violent),
            TweenSpec::new(
                OrbProperty::Metalness,
                start.metalness,
                c.peak_material[0],
                expansion,
                EasingType::Linear,
            ),
            TweenSpec::new(
                OrbProperty::Roughness,
                start.roughness,
                c.peak_material[1],
                expansion,
                EasingType::Linear,
            ),
            TweenSpec::new(
                OrbProperty::Emissive,
                start.emissive,
                c.peak_emissive,
                expansion,
                EasingType::Power1In,
            ),
            // Collapsing.
            TweenSpec::new(
                OrbProperty::Emissive,
                c.peak_emissive,
                0.0,
                collapse,
                EasingType::Power1Out,
            )
            .at(expansion),
            TweenSpec::new(
                OrbProperty::Metalness,
                c.peak_material[0],
                c.final_material[0],
                collapse,
                EasingType::Linear,
            )
            .at(expansion),
            TweenSpec::new(
                OrbProperty::Roughness,
                c.peak_material[1],
                c.final_material[1],
                collapse,
                EasingType::Linear,
            )
            .at(expansion),
            // The fade-in is long finished by the emissive peak.
            TweenSpec::new(OrbProperty::Opacity, 1.0, 0.0, collapse, EasingType::Power4In)
                .at(expansion),
        ]
    }

    /// Hide the orb without playing the sequence and without reporting.
    pub fn force_dissolve(&mut self) {
        if self.state == OrbState::Dissolved {
            return;
        }
        self.size_locked = true;
        self.pending_enter = false;
        self.timeline.kill_all();
        self.timeline.cancel_cues();
        self.state = OrbState::Dissolved;
        self.opacity = 0.0;
        self.affordance.set_cursor(CursorStyle::Auto);
    }

    /// Per-frame update. Returns events whose scheduled instant is at or before `now`.
    pub fn tick(&mut self, now: Timestamp) -> Vec<OrbEvent> {
        if self.pending_enter && now >= self.visible_at {
            self.pending_enter = false;
            self.pointer_enter(self.visible_at);
        }
        self.update_idle_motion(now);
        self.sample(now);

        let mut events = Vec::new();
        for (at, cue) in self.timeline.drain_due(now) {
            match cue {
                // Emissive peak ends the violent stage.
                OrbCue::Violent | OrbCue::Peak => {
                    self.apply(OrbInput::StageElapsed);
                }
                OrbCue::Dissolve => {
                    if self.apply(OrbInput::SequenceComplete) {
                        if let Some(origin) = self.origin {
                            events.push(OrbEvent::CommitReported { origin, at });
                        }
                        events.push(OrbEvent::Dissolved { at });
                    }
                }
            }
        }
        self.timeline.prune(now);
        events
    }

    fn update_idle_motion(&mut self, now: Timestamp) {
        if self.size_locked {
            return;
        }
        self.base_scale = self.camera.apparent_size_scale(
            self.settings.apparent_diameter_px,
            self.settings.base_radius,
            self.position,
            &self.viewport,
        );
        let t = now.since(self.mounted_at) as f64 / 1_000_000.0;
        self.rotation[0] = (t * self.settings.wobble_rate).sin() * self.settings.wobble_amplitude;
    }

    fn sample(&mut self, now: Timestamp) {
        let value = |p: OrbProperty, current: f64| self.timeline.sample(p, now).unwrap_or(current);

        let hover_gain = value(OrbProperty::HoverGain, self.hover_gain);
        let spin_offset = value(OrbProperty::Spin, self.spin_offset);
        let distortion = value(OrbProperty::Distortion, self.distortion);
        let metalness = value(OrbProperty::Metalness, self.metalness);
        let roughness = value(OrbProperty::Roughness, self.roughness);
        let emissive = value(OrbProperty::Emissive, self.emissive);
        let opacity = value(OrbProperty::Opacity, self.opacity);
        let scale = if self.size_locked {
            Vec3::new(
                value(OrbProperty::ScaleX, self.scale.x),
                value(OrbProperty::ScaleY, self.scale.y),
                value(OrbProperty::ScaleZ, self.scale.z),
            )
        } else {
            Vec3::splat(self.base_scale * hover_gain)
        };

        self.hover_gain = hover_gain;
        self.spin_offset = spin_offset;
        self.distortion = distortion;
        self.metalness = metalness;
        self.roughness = roughness;
        self.emissive = emissive;
        self.opacity = opacity.clamp(0.0, 1.0);
        self.scale = scale;

        if !self.size_locked {
            let t = now.since(self.mounted_at) as f64 / 1_000_000.0;
            self.rotation[1] = t * self.settings.idle_spin_rate + self.spin_offset;
        }
    }

    pub fn frame(&self, now: Timestamp) -> OrbFrame {
        OrbFrame {
            state: self.state,
            visible: self.is_visible(now),
            opacity: self.opacity,
            position: self.position,
            scale: self.scale,
            rotation: self.rotation,
            distortion: self.distortion,
            metalness: self.metalness,
            roughness: self.roughness,
            emissive_intensity: self.emissive,
        }
    }
}

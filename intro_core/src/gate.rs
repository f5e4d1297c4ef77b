// Entry gate: owns the intro phase and sequences pre-roll, orb, content fade, and overlay.
// Phase only moves forward: Loading -> Revealing -> Revealed.

use tracing::{debug, info, warn};

use crate::camera::OrbCamera;
use crate::cursor::PointerAffordance;
use crate::effects::PullLineGenerator;
use crate::error::IntroError;
use crate::orb::{Orb, OrbEvent};
use crate::reveal::RevealOverlay;
use crate::tween::{Timeline, Tween};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateProperty {
    ContentOpacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateCue {
    PreRollDone,
    Settle,
    FadeOut,
    Unmount,
    MaxWait,
}

/// Top-level intro sequencer.
pub struct EntryGate {
    settings: GateSettings,
    fade_out_delay_us: u64,
    viewport: Viewport,
    phase: IntroPhase,
    origin: Option<OriginPoint>,
    reveal: RevealTransitionState,
    overlay: RevealOverlay,
    orb: Orb,
    lines: Vec<PullLine>,
    preroll_muted: bool,
    content_opacity: f64,
    timeline: Timeline<GateProperty, GateCue>,
    events: Vec<GateEvent>,
}

impl EntryGate {
    /// Mount the loading screen: pre-roll lines now, orb visible once the pre-roll ends.
    pub fn mount(
        config: &IntroConfig,
        now: Timestamp,
        affordance: Box<dyn PointerAffordance>,
    ) -> Result<Self, IntroError> {
        config.validate()?;

        let lines =
            PullLineGenerator::new(config.preroll.clone()).generate(&config.viewport, config.seed);
        let orb_visible_at = now.offset(config.preroll.duration_us);
        let orb = Orb::new(
            config.orb.clone(),
            OrbCamera::new(config.camera),
            config.viewport,
            now,
            orb_visible_at,
            affordance,
        );

        let mut timeline = Timeline::new();
        timeline.schedule(orb_visible_at, GateCue::PreRollDone);
        if let Some(max_wait) = config.gate.max_wait_us {
            timeline.schedule(now.offset(max_wait), GateCue::MaxWait);
        }

        info!(
            lines = lines.len(),
            width = config.viewport.width,
            height = config.viewport.height,
            "intro mounted"
        );

        Ok(EntryGate {
            settings: config.gate.clone(),
            fade_out_delay_us: config.reveal.fade_out_delay_us,
            viewport: config.viewport,
            phase: IntroPhase::Loading,
            origin: None,
            reveal: RevealTransitionState::default(),
            overlay: RevealOverlay::new(&config.reveal),
            orb,
            lines,
            preroll_muted: false,
            content_opacity: 0.0,
            timeline,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn origin(&self) -> Option<OriginPoint> {
        self.origin
    }

    pub fn reveal_state(&self) -> RevealTransitionState {
        self.reveal
    }

    pub fn content_opacity(&self) -> f64 {
        self.content_opacity
    }

    pub fn orb(&self) -> &Orb {
        &self.orb
    }

    pub fn pull_lines(&self) -> &[PullLine] {
        &self.lines
    }

    /// The loading screen is mounted exactly while the intro is loading.
    pub fn loading_mounted(&self) -> bool {
        self.phase == IntroPhase::Loading
    }

    /// Route one host input. Anything due before the input is processed first.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<GateEvent> {
        let now = event.timestamp;
        self.step(now);
        match &event.event_type {
            EventType::PointerEnter => self.orb.pointer_enter(now),
            EventType::PointerLeave => self.orb.pointer_leave(now),
            EventType::Click => {
                self.orb.commit(now);
            }
            EventType::Resize { width, height } => {
                let viewport = Viewport::new(*width, *height);
                if viewport.is_valid() {
                    self.viewport = viewport;
                    self.orb.set_viewport(viewport);
                } else {
                    debug!(width, height, "ignoring degenerate resize");
                }
            }
            EventType::OrbMoved { x, y, z } => self.orb.set_position(Vec3::new(*x, *y, *z)),
        }
        self.take_events()
    }

    /// Commit report from the orb. Only the first report while loading is honored.
    pub fn on_commit_reported(&mut self, origin: OriginPoint, at: Timestamp) {
        if self.phase != IntroPhase::Loading {
            debug!(phase = ?self.phase, "duplicate origin report ignored");
            return;
        }

        self.origin = Some(origin);
        self.timeline.overwrite(Tween::new(
            GateProperty::ContentOpacity,
            self.content_opacity,
            1.0,
            at,
            self.settings.content_fade_us,
            self.settings.content_easing,
        ));
        self.reveal.activate();
        self.overlay.mark(RevealPhase::Expanding, at);
        self.set_phase(IntroPhase::Revealing, at);
        self.events.push(GateEvent::RevealPhaseChanged {
            phase: RevealPhase::Expanding,
            at,
        });
        self.timeline
            .schedule(at.offset(self.settings.settle_delay_us), GateCue::Settle);
    }

    /// Advance every timer and tween to `now` and return what happened, in time order.
    pub fn advance(&mut self, now: Timestamp) -> Vec<GateEvent> {
        self.step(now);
        self.take_events()
    }

    fn step(&mut self, now: Timestamp) {
        self.fire_due(now);

        for event in self.orb.tick(now) {
            match event {
                OrbEvent::CommitReported { origin, at } => self.on_commit_reported(origin, at),
                OrbEvent::Dissolved { at } => self.events.push(GateEvent::OrbDissolved { at }),
            }
        }

        // A report may have scheduled cues that are already due.
        self.fire_due(now);

        if let Some(opacity) = self.timeline.sample(GateProperty::ContentOpacity, now) {
            self.content_opacity = opacity.clamp(0.0, 1.0);
        }
        self.timeline.prune(now);
    }

    fn fire_due(&mut self, now: Timestamp) {
        loop {
            let due = self.timeline.drain_due(now);
            if due.is_empty() {
                break;
            }
            for (at, cue) in due {
                self.fire(cue, at);
            }
        }
    }

    fn fire(&mut self, cue: GateCue, at: Timestamp) {
        match cue {
            GateCue::PreRollDone => {
                self.preroll_muted = true;
                self.events.push(GateEvent::PreRollMuted { at });
            }
            GateCue::Settle => {
                self.set_phase(IntroPhase::Revealed, at);
                self.enter_reveal_phase(RevealPhase::Settling, at);
                self.timeline
                    .schedule(at.offset(self.fade_out_delay_us), GateCue::FadeOut);
                self.timeline
                    .schedule(at.offset(self.overlay.fade_span_us()), GateCue::Unmount);
            }
            GateCue::FadeOut => self.enter_reveal_phase(RevealPhase::FadingOut, at),
            GateCue::Unmount => {
                self.reveal.active = false;
                self.events.push(GateEvent::OverlayUnmounted { at });
                info!(at_ms = at.as_millis(), "reveal overlay unmounted");
            }
            GateCue::MaxWait => {
                // A committed orb reports on its own schedule.
                if self.phase == IntroPhase::Loading && !self.orb.state().is_committed() {
                    warn!(at_ms = at.as_millis(), "no commit before max wait, forcing reveal");
                    self.orb.force_dissolve();
                    self.on_commit_reported(self.viewport.center(), at);
                }
            }
        }
    }

    fn enter_reveal_phase(&mut self, phase: RevealPhase, at: Timestamp) {
        if self.reveal.advance_to(phase) {
            self.overlay.mark(phase, at);
            self.events.push(GateEvent::RevealPhaseChanged { phase, at });
        }
    }

    fn set_phase(&mut self, phase: IntroPhase, at: Timestamp) {
        if phase <= self.phase {
            return;
        }
        info!(from = ?self.phase, to = ?phase, at_ms = at.as_millis(), "intro phase changed");
        self.phase = phase;
        self.events.push(GateEvent::PhaseChanged { phase, at });
    }

    fn take_events(&mut self) -> Vec<GateEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.sort_by_key(GateEvent::at);
        events
    }

    /// Snapshot for rendering. Call after `advance(now)`.
    pub fn frame(&self, now: Timestamp, cursor: CursorStyle) -> IntroFrame {
        let blobs = match self.origin {
            Some(origin) => self.overlay.render(&self.reveal, origin, &self.viewport, now),
            None => Vec::new(),
        };
        IntroFrame {
            timestamp: now,
            phase: self.phase,
            origin: self.origin,
            content_opacity: self.content_opacity,
            loading_mounted: self.loading_mounted(),
            preroll: PreRollFrame {
                muted: self.preroll_muted,
                lines: self.lines.clone(),
            },
            orb: self.orb.frame(now),
            reveal: self.reveal,
            blobs,
            cursor,
            events: Vec::new(),
        }
    }
}

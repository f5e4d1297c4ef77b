// Declarative tween timeline evaluated against a virtual clock.
// Entries are (property, from, to, duration, offset, easing); cues fire once at a fixed offset.

use crate::easing::{lerp, EasingType};
use crate::types::Timestamp;

/// A single property interpolation anchored at an absolute start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<P> {
    pub property: P,
    pub from: f64,
    pub to: f64,
    pub start: Timestamp,
    pub duration_us: u64,
    pub easing: EasingType,
}

impl<P: Copy + PartialEq> Tween<P> {
    pub fn new(
        property: P,
        from: f64,
        to: f64,
        start: Timestamp,
        duration_us: u64,
        easing: EasingType,
    ) -> Self {
        Tween {
            property,
            from,
            to,
            start,
            duration_us,
            easing,
        }
    }

    pub fn end(&self) -> Timestamp {
        self.start.offset(self.duration_us)
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now: Timestamp) -> f64 {
        if self.duration_us == 0 {
            return if now >= self.start { 1.0 } else { 0.0 };
        }
        (now.since(self.start) as f64 / self.duration_us as f64).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Timestamp) -> f64 {
        lerp(self.from, self.to, self.easing.apply(self.progress(now)))
    }

    pub fn is_complete(&self, now: Timestamp) -> bool {
        now >= self.end()
    }
}

/// Declarative timeline entry, relative to the timeline's anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec<P> {
    pub property: P,
    pub from: f64,
    pub to: f64,
    pub duration_us: u64,
    pub offset_us: u64,
    pub easing: EasingType,
}

impl<P: Copy + PartialEq> TweenSpec<P> {
    pub fn new(property: P, from: f64, to: f64, duration_us: u64, easing: EasingType) -> Self {
        TweenSpec {
            property,
            from,
            to,
            duration_us,
            offset_us: 0,
            easing,
        }
    }

    pub fn at(mut self, offset_us: u64) -> Self {
        self.offset_us = offset_us;
        self
    }

    pub fn anchor(&self, anchor: Timestamp) -> Tween<P> {
        Tween::new(
            self.property,
            self.from,
            self.to,
            anchor.offset(self.offset_us),
            self.duration_us,
            self.easing,
        )
    }
}

#[derive(Debug, Clone)]
struct Cue<C> {
    at: Timestamp,
    cue: C,
    fired: bool,
}

/// Set of property tweens plus one-shot cues driven by explicit timestamps.
///
/// For each property the tween with the latest start at or before `now` wins, so a
/// later tween on the same property overrides an earlier one without either
/// being edited. `kill` drops every tween on a property outright.
#[derive(Debug, Clone)]
pub struct Timeline<P, C> {
    tweens: Vec<Tween<P>>,
    cues: Vec<Cue<C>>,
}

impl<P, C> Default for Timeline<P, C> {
    fn default() -> Self {
        Timeline {
            tweens: Vec::new(),
            cues: Vec::new(),
        }
    }
}

impl<P: Copy + PartialEq, C: Clone> Timeline<P, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tween: Tween<P>) {
        self.tweens.push(tween);
    }

    /// Anchor every spec at `anchor`; all of them share the same zero offset.
    pub fn extend_at(&mut self, anchor: Timestamp, specs: &[TweenSpec<P>]) {
        self.tweens.extend(specs.iter().map(|spec| spec.anchor(anchor)));
    }

    /// Replace any tween on `tween.property` with `tween`.
    pub fn overwrite(&mut self, tween: Tween<P>) {
        self.kill(tween.property);
        self.tweens.push(tween);
    }

    pub fn kill(&mut self, property: P) {
        self.tweens.retain(|t| t.property != property);
    }

    pub fn kill_all(&mut self) {
        self.tweens.clear();
    }

    pub fn schedule(&mut self, at: Timestamp, cue: C) {
        self.cues.push(Cue {
            at,
            cue,
            fired: false,
        });
    }

    pub fn cancel_cues(&mut self) {
        self.cues.clear();
    }

    /// Current value of `property`, or `None` if no tween on it has started yet.
    pub fn sample(&self, property: P, now: Timestamp) -> Option<f64> {
        self.tweens
            .iter()
            .filter(|t| t.property == property && t.start <= now)
            .max_by_key(|t| t.start)
            .map(|t| t.value_at(now))
    }

    /// Cues due at or before `now`, in schedule order, each returned exactly once
    /// together with its scheduled instant.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<(Timestamp, C)> {
        let mut due: Vec<(Timestamp, C)> = self
            .cues
            .iter_mut()
            .filter(|c| !c.fired && c.at <= now)
            .map(|c| {
                c.fired = true;
                (c.at, c.cue.clone())
            })
            .collect();
        due.sort_by_key(|(at, _)| *at);
        self.cues.retain(|c| !c.fired);
        due
    }

    /// Drop tweens that can no longer win a sample.
    pub fn prune(&mut self, now: Timestamp) {
        let snapshot = self.tweens.clone();
        self.tweens.retain(|t| {
            !t.is_complete(now)
                || !snapshot.iter().any(|other| {
                    other.property == t.property && other.start > t.start && other.start <= now
                })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Prop {
        A,
        B,
    }

    fn ts(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn tween_interpolates_and_holds() {
        let tween = Tween::new(Prop::A, 0.0, 10.0, ts(100), 1_000_000, EasingType::Linear);
        assert_eq!(tween.value_at(ts(0)), 0.0);
        assert!((tween.value_at(ts(600)) - 5.0).abs() < 1e-9);
        assert_eq!(tween.value_at(ts(5000)), 10.0);
        assert!(tween.is_complete(ts(1100)));
        assert!(!tween.is_complete(ts(1099)));
    }

    #[test]
    fn zero_duration_jumps() {
        let tween = Tween::new(Prop::A, 1.0, 2.0, ts(10), 0, EasingType::Linear);
        assert_eq!(tween.value_at(ts(9)), 1.0);
        assert_eq!(tween.value_at(ts(10)), 2.0);
    }

    #[test]
    fn later_tween_wins() {
        let mut timeline: Timeline<Prop, ()> = Timeline::new();
        timeline.extend_at(
            ts(0),
            &[
                TweenSpec::new(Prop::A, 0.0, 1.0, 1_000_000, EasingType::Linear),
                TweenSpec::new(Prop::A, 1.0, 3.0, 1_000_000, EasingType::Linear).at(1_000_000),
            ],
        );
        assert!((timeline.sample(Prop::A, ts(500)).unwrap() - 0.5).abs() < 1e-9);
        assert!((timeline.sample(Prop::A, ts(1500)).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(timeline.sample(Prop::B, ts(1500)), None);
    }

    #[test]
    fn unstarted_tween_does_not_sample() {
        let mut timeline: Timeline<Prop, ()> = Timeline::new();
        timeline.push(Tween::new(Prop::A, 0.0, 1.0, ts(100), 1000, EasingType::Linear));
        assert_eq!(timeline.sample(Prop::A, ts(50)), None);
    }

    #[test]
    fn overwrite_supersedes_in_flight_tween() {
        let mut timeline: Timeline<Prop, ()> = Timeline::new();
        timeline.push(Tween::new(Prop::A, 0.0, 1.0, ts(0), 1_000_000, EasingType::Linear));
        let current = timeline.sample(Prop::A, ts(400)).unwrap();
        timeline.overwrite(Tween::new(Prop::A, current, 0.0, ts(400), 400_000, EasingType::Linear));
        assert!((timeline.sample(Prop::A, ts(400)).unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(timeline.sample(Prop::A, ts(900)), Some(0.0));
    }

    #[test]
    fn cues_fire_once_in_order() {
        let mut timeline: Timeline<Prop, &str> = Timeline::new();
        timeline.schedule(ts(200), "second");
        timeline.schedule(ts(100), "first");
        timeline.schedule(ts(900), "later");

        assert!(timeline.drain_due(ts(50)).is_empty());
        let due = timeline.drain_due(ts(250));
        assert_eq!(due, vec![(ts(100), "first"), (ts(200), "second")]);
        assert!(timeline.drain_due(ts(300)).is_empty());
        assert_eq!(timeline.drain_due(ts(900)), vec![(ts(900), "later")]);
    }

    #[test]
    fn cancelled_cues_never_fire() {
        let mut timeline: Timeline<Prop, ()> = Timeline::new();
        timeline.schedule(ts(50), ());
        timeline.cancel_cues();
        assert!(timeline.drain_due(ts(100)).is_empty());
    }

    #[test]
    fn prune_keeps_winning_tweens() {
        let mut timeline: Timeline<Prop, ()> = Timeline::new();
        timeline.push(Tween::new(Prop::A, 0.0, 1.0, ts(0), 100_000, EasingType::Linear));
        timeline.push(Tween::new(Prop::A, 1.0, 2.0, ts(200), 100_000, EasingType::Linear));
        timeline.prune(ts(150));
        assert_eq!(timeline.sample(Prop::A, ts(150)), Some(1.0));
        timeline.prune(ts(250));
        assert!((timeline.sample(Prop::A, ts(250)).unwrap() - 1.5).abs() < 1e-9);
    }
}

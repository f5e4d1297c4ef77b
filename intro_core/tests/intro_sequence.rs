// End-to-end intro scenarios driven by literal timestamps.

use intro_core::*;

fn ms(v: u64) -> Timestamp {
    Timestamp::from_millis(v)
}

fn at(t: Timestamp, event_type: EventType) -> InputEvent {
    InputEvent {
        timestamp: t,
        event_type,
    }
}

fn engine() -> IntroEngine {
    IntroEngine::from_config(&IntroConfig::default(), ms(0)).unwrap()
}

#[test]
fn report_at_center_starts_reveal_and_settles_on_schedule() {
    let mut gate =
        EntryGate::mount(&IntroConfig::default(), ms(0), Box::new(CursorLog::new())).unwrap();
    gate.on_commit_reported(OriginPoint::new(960.0, 540.0), ms(0));

    let frame = gate.frame(ms(0), CursorStyle::Auto);
    assert_eq!(frame.phase, IntroPhase::Revealing);
    assert_eq!(frame.origin, Some(OriginPoint::new(960.0, 540.0)));
    assert!(frame.reveal.active);
    assert_eq!(frame.reveal.phase, RevealPhase::Expanding);
    assert_eq!(frame.blobs[0].center, OriginPoint::new(960.0, 540.0));

    gate.advance(ms(799));
    assert_eq!(gate.reveal_state().phase, RevealPhase::Expanding);

    let events = gate.advance(ms(800));
    assert_eq!(
        events,
        vec![
            GateEvent::PhaseChanged {
                phase: IntroPhase::Revealed,
                at: ms(800)
            },
            GateEvent::RevealPhaseChanged {
                phase: RevealPhase::Settling,
                at: ms(800)
            },
        ]
    );
}

#[test]
fn hovering_never_reveals() {
    let mut engine = engine();
    for i in 0..10 {
        let t = 2000 + i * 300;
        engine.apply(&at(ms(t), EventType::PointerEnter));
        engine.apply(&at(ms(t + 150), EventType::PointerLeave));
    }
    let frame = engine.frame(ms(30_000));
    assert_eq!(frame.phase, IntroPhase::Loading);
    assert!(frame.loading_mounted);
    assert_eq!(frame.origin, None);
    assert_eq!(frame.content_opacity, 0.0);
    assert!(!frame.reveal.active);
    assert_eq!(frame.cursor, CursorStyle::Auto);
}

#[test]
fn second_click_is_a_no_op() {
    let mut engine = engine();
    engine.apply(&at(ms(2000), EventType::Click));
    engine.apply(&at(ms(2010), EventType::Click));

    let mut reveals = 0;
    for t in (2000..8000).step_by(16) {
        reveals += engine
            .apply(&at(ms(t), EventType::OrbMoved {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            }))
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GateEvent::PhaseChanged {
                        phase: IntroPhase::Revealing,
                        ..
                    }
                )
            })
            .count();
    }
    assert_eq!(reveals, 1);
    assert_eq!(engine.gate().phase(), IntroPhase::Revealed);
}

#[test]
fn full_sequence_from_click_to_unmount() {
    let mut engine = engine();

    let frame = engine.frame(ms(500));
    assert!(!frame.preroll.muted);
    assert!(!frame.orb.visible);
    assert_eq!(frame.preroll.lines.len(), 30);

    engine.apply(&at(ms(1800), EventType::PointerEnter));
    assert_eq!(engine.cursor(), CursorStyle::Pointer);
    engine.apply(&at(ms(2000), EventType::Click));
    assert_eq!(engine.cursor(), CursorStyle::Auto);

    let frame = engine.frame(ms(3000));
    assert_eq!(frame.orb.state, OrbState::Committed(CommitStage::Expanding1));
    assert_eq!(frame.phase, IntroPhase::Loading);
    assert_eq!(frame.content_opacity, 0.0);

    let frame = engine.frame(ms(4000));
    assert_eq!(
        frame.orb.state,
        OrbState::Committed(CommitStage::ViolentDistortion)
    );

    // Emissive peak: the orb collapses but is still on the loading screen.
    let frame = engine.frame(ms(4500));
    assert_eq!(frame.orb.state, OrbState::Committed(CommitStage::Collapsing));
    assert_eq!(frame.phase, IntroPhase::Loading);
    assert!(frame.loading_mounted);
    assert!(frame.orb.visible);
    assert!(!frame.reveal.active);

    // Dissolution complete: the reveal starts from the orb's screen position.
    let frame = engine.frame(ms(5100));
    assert_eq!(frame.orb.state, OrbState::Dissolved);
    assert!(!frame.orb.visible);
    assert_eq!(frame.phase, IntroPhase::Revealing);
    assert_eq!(frame.origin, Some(OriginPoint::new(960.0, 540.0)));
    assert!(!frame.loading_mounted);
    assert!(frame.reveal.active);
    assert_eq!(frame.blobs.len(), 3);

    let frame = engine.frame(ms(5900));
    assert_eq!(frame.phase, IntroPhase::Revealed);
    assert_eq!(frame.reveal.phase, RevealPhase::Settling);

    let frame = engine.frame(ms(6100));
    assert_eq!(frame.reveal.phase, RevealPhase::FadingOut);
    assert_eq!(frame.content_opacity, 1.0);

    let frame = engine.frame(ms(7099));
    assert!(frame.reveal.active);
    let frame = engine.frame(ms(7100));
    assert!(!frame.reveal.active);
    assert!(frame.blobs.is_empty());
    assert_eq!(frame.phase, IntroPhase::Revealed);
}

#[test]
fn polling_frames_alone_delivers_every_transition() {
    let mut engine = engine();
    engine.apply(&at(ms(2000), EventType::Click));

    let mut events = Vec::new();
    for t in (2000..8000).step_by(16) {
        events.extend(engine.frame(ms(t)).events);
    }
    assert_eq!(
        events,
        vec![
            GateEvent::PhaseChanged {
                phase: IntroPhase::Revealing,
                at: ms(5100)
            },
            GateEvent::RevealPhaseChanged {
                phase: RevealPhase::Expanding,
                at: ms(5100)
            },
            GateEvent::OrbDissolved { at: ms(5100) },
            GateEvent::PhaseChanged {
                phase: IntroPhase::Revealed,
                at: ms(5900)
            },
            GateEvent::RevealPhaseChanged {
                phase: RevealPhase::Settling,
                at: ms(5900)
            },
            GateEvent::RevealPhaseChanged {
                phase: RevealPhase::FadingOut,
                at: ms(6100)
            },
            GateEvent::OverlayUnmounted { at: ms(7100) },
        ]
    );
}

#[test]
fn pointer_resting_on_orb_hovers_when_it_appears() {
    let mut engine = engine();
    engine.apply(&at(ms(800), EventType::PointerEnter));
    assert_eq!(engine.frame(ms(1499)).cursor, CursorStyle::Auto);

    let frame = engine.frame(ms(1500));
    assert_eq!(frame.orb.state, OrbState::Hovered);
    assert_eq!(frame.cursor, CursorStyle::Pointer);
}

#[test]
fn content_fades_in_only_once_revealing() {
    let mut engine = engine();
    engine.apply(&at(ms(1500), EventType::Click));

    let mut last = 0.0;
    for t in (1500..6000).step_by(50) {
        let frame = engine.frame(ms(t));
        if frame.phase == IntroPhase::Loading {
            assert_eq!(frame.content_opacity, 0.0);
        } else {
            assert!(frame.reveal.active || frame.phase == IntroPhase::Revealed);
            assert!(frame.content_opacity >= last);
        }
        last = frame.content_opacity;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn max_wait_reveals_from_viewport_center() {
    let config: IntroConfig = serde_json::from_str(
        r#"{"viewport":{"width":1280,"height":720},"gate":{"max_wait_us":8000000}}"#,
    )
    .unwrap();
    let mut engine = IntroEngine::from_config(&config, ms(0)).unwrap();

    let frame = engine.frame(ms(7999));
    assert_eq!(frame.phase, IntroPhase::Loading);

    let frame = engine.frame(ms(8000));
    assert_eq!(frame.phase, IntroPhase::Revealing);
    assert_eq!(frame.origin, Some(OriginPoint::new(640.0, 360.0)));
    assert_eq!(frame.orb.state, OrbState::Dissolved);
    assert_eq!(frame.orb.opacity, 0.0);
}

#[test]
fn empty_config_uses_stock_intro() {
    let config: IntroConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.viewport, Viewport::new(1920.0, 1080.0));
    assert_eq!(config.preroll.line_count, 30);
    assert_eq!(config.gate.settle_delay_us, 800_000);
    assert_eq!(config.gate.max_wait_us, None);
    assert_eq!(config.reveal.layers.len(), 3);
    assert!(config.validate().is_ok());
}

#[test]
fn json_inputs_drive_the_engine() {
    let mut engine = engine();
    let batch: InputBatch = serde_json::from_str(
        r#"{"events":[
            {"timestamp":1600000,"event_type":{"type":"PointerEnter"}},
            {"timestamp":1700000,"event_type":{"type":"OrbMoved","x":0.0,"y":0.0,"z":0.0}},
            {"timestamp":1800000,"event_type":{"type":"Resize","width":1000,"height":500}},
            {"timestamp":1900000,"event_type":{"type":"Click"}}
        ]}"#,
    )
    .unwrap();
    let events = engine.apply_batch(&batch).unwrap();
    assert_eq!(events, vec![GateEvent::PreRollMuted { at: ms(1500) }]);

    let frame = engine.frame(ms(5000));
    assert_eq!(frame.origin, Some(OriginPoint::new(500.0, 250.0)));

    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["phase"], "Revealing");
    assert_eq!(json["loading_mounted"], false);
}

#[test]
fn committed_orb_outgrows_rest_scale_without_touching_near_plane() {
    let mut engine = engine();
    let rest = engine.frame(ms(1600)).orb.scale;
    engine.apply(&at(ms(1600), EventType::Click));
    let peak = engine.frame(ms(4100)).orb.scale;
    assert!(peak.x > rest.x);
    assert!(peak.y < peak.x);

    let camera = OrbCamera::new(CameraSettings::default());
    let surface = camera.distance_to(Vec3::default()) - peak.max_component() * 1.2;
    assert!(surface > CameraSettings::default().near);
}

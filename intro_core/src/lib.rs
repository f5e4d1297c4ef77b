// intro_core: portfolio intro sequencer, Rust/WASM.
// The host owns rendering and the clock; every call here carries an explicit timestamp.

mod camera;
mod cursor;
mod easing;
mod effects;
mod error;
mod gate;
mod orb;
mod reveal;
mod tween;
mod types;

use wasm_bindgen::prelude::*;

pub use camera::{CoverScale, OrbCamera};
pub use cursor::{CursorLatch, CursorLog, PointerAffordance};
pub use easing::{lerp, CubicBezier, EasingType};
pub use effects::PullLineGenerator;
pub use error::IntroError;
pub use gate::EntryGate;
pub use orb::{Orb, OrbEvent, OrbInput, OrbProperty};
pub use reveal::RevealOverlay;
pub use tween::{Timeline, Tween, TweenSpec};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Intro interface exposed to JavaScript.
/// Inputs can be batched to minimize JS↔WASM crossings.
#[wasm_bindgen]
pub struct IntroEngine {
    gate: EntryGate,
    cursor: CursorLatch,
}

impl IntroEngine {
    /// Native constructor; the WASM constructor wraps it.
    pub fn from_config(config: &IntroConfig, now: Timestamp) -> Result<Self, IntroError> {
        let cursor = CursorLatch::new();
        let gate = EntryGate::mount(config, now, Box::new(cursor.clone()))?;
        Ok(IntroEngine { gate, cursor })
    }

    pub fn from_json(config_json: &str, now: Timestamp) -> Result<Self, IntroError> {
        let config: IntroConfig = serde_json::from_str(config_json)?;
        Self::from_config(&config, now)
    }

    pub fn gate(&self) -> &EntryGate {
        &self.gate
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor.current()
    }

    pub fn apply(&mut self, event: &InputEvent) -> Vec<GateEvent> {
        self.gate.handle_input(event)
    }

    /// Apply a batch in timestamp order. An out-of-order event is rejected;
    /// those before it stay applied.
    pub fn apply_batch(&mut self, batch: &InputBatch) -> Result<Vec<GateEvent>, IntroError> {
        let mut last = Timestamp::default();
        let mut out = Vec::new();
        for event in &batch.events {
            if event.timestamp < last {
                return Err(IntroError::InvalidEvent(format!(
                    "event at {}us precedes {}us",
                    event.timestamp.as_micros(),
                    last.as_micros()
                )));
            }
            last = event.timestamp;
            out.extend(self.gate.handle_input(event));
        }
        Ok(out)
    }

    /// Advance to `now` and snapshot the frame, carrying the events the advance fired.
    pub fn frame(&mut self, now: Timestamp) -> IntroFrame {
        let events = self.gate.advance(now);
        IntroFrame {
            events,
            ..self.gate.frame(now, self.cursor.current())
        }
    }
}

#[wasm_bindgen]
impl IntroEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, now_us: u64) -> Result<IntroEngine, JsValue> {
        Self::from_json(config_json, Timestamp::from_micros(now_us))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Route one input event. Returns the sequence events it caused as JSON.
    pub fn handle_input(&mut self, input_json: &str) -> Result<String, JsValue> {
        let event: InputEvent = serde_json::from_str(input_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid input: {}", e)))?;
        let events = self.apply(&event);
        serde_json::to_string(&events)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Batch form of `handle_input`.
    pub fn handle_inputs(&mut self, batch_json: &str) -> Result<String, JsValue> {
        let batch: InputBatch = serde_json::from_str(batch_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid input batch: {}", e)))?;
        let events = self
            .apply_batch(&batch)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&events)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Frame snapshot at `now_us` as JSON.
    pub fn frame_at(&mut self, now_us: u64) -> Result<String, JsValue> {
        let frame = self.frame(Timestamp::from_micros(now_us));
        serde_json::to_string(&frame)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn pull_lines(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.gate.pull_lines())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// `"Loading"`, `"Revealing"` or `"Revealed"`.
    pub fn phase(&self) -> String {
        format!("{:?}", self.gate.phase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creation_works() {
        let engine = IntroEngine::from_json("{}", Timestamp::default());
        assert!(engine.is_ok());
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = IntroEngine::from_json(r#"{"camera":{"fov_deg":0}}"#, Timestamp::default());
        assert!(matches!(err, Err(IntroError::InvalidConfig(_))));
        let err = IntroEngine::from_json("not json", Timestamp::default());
        assert!(matches!(err, Err(IntroError::Serialization(_))));
    }

    #[test]
    fn out_of_order_batch_is_rejected() {
        let mut engine = IntroEngine::from_json("{}", Timestamp::default()).unwrap();
        let batch: InputBatch = serde_json::from_str(
            r#"{"events":[
                {"timestamp":2000000,"event_type":{"type":"PointerEnter"}},
                {"timestamp":1900000,"event_type":{"type":"Click"}}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            engine.apply_batch(&batch),
            Err(IntroError::InvalidEvent(_))
        ));
    }

    #[test]
    fn timed_events_reach_frame_polling_host() {
        let mut engine = IntroEngine::from_json("{}", Timestamp::default()).unwrap();
        let mut seen = engine.apply(&InputEvent {
            timestamp: Timestamp::from_millis(2000),
            event_type: EventType::Click,
        });
        seen.extend(engine.frame(Timestamp::from_millis(6000)).events);
        seen.extend(engine.apply(&InputEvent {
            timestamp: Timestamp::from_millis(7000),
            event_type: EventType::PointerLeave,
        }));
        seen.extend(engine.frame(Timestamp::from_millis(8000)).events);

        let revealing = GateEvent::PhaseChanged {
            phase: IntroPhase::Revealing,
            at: Timestamp::from_millis(5100),
        };
        assert_eq!(seen.iter().filter(|e| **e == revealing).count(), 1);
        assert!(seen.contains(&GateEvent::RevealPhaseChanged {
            phase: RevealPhase::FadingOut,
            at: Timestamp::from_millis(6100),
        }));
        assert!(seen.contains(&GateEvent::OverlayUnmounted {
            at: Timestamp::from_millis(7100),
        }));
        assert_eq!(seen.len(), 8);
        assert!(engine.frame(Timestamp::from_millis(9000)).events.is_empty());
    }

    #[test]
    fn cursor_follows_hover() {
        let mut engine = IntroEngine::from_json("{}", Timestamp::default()).unwrap();
        let enter = InputEvent {
            timestamp: Timestamp::from_millis(1600),
            event_type: EventType::PointerEnter,
        };
        engine.apply(&enter);
        assert_eq!(engine.cursor(), CursorStyle::Pointer);
        assert_eq!(
            engine.frame(Timestamp::from_millis(1700)).cursor,
            CursorStyle::Pointer
        );
        assert_eq!(engine.phase(), "Loading");
    }
}

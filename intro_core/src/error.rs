// Typed errors with thiserror. Only the host boundary can fail; sequencer guards are silent no-ops.

use thiserror::Error;

/// Intro engine error types.
#[derive(Error, Debug)]
pub enum IntroError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input event: {0}")]
    InvalidEvent(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for IntroError {
    fn from(err: serde_json::Error) -> Self {
        IntroError::Serialization(err.to_string())
    }
}

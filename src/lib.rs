//! tapster - voice-activation and command-interpretation engine
//!
//! Consumes speech-transcription results from an external recognizer,
//! decides when to wake despite noisy recognition, runs a time-bounded
//! command session, and classifies utterances into structured application
//! intents. Audio capture, persistence, and UI belong to the host.

pub mod config;
pub mod engine;
pub mod fuzzy;
pub mod intent;
pub mod order;
pub mod phonetic;
pub mod session;
pub mod termination;
pub mod timeout;
pub mod wake;

pub use config::{Config, ConfigError};
pub use engine::{
    ControllerCommand, EngineEvent, ModeController, RestartPolicy, TERMINATION_SENTINEL,
    TranscriptEvent,
};
pub use intent::{Action, CommandResponse, IntentRouter};
pub use order::{OrderDetails, ProductOrderExtractor};
pub use session::Mode;

//! Recognition engine abstraction
//!
//! The engine is an opaque hypothesis producer: it consumes PCM frames and
//! emits partial results, one final result, or one classified error per
//! run. Implementations adapt a recognizer's callback or delegate API onto
//! the channel surface defined here; the session never sees anything
//! platform-specific.

pub mod scripted;

pub use scripted::{ScriptStep, ScriptedRecognizer};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::audio::AudioFrame;

/// Recognizer settings for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// BCP-47 locale tag to recognize
    pub locale: String,
    /// Whether to deliver partial hypotheses before the final one
    pub report_partials: bool,
    /// Upper bound on hypothesis alternatives requested from the recognizer
    pub max_alternatives: u32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            report_partials: true,
            max_alternatives: 1,
        }
    }
}

/// Classified engine-side failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineFault {
    Audio,
    Client,
    InsufficientPermissions,
    Network,
    NetworkTimeout,
    NoMatch,
    Busy,
    Server,
    SpeechTimeout,
    Unknown,
}

impl EngineFault {
    /// The human-readable message carried by the failure notice
    pub fn message(self) -> &'static str {
        match self {
            EngineFault::Audio => "Audio recording error",
            EngineFault::Client => "Client side error",
            EngineFault::InsufficientPermissions => "Insufficient permissions",
            EngineFault::Network => "Network error",
            EngineFault::NetworkTimeout => "Network timeout",
            EngineFault::NoMatch => "No match found",
            EngineFault::Busy => "Recognizer is busy",
            EngineFault::Server => "Error from server",
            EngineFault::SpeechTimeout => "No speech input",
            EngineFault::Unknown => "An unknown error occurred",
        }
    }
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Event produced by a live recognizer instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Incremental hypothesis; any number may precede the terminal event
    Partial(String),
    /// Final hypothesis; terminates the run
    Final(String),
    /// Classified failure; terminates the run
    Error(EngineFault),
}

/// Control surface of one live recognizer instance.
///
/// All methods take `&self` so the handle can be shared between the owning
/// session and its pump task; implementations use interior mutability.
pub trait EngineHandle: Send + Sync {
    /// Append captured audio to the recognizer's input
    fn feed(&self, frame: &AudioFrame);

    /// Signal end-of-audio and request the final hypothesis
    fn finish(&self);

    /// Abandon the run; no further events are expected after this
    fn cancel(&self);
}

/// A live recognizer: the control handle plus its event stream
pub struct RecognizerInstance {
    pub handle: Arc<dyn EngineHandle>,
    pub events: mpsc::Receiver<EngineEvent>,
}

/// Recognition engine factory trait
#[async_trait::async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Whether recognition is usable on this host at all
    fn is_available(&self) -> bool;

    /// Whether the given BCP-47 locale can be recognized
    fn supports_locale(&self, locale: &str) -> bool {
        let _ = locale;
        true
    }

    /// Construct a fresh recognizer instance for one run
    async fn create(&self, config: &RecognizerConfig) -> Result<RecognizerInstance>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

use serde::{Deserialize, Serialize};

use crate::audio::CaptureConfig;
use crate::engine::RecognizerConfig;

/// Configuration for a transcription session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "session-2026-08-07-dictation")
    pub session_id: String,

    /// BCP-47 locale tag to recognize
    pub locale: String,

    /// Whether to deliver partial hypotheses (final-only when false)
    pub report_partials: bool,

    /// Upper bound on hypothesis alternatives requested from the recognizer
    pub max_alternatives: u32,

    /// Capture sample rate in Hz
    pub sample_rate: u32,

    /// Number of capture channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Capture buffer duration (frame cadence) in milliseconds
    pub buffer_duration_ms: u64,
}

impl SessionConfig {
    pub(crate) fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            buffer_duration_ms: self.buffer_duration_ms,
        }
    }

    pub(crate) fn recognizer_config(&self) -> RecognizerConfig {
        RecognizerConfig {
            locale: self.locale.clone(),
            report_partials: self.report_partials,
            max_alternatives: self.max_alternatives,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            locale: "en-US".to_string(),
            report_partials: true,
            max_alternatives: 1,
            sample_rate: 16000, // the common recognizer input rate
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

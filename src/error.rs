use thiserror::Error;

use crate::events::FailureNotice;

/// Failure to start a streaming session.
///
/// Start failures are dual-channel: the caller gets this error and passive
/// subscribers get the matching `FailureNotice` on the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// The host has no usable speech recognition support
    #[error("Speech recognition is not available on this device.")]
    CapabilityUnavailable,

    /// Microphone or recognition permission has not been granted
    #[error("Missing microphone or speech recognition permission.")]
    PermissionDenied,

    /// The recognizer could not be initialized for the requested configuration
    #[error("Recognizer failed to initialize: {0}")]
    EngineUnavailable(String),

    /// The audio capture subscription could not be acquired
    #[error("Failed to acquire audio capture: {0}")]
    CaptureUnavailable(String),
}

impl StartError {
    /// The notice emitted on the event bus for this failure
    pub fn notice(&self) -> FailureNotice {
        FailureNotice {
            message: self.to_string(),
        }
    }
}

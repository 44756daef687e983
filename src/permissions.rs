//! Permission checks consulted before a session may start.
//!
//! The session only *checks* access; prompting the user for grants is the
//! embedder's job and happens before the session is asked to start.

/// Query surface for microphone and speech-recognition access
pub trait PermissionGate: Send + Sync {
    /// Whether microphone capture has been granted
    fn has_microphone_access(&self) -> bool;

    /// Whether speech recognition has been granted
    fn has_recognition_access(&self) -> bool;

    /// Both grants are required before a session may start
    fn has_microphone_and_recognition_access(&self) -> bool {
        self.has_microphone_access() && self.has_recognition_access()
    }
}

/// Fixed grant set, for embedders that resolve permissions up front
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    pub microphone: bool,
    pub recognition: bool,
}

impl StaticPermissions {
    pub fn granted() -> Self {
        Self {
            microphone: true,
            recognition: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            microphone: false,
            recognition: false,
        }
    }
}

impl PermissionGate for StaticPermissions {
    fn has_microphone_access(&self) -> bool {
        self.microphone
    }

    fn has_recognition_access(&self) -> bool {
        self.recognition
    }
}

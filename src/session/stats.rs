use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a session's state and lifetime counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether a run is currently listening
    pub is_listening: bool,

    /// When the current run started (None while idle)
    pub listening_since: Option<DateTime<Utc>>,

    /// Runs started over the session's lifetime
    pub runs_started: usize,

    /// Transcript fragments emitted (partial and final)
    pub fragments_emitted: usize,

    /// Failure notices emitted
    pub failures_emitted: usize,
}

//! Session event delivery
//!
//! The session pushes transcript fragments and failure notices to
//! subscribers through an `EventBus`. Delivery is fire-and-forget: every
//! subscriber gets its own unbounded channel, emission never blocks the
//! session, and channels whose receiver has been dropped are pruned on the
//! next emit.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// One incremental or final transcription result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Transcribed text
    pub text: String,

    /// Whether this is the final hypothesis for the run
    pub is_final: bool,
}

/// Human-readable failure classification delivered to listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotice {
    pub message: String,
}

/// Event fanned out to session subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Transcript(TranscriptFragment),
    Failure(FailureNotice),
}

/// Token returned by `EventBus::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out point for session events
pub struct EventBus {
    sinks: Mutex<SinkTable>,
}

#[derive(Default)]
struct SinkTable {
    next_id: u64,
    entries: Vec<(SubscriptionId, mpsc::UnboundedSender<SessionEvent>)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            sinks: Mutex::new(SinkTable::default()),
        }
    }

    /// Register a new subscriber and return its id plus the receiving end
    /// of its event channel.
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sinks = self.lock_sinks();
        let id = SubscriptionId(sinks.next_id);
        sinks.next_id += 1;
        sinks.entries.push((id, tx));
        (id, rx)
    }

    /// Remove a subscriber. After this returns, no further events are
    /// delivered to its channel.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut sinks = self.lock_sinks();
        sinks.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    /// Number of registered subscribers (including ones whose receiver has
    /// been dropped but not yet pruned).
    pub fn subscriber_count(&self) -> usize {
        self.lock_sinks().entries.len()
    }

    /// Deliver an event to every subscriber. Never blocks; subscribers
    /// whose receiver is gone are dropped from the table.
    pub fn emit(&self, event: SessionEvent) {
        let mut sinks = self.lock_sinks();
        sinks
            .entries
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    fn lock_sinks(&self) -> std::sync::MutexGuard<'_, SinkTable> {
        self.sinks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

use crate::events::{FailureNotice, SessionEvent, TranscriptFragment};
use crate::session::TranscriptionSession;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The session exposed by this process
    pub session: Arc<TranscriptionSession>,

    /// Fragments observed since startup (the session itself retains none)
    pub transcript: Arc<RwLock<Vec<TranscriptFragment>>>,

    /// Most recent failure notice, if any
    pub last_failure: Arc<RwLock<Option<FailureNotice>>>,
}

impl AppState {
    /// Wrap a session and start collecting its events for the query
    /// endpoints.
    pub fn new(session: Arc<TranscriptionSession>) -> Self {
        let state = Self {
            session,
            transcript: Arc::new(RwLock::new(Vec::new())),
            last_failure: Arc::new(RwLock::new(None)),
        };
        state.spawn_collector();
        state
    }

    fn spawn_collector(&self) {
        let (_id, mut events) = self.session.subscribe();
        let transcript = Arc::clone(&self.transcript);
        let last_failure = Arc::clone(&self.last_failure);

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SessionEvent::Transcript(fragment) => {
                        debug!("Collected fragment (final={})", fragment.is_final);
                        transcript.write().await.push(fragment);
                    }
                    SessionEvent::Failure(notice) => {
                        *last_failure.write().await = Some(notice);
                    }
                }
            }
        });
    }
}

use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::{AudioCaptureDevice, AudioFrame, CaptureHandle, CaptureSubscription};
use crate::engine::{EngineEvent, EngineFault, EngineHandle, RecognitionEngine, RecognizerInstance};
use crate::error::StartError;
use crate::events::{EventBus, FailureNotice, SessionEvent, SubscriptionId, TranscriptFragment};
use crate::permissions::PermissionGate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No run active
    Idle,
    /// A run is streaming audio into the recognizer
    Listening,
    /// Teardown in flight; collapses back to Idle before `stop()` returns
    Stopping,
}

/// A real-time transcription session.
///
/// Owns at most one live recognizer/capture pair at a time and fans
/// incremental and final results out through the event bus. Restarting
/// while listening supersedes the previous run rather than queuing a
/// second one; callbacks from a superseded run are discarded.
pub struct TranscriptionSession {
    /// Session configuration
    config: SessionConfig,

    /// Permission checks consulted before each start
    permissions: Arc<dyn PermissionGate>,

    /// Frame source
    capture: Arc<dyn AudioCaptureDevice>,

    /// Hypothesis producer
    engine: Arc<dyn RecognitionEngine>,

    /// Fan-out point for fragments and failure notices
    events: Arc<EventBus>,

    /// State shared with pump tasks
    shared: Arc<Shared>,
}

/// Mutable session state plus counters, shared with pump tasks.
///
/// All transitions go through the `runs` mutex; it is held only for
/// non-awaiting critical sections, never across an engine or capture call.
struct Shared {
    runs: Mutex<RunSlot>,
    listening: AtomicBool,
    runs_started: AtomicUsize,
    fragments_emitted: AtomicUsize,
    failures_emitted: AtomicUsize,
}

struct RunSlot {
    state: SessionState,
    /// Monotonic run counter; a pump whose generation no longer matches
    /// the active run has been superseded and must go quiet.
    generation: u64,
    active: Option<ActiveRun>,
}

struct ActiveRun {
    generation: u64,
    started_at: DateTime<Utc>,
    engine_handle: Arc<dyn EngineHandle>,
    capture_handle: Box<dyn CaptureHandle>,
    pump: JoinHandle<()>,
}

impl TranscriptionSession {
    /// Create a new session around the given collaborators. No handles are
    /// acquired until `start()`.
    pub fn new(
        config: SessionConfig,
        permissions: Arc<dyn PermissionGate>,
        capture: Arc<dyn AudioCaptureDevice>,
        engine: Arc<dyn RecognitionEngine>,
    ) -> Self {
        Self {
            config,
            permissions,
            capture,
            engine,
            events: Arc::new(EventBus::new()),
            shared: Arc::new(Shared {
                runs: Mutex::new(RunSlot {
                    state: SessionState::Idle,
                    generation: 0,
                    active: None,
                }),
                listening: AtomicBool::new(false),
                runs_started: AtomicUsize::new(0),
                fragments_emitted: AtomicUsize::new(0),
                failures_emitted: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register an event subscriber
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<SessionEvent>) {
        self.events.subscribe()
    }

    /// Remove an event subscriber
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id)
    }

    /// Whether the session is currently `Listening`
    pub fn is_listening(&self) -> bool {
        self.shared.listening.load(Ordering::SeqCst)
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.shared.lock_runs().state
    }

    /// Snapshot of state and lifetime counters
    pub fn stats(&self) -> SessionStats {
        let (is_listening, listening_since) = {
            let slot = self.shared.lock_runs();
            (
                slot.state == SessionState::Listening,
                slot.active.as_ref().map(|run| run.started_at),
            )
        };

        SessionStats {
            is_listening,
            listening_since,
            runs_started: self.shared.runs_started.load(Ordering::SeqCst),
            fragments_emitted: self.shared.fragments_emitted.load(Ordering::SeqCst),
            failures_emitted: self.shared.failures_emitted.load(Ordering::SeqCst),
        }
    }

    /// Begin a streaming run.
    ///
    /// If a run is already listening it is torn down first; there is never
    /// a second concurrent recognizer. Resolves once capture and recognizer
    /// have been acquired; results arrive through the event bus, not here.
    ///
    /// Failures are dual-channel: the returned `StartError` is also emitted
    /// as a `FailureNotice` for passive subscribers, and the session is
    /// left `Idle` with no handles held.
    pub async fn start(&self) -> Result<(), StartError> {
        if let Some(previous) = self.shared.clear_active() {
            info!(
                "Superseding run {} of session {}",
                previous.generation, self.config.session_id
            );
            release_superseded(previous);
        }

        if !self.engine.is_available() {
            return Err(self.refuse(StartError::CapabilityUnavailable));
        }
        if !self.engine.supports_locale(&self.config.locale) {
            return Err(self.refuse(StartError::EngineUnavailable(format!(
                "locale {} is not supported",
                self.config.locale
            ))));
        }
        if !self.permissions.has_microphone_and_recognition_access() {
            return Err(self.refuse(StartError::PermissionDenied));
        }

        let mut subscription = match self.capture.subscribe(&self.config.capture_config()).await {
            Ok(subscription) => subscription,
            Err(e) => return Err(self.refuse(StartError::CaptureUnavailable(e.to_string()))),
        };

        let recognizer = match self.engine.create(&self.config.recognizer_config()).await {
            Ok(recognizer) => recognizer,
            Err(e) => {
                subscription.handle.release();
                return Err(self.refuse(StartError::EngineUnavailable(e.to_string())));
            }
        };

        self.commit_run(subscription, recognizer);

        info!(
            "Session {} listening ({} -> {})",
            self.config.session_id,
            self.capture.name(),
            self.engine.name()
        );

        Ok(())
    }

    /// End the streaming run. Idempotent; never fails.
    ///
    /// Signals end-of-audio, cancels the in-flight recognition, and
    /// releases both handles. Teardown problems are logged and swallowed —
    /// the caller cannot recover from a failed stop. Safe to call from
    /// inside an event subscriber: the run slot lock is only held to
    /// detach the run, never across an engine or capture call.
    pub fn stop(&self) {
        let detached = {
            let mut slot = self.shared.lock_runs();
            let run = slot.active.take();
            if run.is_some() {
                slot.state = SessionState::Stopping;
                self.shared.listening.store(false, Ordering::SeqCst);
            }
            run
        };

        let Some(mut run) = detached else {
            debug!("stop() while idle; nothing to do");
            return;
        };

        info!(
            "Stopping session {} (run {})",
            self.config.session_id, run.generation
        );

        run.capture_handle.release();
        run.engine_handle.finish();
        run.engine_handle.cancel();
        run.pump.abort();

        // A start() racing this teardown may already have committed a new
        // run; only collapse to Idle if the slot is still empty.
        let mut slot = self.shared.lock_runs();
        if slot.active.is_none() {
            slot.state = SessionState::Idle;
        }
    }

    fn refuse(&self, error: StartError) -> StartError {
        warn!(
            "Refusing to start session {}: {}",
            self.config.session_id, error
        );
        self.shared.failures_emitted.fetch_add(1, Ordering::SeqCst);
        self.events.emit(SessionEvent::Failure(error.notice()));
        error
    }

    fn commit_run(&self, subscription: CaptureSubscription, recognizer: RecognizerInstance) {
        let CaptureSubscription {
            handle: capture_handle,
            frames,
        } = subscription;
        let RecognizerInstance {
            handle: engine_handle,
            events: engine_events,
        } = recognizer;

        let superseded = {
            let mut slot = self.shared.lock_runs();
            slot.generation += 1;
            let generation = slot.generation;

            let pump = tokio::spawn(pump_run(
                generation,
                Arc::clone(&engine_handle),
                frames,
                engine_events,
                Arc::clone(&self.shared),
                Arc::clone(&self.events),
            ));

            let superseded = slot.active.replace(ActiveRun {
                generation,
                started_at: Utc::now(),
                engine_handle,
                capture_handle,
                pump,
            });
            slot.state = SessionState::Listening;
            self.shared.listening.store(true, Ordering::SeqCst);
            self.shared.runs_started.fetch_add(1, Ordering::SeqCst);
            superseded
        };

        // A racing start() can commit while this call was still acquiring
        // handles; the newest commit wins.
        if let Some(run) = superseded {
            warn!("Discarding run {} superseded during start", run.generation);
            release_superseded(run);
        }
    }
}

impl Drop for TranscriptionSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn lock_runs(&self) -> MutexGuard<'_, RunSlot> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        let slot = self.lock_runs();
        slot.active
            .as_ref()
            .map(|run| run.generation == generation)
            .unwrap_or(false)
    }

    /// Detach the run for `generation` if it is still the current one,
    /// moving the session back to Idle. Returns None when the run was
    /// already stopped or superseded — its events must then be discarded.
    fn claim(&self, generation: u64) -> Option<ActiveRun> {
        let mut slot = self.lock_runs();
        let current = slot
            .active
            .as_ref()
            .map(|run| run.generation == generation)
            .unwrap_or(false);
        if !current {
            return None;
        }

        let run = slot.active.take();
        slot.state = SessionState::Idle;
        self.listening.store(false, Ordering::SeqCst);
        run
    }

    /// Detach whatever run is active, regardless of generation
    fn clear_active(&self) -> Option<ActiveRun> {
        let mut slot = self.lock_runs();
        let run = slot.active.take();
        if run.is_some() {
            slot.state = SessionState::Idle;
            self.listening.store(false, Ordering::SeqCst);
        }
        run
    }
}

/// Per-run pump: the single serialized context that forwards capture
/// frames into the recognizer and recognizer events out to subscribers.
/// Everything is gated on the run still being current, so callbacks from a
/// superseded or stopped run never surface.
async fn pump_run(
    generation: u64,
    engine_handle: Arc<dyn EngineHandle>,
    mut frames: mpsc::Receiver<AudioFrame>,
    mut engine_events: mpsc::Receiver<EngineEvent>,
    shared: Arc<Shared>,
    events: Arc<EventBus>,
) {
    debug!("Run {} pump started", generation);
    let mut frames_open = true;

    loop {
        tokio::select! {
            maybe_frame = frames.recv(), if frames_open => {
                match maybe_frame {
                    Some(frame) => {
                        // Frames racing a teardown are dropped, never fed
                        // to a torn-down recognizer.
                        if shared.is_current(generation) {
                            engine_handle.feed(&frame);
                        }
                    }
                    None => {
                        frames_open = false;
                        if shared.is_current(generation) {
                            debug!(
                                "Run {} capture stream ended; requesting final hypothesis",
                                generation
                            );
                            engine_handle.finish();
                        }
                    }
                }
            }
            maybe_event = engine_events.recv() => {
                match maybe_event {
                    Some(EngineEvent::Partial(text)) => {
                        if shared.is_current(generation) {
                            shared.fragments_emitted.fetch_add(1, Ordering::SeqCst);
                            events.emit(SessionEvent::Transcript(TranscriptFragment {
                                text,
                                is_final: false,
                            }));
                        }
                    }
                    Some(EngineEvent::Final(text)) => {
                        if let Some(run) = shared.claim(generation) {
                            debug!("Run {} final hypothesis received", generation);
                            shared.fragments_emitted.fetch_add(1, Ordering::SeqCst);
                            events.emit(SessionEvent::Transcript(TranscriptFragment {
                                text,
                                is_final: true,
                            }));
                            release_finished(run);
                        }
                        break;
                    }
                    Some(EngineEvent::Error(fault)) => {
                        if let Some(run) = shared.claim(generation) {
                            warn!("Run {} recognizer error: {}", generation, fault);
                            shared.failures_emitted.fetch_add(1, Ordering::SeqCst);
                            events.emit(SessionEvent::Failure(FailureNotice {
                                message: fault.message().to_string(),
                            }));
                            release_cancelled(run);
                        }
                        break;
                    }
                    None => {
                        // Recognizer went away without a terminal event.
                        if let Some(run) = shared.claim(generation) {
                            warn!(
                                "Run {} recognizer closed its event stream unexpectedly",
                                generation
                            );
                            shared.failures_emitted.fetch_add(1, Ordering::SeqCst);
                            events.emit(SessionEvent::Failure(FailureNotice {
                                message: EngineFault::Unknown.message().to_string(),
                            }));
                            release_cancelled(run);
                        }
                        break;
                    }
                }
            }
        }
    }

    debug!("Run {} pump stopped", generation);
}

/// Teardown after the recognizer delivered its final hypothesis: only the
/// capture subscription remains to release.
fn release_finished(mut run: ActiveRun) {
    run.capture_handle.release();
}

/// Teardown after a recognizer error: stop capture and make sure the
/// recognizer is cancelled.
fn release_cancelled(mut run: ActiveRun) {
    run.capture_handle.release();
    run.engine_handle.cancel();
}

/// Teardown of a run replaced by a newer start(). No final hypothesis is
/// wanted; late callbacks are suppressed by the generation check.
fn release_superseded(mut run: ActiveRun) {
    run.capture_handle.release();
    run.engine_handle.cancel();
    run.pump.abort();
}

//! Scripted recognizer for demos and tests.
//!
//! Plays a timed sequence of partial/final/error events instead of doing
//! any recognition. `finish` jumps straight to the terminal event and
//! `cancel` goes quiet, matching how a real recognizer reacts to
//! end-of-audio and teardown.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::{EngineEvent, EngineFault, EngineHandle, RecognitionEngine, RecognizerConfig, RecognizerInstance};
use crate::audio::AudioFrame;

/// One step of a recognizer script
#[derive(Debug, Clone)]
pub struct ScriptStep {
    /// Delay before the event fires
    pub delay: Duration,
    /// The event to deliver
    pub event: EngineEvent,
}

/// Mock engine that replays a fixed script for every created instance
pub struct ScriptedRecognizer {
    script: Vec<ScriptStep>,
    locales: Vec<String>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            locales: vec!["en-US".to_string()],
        }
    }

    pub fn with_locales(mut self, locales: Vec<String>) -> Self {
        self.locales = locales;
        self
    }

    /// Script that dictates `text` word by word: cumulative partials, then
    /// the full text as the final hypothesis.
    pub fn dictation(text: &str, step: Duration) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut script = Vec::with_capacity(words.len());
        let mut spoken = String::new();

        for (i, word) in words.iter().enumerate() {
            if !spoken.is_empty() {
                spoken.push(' ');
            }
            spoken.push_str(word);

            let event = if i + 1 == words.len() {
                EngineEvent::Final(spoken.clone())
            } else {
                EngineEvent::Partial(spoken.clone())
            };
            script.push(ScriptStep { delay: step, event });
        }

        Self::new(script)
    }

    /// Script that fails with `fault` after `delay`
    pub fn failing(fault: EngineFault, delay: Duration) -> Self {
        Self::new(vec![ScriptStep {
            delay,
            event: EngineEvent::Error(fault),
        }])
    }
}

struct ScriptedHandle {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    frames_fed: Arc<AtomicUsize>,
}

impl EngineHandle for ScriptedHandle {
    fn feed(&self, _frame: &AudioFrame) {
        self.frames_fed.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn supports_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l.eq_ignore_ascii_case(locale))
    }

    async fn create(&self, config: &RecognizerConfig) -> Result<RecognizerInstance> {
        let (tx, rx) = mpsc::channel(32);

        let cancelled = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let frames_fed = Arc::new(AtomicUsize::new(0));

        let script = self.script.clone();
        let report_partials = config.report_partials;
        let task_cancelled = Arc::clone(&cancelled);
        let task_finished = Arc::clone(&finished);

        tokio::spawn(async move {
            for step in script {
                // End-of-audio skips the remaining delays and partials and
                // goes straight to the terminal event.
                if !task_finished.load(Ordering::SeqCst) {
                    tokio::time::sleep(step.delay).await;
                }
                if task_cancelled.load(Ordering::SeqCst) {
                    break;
                }

                let terminal = !matches!(step.event, EngineEvent::Partial(_));
                let skip = match step.event {
                    EngineEvent::Partial(_) => {
                        !report_partials || task_finished.load(Ordering::SeqCst)
                    }
                    _ => false,
                };

                if !skip && tx.send(step.event).await.is_err() {
                    break;
                }
                if terminal {
                    break;
                }
            }

            debug!("Scripted recognizer run ended");
        });

        Ok(RecognizerInstance {
            handle: Arc::new(ScriptedHandle {
                cancelled,
                finished,
                frames_fed,
            }),
            events: rx,
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

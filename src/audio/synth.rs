//! Synthetic capture device emitting silent frames on the configured
//! cadence. Stands in for a microphone where none is available (the demo
//! binary, timing tests).

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::capture::{
    AudioCaptureDevice, AudioFrame, CaptureConfig, CaptureHandle, CaptureSubscription,
};

pub struct SilenceCapture;

impl SilenceCapture {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilenceCapture {
    fn default() -> Self {
        Self::new()
    }
}

struct SynthHandle {
    stop: Arc<AtomicBool>,
}

impl CaptureHandle for SynthHandle {
    fn release(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AudioCaptureDevice for SilenceCapture {
    async fn subscribe(&self, config: &CaptureConfig) -> Result<CaptureSubscription> {
        let (tx, rx) = mpsc::channel(32);
        let stop = Arc::new(AtomicBool::new(false));

        let cfg = config.clone();
        let stopped = Arc::clone(&stop);
        tokio::spawn(async move {
            let samples_per_frame = (cfg.sample_rate as u64 * cfg.buffer_duration_ms / 1000)
                as usize
                * cfg.channels as usize;
            let mut timestamp_ms = 0;
            let mut ticker =
                tokio::time::interval(Duration::from_millis(cfg.buffer_duration_ms));

            loop {
                ticker.tick().await;
                if stopped.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: vec![0; samples_per_frame],
                    sample_rate: cfg.sample_rate,
                    channels: cfg.channels,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                timestamp_ms += cfg.buffer_duration_ms;
            }

            debug!("Silence capture stream closed");
        });

        Ok(CaptureSubscription {
            handle: Box::new(SynthHandle { stop }),
            frames: rx,
        })
    }

    fn name(&self) -> &str {
        "silence"
    }
}

//! WAV-backed capture device: replays a recorded file as a paced live
//! stream, for driving a session without a microphone.

use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::capture::{
    AudioCaptureDevice, AudioFrame, CaptureConfig, CaptureHandle, CaptureSubscription,
};

/// A decoded WAV file
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path).context("Failed to open WAV file")?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

/// Capture device that streams a WAV file's samples in frame-sized slices
/// at the configured cadence. The stream closes after the last frame, which
/// signals end-of-audio to the session.
pub struct WavCapture {
    file: AudioFile,
}

impl WavCapture {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file: AudioFile::open(path)?,
        })
    }

    pub fn duration_seconds(&self) -> f64 {
        self.file.duration_seconds
    }
}

struct WavHandle {
    stop: Arc<AtomicBool>,
}

impl CaptureHandle for WavHandle {
    fn release(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl AudioCaptureDevice for WavCapture {
    async fn subscribe(&self, config: &CaptureConfig) -> Result<CaptureSubscription> {
        // Frames keep the file's native format; recognizers consume
        // whatever rate the capture source delivers.
        if self.file.sample_rate != config.sample_rate {
            warn!(
                "WAV replay delivers {}Hz, subscription requested {}Hz",
                self.file.sample_rate, config.sample_rate
            );
        }

        let (tx, rx) = mpsc::channel(32);
        let stop = Arc::new(AtomicBool::new(false));

        let sample_rate = self.file.sample_rate;
        let channels = self.file.channels;
        let samples = self.file.samples.clone();
        let buffer_duration_ms = config.buffer_duration_ms;
        let stopped = Arc::clone(&stop);

        tokio::spawn(async move {
            let samples_per_frame =
                (sample_rate as u64 * buffer_duration_ms / 1000) as usize * channels as usize;
            let mut timestamp_ms = 0;
            let mut ticker = tokio::time::interval(Duration::from_millis(buffer_duration_ms));

            for chunk in samples.chunks(samples_per_frame.max(1)) {
                ticker.tick().await;
                if stopped.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
                timestamp_ms += buffer_duration_ms;
            }

            debug!("WAV replay stream closed");
        });

        Ok(CaptureSubscription {
            handle: Box::new(WavHandle { stop }),
            frames: rx,
        })
    }

    fn name(&self) -> &str {
        "wav-replay"
    }
}

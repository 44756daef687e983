use anyhow::Result;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since the subscription started
    pub timestamp_ms: u64,
}

/// Configuration for an audio capture subscription
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Requested sample rate in Hz
    pub sample_rate: u32,
    /// Requested channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in milliseconds (frame cadence, affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz, the common recognizer input rate
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

/// Release token for one active capture subscription.
///
/// Exclusively owned by the session. Releasing stops frame delivery and
/// closes the frame channel; it must be safe to call more than once.
pub trait CaptureHandle: Send {
    fn release(&mut self);
}

/// A live capture subscription: the release token plus the frame stream
pub struct CaptureSubscription {
    pub handle: Box<dyn CaptureHandle>,
    pub frames: mpsc::Receiver<AudioFrame>,
}

/// Audio capture device trait
///
/// Implementations adapt a frame source (OS microphone tap, synthetic
/// generator, recorded file) onto a channel of `AudioFrame`s. Each
/// `subscribe` call opens an independent stream with its own release token.
#[async_trait::async_trait]
pub trait AudioCaptureDevice: Send + Sync {
    /// Open a frame stream for one session run
    async fn subscribe(&self, config: &CaptureConfig) -> Result<CaptureSubscription>;

    /// Device name for logging
    fn name(&self) -> &str;
}

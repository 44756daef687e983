pub mod capture;
pub mod file;
pub mod synth;

pub use capture::{
    AudioCaptureDevice, AudioFrame, CaptureConfig, CaptureHandle, CaptureSubscription,
};
pub use file::{AudioFile, WavCapture};
pub use synth::SilenceCapture;

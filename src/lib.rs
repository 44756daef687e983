pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod http;
pub mod permissions;
pub mod session;

pub use audio::{
    AudioCaptureDevice, AudioFile, AudioFrame, CaptureConfig, CaptureHandle, CaptureSubscription,
    SilenceCapture, WavCapture,
};
pub use config::Config;
pub use engine::{
    EngineEvent, EngineFault, EngineHandle, RecognitionEngine, RecognizerConfig,
    RecognizerInstance, ScriptStep, ScriptedRecognizer,
};
pub use error::StartError;
pub use events::{EventBus, FailureNotice, SessionEvent, SubscriptionId, TranscriptFragment};
pub use http::{create_router, AppState};
pub use permissions::{PermissionGate, StaticPermissions};
pub use session::{SessionConfig, SessionState, SessionStats, TranscriptionSession};

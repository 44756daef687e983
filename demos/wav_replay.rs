// WAV replay demo: feed a recorded file through the session as if it were
// a live microphone.
//
// The capture stream closes when the file runs out, which signals
// end-of-audio to the recognizer and produces the final hypothesis.
//
// Usage: cargo run --example wav_replay -- path/to/audio.wav

use anyhow::{bail, Result};
use live_transcriber::{
    ScriptedRecognizer, SessionConfig, SessionEvent, StaticPermissions, TranscriptionSession,
    WavCapture,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("Usage: cargo run --example wav_replay -- path/to/audio.wav");
    };

    let capture = WavCapture::open(&path)?;
    info!("Replaying {} ({:.1}s)", path, capture.duration_seconds());

    let session = Arc::new(TranscriptionSession::new(
        SessionConfig::default(),
        Arc::new(StaticPermissions::granted()),
        Arc::new(capture),
        Arc::new(ScriptedRecognizer::dictation(
            "transcription of the replayed recording",
            Duration::from_millis(500),
        )),
    ));

    let (subscription, mut events) = session.subscribe();
    session.start().await?;

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Transcript(fragment) => {
                println!("{}{}", if fragment.is_final { "* " } else { "  " }, fragment.text);
                if fragment.is_final {
                    break;
                }
            }
            SessionEvent::Failure(notice) => {
                eprintln!("failure: {}", notice.message);
                break;
            }
        }
    }

    session.unsubscribe(subscription);
    info!("Done; session state: {:?}", session.state());

    Ok(())
}

// Live session demo: scripted recognizer + synthetic capture
//
// Demonstrates the full session lifecycle:
// 1. Build a session from mock collaborators (no OS recognizer needed)
// 2. Subscribe to the event stream
// 3. start() and watch partial hypotheses accumulate
// 4. The final hypothesis returns the session to idle on its own
//
// Usage: cargo run --example live_session

use anyhow::Result;
use live_transcriber::{
    ScriptedRecognizer, SessionConfig, SessionEvent, SilenceCapture, StaticPermissions,
    TranscriptionSession,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let session = Arc::new(TranscriptionSession::new(
        SessionConfig::default(),
        Arc::new(StaticPermissions::granted()),
        Arc::new(SilenceCapture::new()),
        Arc::new(ScriptedRecognizer::dictation(
            "hello world this is a live transcription demo",
            Duration::from_millis(300),
        )),
    ));

    let (subscription, mut events) = session.subscribe();

    session.start().await?;
    info!("Session listening: {}", session.is_listening());

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Transcript(fragment) if fragment.is_final => {
                println!("\n{}", fragment.text);
                break;
            }
            SessionEvent::Transcript(fragment) => {
                print!("\r{}", fragment.text);
                std::io::stdout().flush().ok();
            }
            SessionEvent::Failure(notice) => {
                eprintln!("failure: {}", notice.message);
                break;
            }
        }
    }

    session.unsubscribe(subscription);
    info!("Session state: {:?}", session.state());

    Ok(())
}

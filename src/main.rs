use anyhow::{Context, Result};
use clap::Parser;
use live_transcriber::{
    create_router, AppState, AudioCaptureDevice, Config, ScriptedRecognizer, SilenceCapture,
    StaticPermissions, TranscriptionSession, WavCapture,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Bridge a real-time speech transcription session to an HTTP control API
#[derive(Debug, Parser)]
#[command(name = "live-transcriber", version)]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/live-transcriber")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Replay a WAV file as the capture source instead of synthetic silence
    #[arg(long)]
    input: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);

    let capture: Arc<dyn AudioCaptureDevice> = match &args.input {
        Some(path) => {
            let wav = WavCapture::open(path)?;
            info!("Capture source: {} ({:.1}s)", path, wav.duration_seconds());
            Arc::new(wav)
        }
        None => {
            info!("Capture source: synthetic silence");
            Arc::new(SilenceCapture::new())
        }
    };

    // Stand-in recognizer until a platform engine is wired in.
    let engine = Arc::new(ScriptedRecognizer::dictation(
        "the quick brown fox jumps over the lazy dog",
        Duration::from_millis(400),
    ));

    let session = Arc::new(TranscriptionSession::new(
        cfg.session_config(),
        Arc::new(StaticPermissions::granted()),
        capture,
        engine,
    ));

    let state = AppState::new(session);
    let router = create_router(state);

    let bind = args.bind.unwrap_or_else(|| cfg.service.http.bind.clone());
    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", bind, port);

    info!("HTTP control API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

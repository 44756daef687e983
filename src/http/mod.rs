//! HTTP control API for the embedding runtime
//!
//! This module provides a REST surface for driving the transcription
//! session from a higher-level application:
//! - POST /session/start - Begin a streaming run
//! - POST /session/stop - End the run
//! - GET /session/status - Query session state and counters
//! - GET /session/transcript - Fragments collected since startup
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

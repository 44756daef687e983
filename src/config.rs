use anyhow::Result;
use serde::Deserialize;

use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub locale: String,
    pub report_partials: bool,
    pub max_alternatives: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session configuration derived from the file settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            locale: self.session.locale.clone(),
            report_partials: self.session.report_partials,
            max_alternatives: self.session.max_alternatives,
            sample_rate: self.audio.sample_rate,
            channels: self.audio.channels,
            buffer_duration_ms: self.audio.buffer_duration_ms,
            ..SessionConfig::default()
        }
    }
}

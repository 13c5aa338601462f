use crate::config::ConfigError;
use crate::corp::CorpError;
use crate::state::StateError;
use crate::telemetry::TelemetryError;
use thiserror::Error;

/// Errors that abort a checker run. Sink failures are deliberately not
/// represented here: each sink logs and swallows its own errors.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("DART_API_KEY is still the placeholder value; set a real OpenDART API key")]
    MissingApiKey,

    #[error("corp code registry error: {0}")]
    Corp(#[from] CorpError),

    #[error("seen-state error: {0}")]
    State(#[from] StateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

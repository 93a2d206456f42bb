use thiserror::Error;

use super::{BridgeError, ConfigError, ScriptError, TimelineError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("Format error: {source}")]
    Format {
        #[from]
        source: std::fmt::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn bridge<E>(error: E) -> Self
    where
        E: Into<BridgeError>,
    {
        error.into().into()
    }

    pub fn script<E>(error: E) -> Self
    where
        E: Into<ScriptError>,
    {
        error.into().into()
    }

    pub fn timeline<E>(error: E) -> Self
    where
        E: Into<TimelineError>,
    {
        error.into().into()
    }
}

// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FfrunError {
    #[error("Failed to launch child process: {message}")]
    Launch { message: String },

    #[error("A supervised run is already in progress")]
    AlreadyRunning,

    #[error("Run failed (exit code {exit_code}): {last_error}")]
    RunFailed { exit_code: i32, last_error: String },

    #[error("Encoder tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FfrunError>;

//! Error types for the outer surfaces
//!
//! The simulation itself is infallible; only configuration loading and the
//! loop thread can fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to start the game loop
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("game loop collaborators are unavailable (previous loop thread panicked)")]
    FrontendLost,
}

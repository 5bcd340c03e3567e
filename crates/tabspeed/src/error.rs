//! Error handling for the tabspeed binary.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for tabspeed commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Configuration parsing or validation errors.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),
    /// Errors surfaced by the engine.
    #[error("Engine error: {0}")]
    Engine(#[from] tabspeed_engine::Error),
    /// Output serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The step script could not be parsed.
    #[error("Invalid script {}: {message}", path.display())]
    Script {
        /// Script path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The event loop went away before the script finished.
    #[error("event loop stopped")]
    LoopStopped,
}

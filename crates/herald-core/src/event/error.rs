//! # Herald Event System Errors
//!
//! Registry operations never fail and listener failures are returned to the
//! caller untouched as [`ListenerError`](crate::event::ListenerError), so the
//! only fallible surface left is loading and saving [`DispatcherConfig`].
//!
//! [`DispatcherConfig`]: crate::event::DispatcherConfig
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventSystemError {
    #[error("Failed to read dispatcher config '{}': {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported dispatcher config format for path: {}", .path.display())]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("Failed to parse dispatcher config as {format}: {message}")]
    ConfigParse { format: String, message: String },

    #[error("Failed to serialize dispatcher config to {format}: {message}")]
    ConfigSerialize { format: String, message: String },
}

/// Shorthand for Result with the event system error type
pub type Result<T> = std::result::Result<T, EventSystemError>;

//! Error types for arkiv-vp
//!
//! Module-specific error types using thiserror for clear error
//! propagation. Playback errors reported by the client player are not
//! errors in this sense: they are `MediaEvent`s consumed by the session
//! state machine and never propagate out of the engine.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the arkiv-vp module
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference matched neither the canonical identifier shape nor a
    /// known CDN hostname
    #[error("Invalid video reference: {0}")]
    InvalidReference(String),

    /// Reference points at the object-storage CDN, which never serves
    /// video playback
    #[error("Storage CDN URL rejected for playback: {0}")]
    StorageUrlRejected(String),

    /// No candidate playable and no iframe embed derivable
    #[error("No playable source for reference: {0}")]
    NoFallbackAvailable(String),

    /// Playback session not found
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Operation not valid in the session's current phase
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Stream client attach/release errors
    #[error("Stream client error: {0}")]
    StreamClient(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from shared arkiv-common types
    #[error(transparent)]
    Common(#[from] arkiv_common::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using arkiv-vp Error
pub type Result<T> = std::result::Result<T, Error>;

//! Error types
//!
//! Only `SetupError` is fatal. Everything else is either propagated to a caller
//! that can recover, or mapped to a fallback (facts) before it reaches the loop.

/// Startup preconditions the game cannot run without
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    /// No browser window/document available
    #[error("no browser window")]
    NoWindow,

    /// Canvas element missing or of the wrong type
    #[error("canvas element `{0}` not found")]
    NoCanvas(String),

    /// Surface creation failed
    #[error("failed to create render surface: {0}")]
    Surface(String),

    /// No suitable GPU adapter
    #[error("no GPU adapter: {0}")]
    Adapter(String),

    /// Device request failed
    #[error("failed to create GPU device: {0}")]
    Device(String),

    /// Persistent storage is not available
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Key/value storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Backend cannot be opened (e.g. LocalStorage disabled)
    #[error("storage backend unavailable")]
    Unavailable,

    /// Reading a key failed
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },

    /// Writing a key failed
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

/// Configuration (tuning/settings) errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fact generation failures
///
/// Never surfaced to the player: each variant has a fixed fallback line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FactError {
    /// No API key configured
    #[error("fact service not configured")]
    Unconfigured,

    /// The request could not be sent or the body could not be read
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("fact service returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("malformed response: {0}")]
    Parse(String),

    /// Response contained no text
    #[error("empty response")]
    Empty,
}

impl FactError {
    /// Line shown in place of a generated fact
    pub fn fallback_text(&self) -> &'static str {
        match self {
            FactError::Unconfigured => {
                "Ask your parents to set the API Key to learn cool dino facts!"
            }
            FactError::Empty => "Dinosaurs are awesome!",
            FactError::Status(_) | FactError::Parse(_) => "Dinosaurs roared really loud! ROAR!",
            FactError::Transport(_) => "Did you know? Dinosaurs hatched from eggs!",
        }
    }
}

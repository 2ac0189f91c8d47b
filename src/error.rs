use thiserror::Error;

/// Main error type for WebVTT parsing
///
/// Malformed cue timings, tags and character references inside the body
/// never surface here; the parser falls back to a literal interpretation
/// and keeps going. Only the signature check is fatal to a parse.
#[derive(Error, Debug)]
pub enum VttError {
    /// The input does not start with the `WEBVTT` signature
    #[error("Invalid signature: input does not start with WEBVTT")]
    InvalidSignature,

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Character reference table data could not be loaded
    #[error("Entity table error: {0}")]
    EntityTable(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VttError>;

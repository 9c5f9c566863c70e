//! Error types for Reelsmith.

use thiserror::Error;

/// Library-level error type for Reelsmith operations.
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Footage search failed (HTTP {status}): {message}")]
    FootageDiscovery { status: u16, message: String },

    #[error("No footage of at least 1080p found for vibe '{vibe}'")]
    NoFootageFound { vibe: String },

    #[error("Footage download failed: {0}")]
    Download(String),

    #[error("Video composition failed: {0}")]
    Composition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ReelError {
    /// Stable label for the failure class, used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ReelError::InvalidRequest(_) => "invalid_request",
            ReelError::Synthesis(_) => "synthesis",
            ReelError::FootageDiscovery { .. } => "footage_discovery",
            ReelError::NoFootageFound { .. } => "no_footage_found",
            ReelError::Download(_) => "download",
            ReelError::Composition(_) | ReelError::ToolNotFound(_) => "composition",
            ReelError::Config(_) | ReelError::TomlParse(_) => "config",
            ReelError::Timeout { .. } => "timeout",
            ReelError::Io(_) | ReelError::Json(_) | ReelError::Http(_) => "internal",
        }
    }

    /// HTTP status an inbound adapter should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ReelError::InvalidRequest(_) => 400,
            _ => 500,
        }
    }
}

/// Result type alias for Reelsmith operations.
pub type Result<T> = std::result::Result<T, ReelError>;

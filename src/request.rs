//! Generation requests and caption extraction.

use crate::error::{ReelError, Result};
use serde::{Deserialize, Serialize};

/// A validated request to generate one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Narration text, also the source of the caption.
    pub script: String,
    /// Mood keyword used as the footage search term.
    pub vibe: String,
}

/// Request fields as they arrive from a transport, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequest {
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub vibe: Option<String>,
}

impl GenerationRequest {
    /// Build a request, rejecting blank fields.
    pub fn new(script: impl Into<String>, vibe: impl Into<String>) -> Result<Self> {
        let request = Self {
            script: script.into(),
            vibe: vibe.into().trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Check that both fields carry text.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.script.trim().is_empty() {
            missing.push("script");
        }
        if self.vibe.trim().is_empty() {
            missing.push("vibe");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReelError::InvalidRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// The caption burned into the opening seconds of the video.
    pub fn caption(&self) -> String {
        first_sentence(&self.script)
    }
}

impl TryFrom<RawRequest> for GenerationRequest {
    type Error = ReelError;

    fn try_from(raw: RawRequest) -> Result<Self> {
        GenerationRequest::new(
            raw.script.unwrap_or_default(),
            raw.vibe.unwrap_or_default(),
        )
    }
}

/// Text up to and including the first `.`.
///
/// A script without any `.` is used whole; no period is appended.
pub fn first_sentence(script: &str) -> String {
    let script = script.trim();
    match script.find('.') {
        Some(idx) => script[..=idx].trim().to_string(),
        None => script.to_string(),
    }
}

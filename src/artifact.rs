//! The finished video handed back to transports.

use base64::Engine;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Default name suggested to clients saving the video.
pub const DEFAULT_FILENAME: &str = "motivational_video.mp4";

/// MIME type of the encoded container.
pub const CONTENT_TYPE: &str = "video/mp4";

/// An encoded video plus what a transport needs to deliver it.
#[derive(Debug, Clone)]
pub struct VideoArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
    pub metadata: ArtifactMetadata,
}

/// Facts about the rendered video, for logs and JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactMetadata {
    pub session_id: Uuid,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
    pub clip_count: usize,
    pub truncated: bool,
}

/// Base64 form used by JSON and function-handler transports.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedArtifact {
    pub video: String,
    pub content_type: String,
    pub filename: String,
    pub metadata: ArtifactMetadata,
}

impl VideoArtifact {
    /// Wrap encoded MP4 bytes.
    pub fn mp4(bytes: Vec<u8>, metadata: ArtifactMetadata) -> Self {
        Self {
            bytes,
            content_type: CONTENT_TYPE.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            metadata,
        }
    }

    /// Size of the encoded video.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Value for a `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename.replace('"', ""))
    }

    /// Standard base64 of the video bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// JSON-friendly form with the video base64-encoded.
    pub fn encoded(&self) -> EncodedArtifact {
        EncodedArtifact {
            video: self.to_base64(),
            content_type: self.content_type.clone(),
            filename: self.filename.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Write the video to `path`, creating parent directories.
    pub async fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &self.bytes).await
    }
}

//! Pexels video search client.

use super::{FootageQuery, FootageSource, StockClipReference};
use crate::error::{ReelError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

/// Response of `GET /videos/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsSearchResponse {
    #[serde(default)]
    pub videos: Vec<PexelsVideo>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

/// A stock video with all its available encodings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsVideo {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub video_files: Vec<PexelsVideoFile>,
}

/// One encoding of a stock video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PexelsVideoFile {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Pick the first encoding of each video that is at least `min_height` tall.
///
/// Videos without a qualifying encoding are skipped; order is preserved.
pub fn select_clips(videos: &[PexelsVideo], min_height: u32) -> Vec<StockClipReference> {
    videos
        .iter()
        .filter_map(|video| {
            video.video_files.iter().find_map(|file| {
                let height = file.height.unwrap_or(0);
                match file.link.as_deref() {
                    Some(link) if height >= min_height && !link.is_empty() => {
                        Some(StockClipReference {
                            url: link.to_string(),
                            height,
                        })
                    }
                    _ => None,
                }
            })
        })
        .collect()
}

/// Client for the Pexels video API.
pub struct PexelsClient {
    client: reqwest::Client,
    api_key: String,
    search_url: Url,
}

impl PexelsClient {
    /// Create a client. The key is sent verbatim in the Authorization header.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, base_url: &str) -> Result<Self> {
        // Without a trailing slash `join` would replace the last path segment
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| ReelError::Config(format!("Invalid footage base URL '{}': {}", base_url, e)))?;
        let search_url = base
            .join("videos/search")
            .map_err(|e| ReelError::Config(format!("Invalid footage base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            search_url,
        })
    }

    /// Run a search and return the raw response.
    pub async fn search_videos(&self, query: &FootageQuery) -> Result<PexelsSearchResponse> {
        let per_page = query.per_page.to_string();
        let response = self
            .client
            .get(self.search_url.clone())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[
                ("query", query.keyword.as_str()),
                ("per_page", per_page.as_str()),
                ("orientation", query.orientation.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ReelError::FootageDiscovery {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReelError::FootageDiscovery {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| ReelError::FootageDiscovery {
            status: status.as_u16(),
            message: format!("Invalid search response: {}", e),
        })
    }
}

#[async_trait]
impl FootageSource for PexelsClient {
    #[instrument(skip(self), fields(keyword = %query.keyword))]
    async fn search(&self, query: &FootageQuery) -> Result<Vec<StockClipReference>> {
        let response = self.search_videos(query).await?;
        let clips = select_clips(&response.videos, query.min_height);
        info!(
            "Found {} videos, {} with a {}p+ encoding",
            response.videos.len(),
            clips.len(),
            query.min_height
        );
        Ok(clips)
    }

    #[instrument(skip(self, dest), fields(url = %clip.url))]
    async fn download(&self, clip: &StockClipReference, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(&clip.url)
            .send()
            .await
            .map_err(|e| ReelError::Download(format!("{}: {}", clip.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReelError::Download(format!("{} returned {}", clip.url, status)));
        }

        // Encodings can run to hundreds of MB, so the body goes straight to disk
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ReelError::Download(format!("{}: {}", clip.url, e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        debug!("Wrote {} bytes to {}", written, dest.display());

        Ok(written)
    }
}

//! Stock footage discovery and download.

mod pexels;

pub use pexels::{select_clips, PexelsClient, PexelsSearchResponse, PexelsVideo, PexelsVideoFile};

use crate::error::{ReelError, Result};
use crate::workspace::SessionWorkspace;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Search parameters sent to a footage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootageQuery {
    /// Search term (the vibe).
    pub keyword: String,
    /// Maximum number of candidate videos.
    pub per_page: u32,
    /// Requested orientation.
    pub orientation: String,
    /// Minimum vertical resolution of a selected encoding.
    pub min_height: u32,
}

/// One selected encoding of a stock video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockClipReference {
    /// Direct download link.
    pub url: String,
    /// Vertical resolution of this encoding.
    pub height: u32,
}

/// Trait for stock footage services.
#[async_trait]
pub trait FootageSource: Send + Sync {
    /// Find clips for a query, at most one per source video, in service order.
    async fn search(&self, query: &FootageQuery) -> Result<Vec<StockClipReference>>;

    /// Download a clip to `dest`, returning the number of bytes written.
    async fn download(&self, clip: &StockClipReference, dest: &Path) -> Result<u64>;
}

/// Download every clip into the workspace.
///
/// Up to `concurrency` downloads run at once; the returned paths follow the
/// order of `clips`. The first failure aborts the rest.
#[instrument(skip_all, fields(clips = clips.len(), concurrency = concurrency))]
pub async fn download_all(
    source: &dyn FootageSource,
    clips: &[StockClipReference],
    workspace: &SessionWorkspace,
    concurrency: usize,
) -> Result<Vec<PathBuf>> {
    stream::iter(0..clips.len())
        .map(|idx| {
            let clip = &clips[idx];
            let dest = workspace.clip_path(idx);
            async move {
                let bytes = source.download(clip, &dest).await?;
                debug!("Clip {} downloaded ({} bytes)", idx, bytes);
                Ok::<_, ReelError>(dest)
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

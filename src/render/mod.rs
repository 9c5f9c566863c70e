//! Video composition.
//!
//! Turns downloaded clips and a narration track into the finished vertical
//! video: concatenate, attach narration, burn in the caption, force the
//! portrait frame, fade in and out, cap the duration, and encode.
//! The heavy lifting is done by ffmpeg; this module plans and supervises it.

mod plan;
mod probe;

pub use plan::{quote_filter_value, RenderPlan};
pub use probe::probe_duration;

use crate::config::RenderSettings;
use crate::error::{ReelError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Inputs for one composition.
#[derive(Debug, Clone)]
pub struct CompositionJob {
    /// Downloaded clips, in the order they should play.
    pub clips: Vec<PathBuf>,
    /// Synthesized narration.
    pub narration: PathBuf,
    /// Text shown over the opening seconds.
    pub caption: String,
    /// Where the encoded video is written.
    pub output: PathBuf,
}

/// What the compositor produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionReport {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
    pub truncated: bool,
}

/// Trait for video composition engines.
#[async_trait]
pub trait Compositor: Send + Sync {
    /// Compose and encode the video described by `job`.
    async fn compose(&self, job: &CompositionJob) -> Result<CompositionReport>;
}

/// ffmpeg-based compositor.
pub struct FfmpegCompositor {
    settings: RenderSettings,
}

impl FfmpegCompositor {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    async fn run_ffmpeg(&self, args: Vec<std::ffi::OsString>) -> Result<()> {
        let child = Command::new(&self.settings.ffmpeg_path)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let timeout = Duration::from_secs(self.settings.timeout_seconds);
        let result = match tokio::time::timeout(timeout, child).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ReelError::Timeout {
                    operation: "ffmpeg encode".to_string(),
                    seconds: self.settings.timeout_seconds,
                });
            }
        };

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(ReelError::Composition(format!("ffmpeg failed: {}", err.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ReelError::ToolNotFound(self.settings.ffmpeg_path.clone()))
            }
            Err(e) => Err(ReelError::Composition(format!("ffmpeg error: {e}"))),
        }
    }
}

#[async_trait]
impl Compositor for FfmpegCompositor {
    #[instrument(skip_all, fields(clips = job.clips.len()))]
    async fn compose(&self, job: &CompositionJob) -> Result<CompositionReport> {
        if job.clips.is_empty() {
            return Err(ReelError::Composition("No clips to compose".to_string()));
        }

        let mut durations = Vec::with_capacity(job.clips.len());
        for clip in &job.clips {
            let duration = probe_duration(&self.settings.ffprobe_path, clip).await?;
            debug!("{} is {:.2}s", clip.display(), duration);
            durations.push(duration);
        }

        let plan = RenderPlan::new(&self.settings, &durations)?;
        info!(
            "Rendering {:.1}s of {:.1}s timeline at {}x{}",
            plan.output_seconds, plan.timeline_seconds, plan.width, plan.height
        );

        let caption_file = job.output.with_file_name("caption.txt");
        tokio::fs::write(&caption_file, job.caption.as_bytes()).await?;

        let args = plan.ffmpeg_args(&job.clips, &job.narration, &caption_file, &job.output);
        self.run_ffmpeg(args).await?;

        if !job.output.exists() {
            return Err(ReelError::Composition(
                "ffmpeg finished without writing the output".to_string(),
            ));
        }

        Ok(CompositionReport {
            output: job.output.clone(),
            width: plan.width,
            height: plan.height,
            duration_seconds: plan.output_seconds,
            truncated: plan.is_truncated(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_job_is_rejected() {
        let compositor = FfmpegCompositor::new(RenderSettings::default());
        let job = CompositionJob {
            clips: Vec::new(),
            narration: PathBuf::from("voiceover.mp3"),
            caption: "Go.".into(),
            output: PathBuf::from("final.mp4"),
        };
        let err = compositor.compose(&job).await.unwrap_err();
        assert_eq!(err.kind(), "composition");
    }

    #[tokio::test]
    async fn test_missing_ffprobe_is_reported() {
        let settings = RenderSettings {
            ffprobe_path: "reelsmith-no-such-ffprobe".into(),
            ..Default::default()
        };
        let compositor = FfmpegCompositor::new(settings);
        let job = CompositionJob {
            clips: vec![PathBuf::from("stock_0.mp4")],
            narration: PathBuf::from("voiceover.mp3"),
            caption: "Go.".into(),
            output: PathBuf::from("final.mp4"),
        };
        let err = compositor.compose(&job).await.unwrap_err();
        assert!(matches!(err, ReelError::ToolNotFound(_)));
    }
}

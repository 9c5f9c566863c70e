//! Pipeline orchestrator for Reelsmith.
//!
//! Coordinates one generation from script to encoded video: narration,
//! footage search, download, composition. Each call runs in its own
//! workspace, which is removed whether the call succeeds or fails.

use crate::artifact::{ArtifactMetadata, VideoArtifact};
use crate::config::Settings;
use crate::error::{ReelError, Result};
use crate::footage::{download_all, FootageQuery, FootageSource, PexelsClient};
use crate::http::create_client;
use crate::render::{CompositionJob, Compositor, FfmpegCompositor};
use crate::request::GenerationRequest;
use crate::speech::{create_synthesizer, Synthesizer};
use crate::workspace::SessionWorkspace;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// The main orchestrator for the Reelsmith pipeline.
pub struct Orchestrator {
    settings: Settings,
    synthesizer: Arc<dyn Synthesizer>,
    footage: Arc<dyn FootageSource>,
    compositor: Arc<dyn Compositor>,
    temp_dir: PathBuf,
}

impl Orchestrator {
    /// Create an orchestrator with the configured engines.
    ///
    /// Fails if no footage API key has been configured.
    pub fn new(settings: Settings) -> Result<Self> {
        let api_key = settings.footage.api_key().map(str::to_string).ok_or_else(|| {
            ReelError::Config(
                "No Pexels API key. Set PEXELS_API_KEY or footage.api_key in the config file."
                    .to_string(),
            )
        })?;

        let footage_client = create_client(Duration::from_secs(settings.footage.timeout_seconds))?;
        let footage: Arc<dyn FootageSource> = Arc::new(PexelsClient::new(
            footage_client,
            api_key,
            &settings.footage.base_url,
        )?);

        let synthesizer = create_synthesizer(&settings.speech)?;
        info!("Using {} speech engine", synthesizer.name());

        let compositor: Arc<dyn Compositor> =
            Arc::new(FfmpegCompositor::new(settings.render.clone()));

        Self::with_components(settings, synthesizer, footage, compositor)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        synthesizer: Arc<dyn Synthesizer>,
        footage: Arc<dyn FootageSource>,
        compositor: Arc<dyn Compositor>,
    ) -> Result<Self> {
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        Ok(Self {
            settings,
            synthesizer,
            footage,
            compositor,
            temp_dir,
        })
    }

    fn footage_query(&self, vibe: &str) -> FootageQuery {
        FootageQuery {
            keyword: vibe.to_string(),
            per_page: self.settings.footage.per_page,
            orientation: self.settings.footage.orientation.clone(),
            min_height: self.settings.footage.min_height,
        }
    }

    /// Validate the fields and run the pipeline.
    pub async fn generate(&self, script: &str, vibe: &str) -> Result<VideoArtifact> {
        let request = GenerationRequest::new(script, vibe)?;
        self.assemble(&request).await
    }

    /// Produce the finished video for a request.
    ///
    /// Steps run strictly in order and the first failure aborts the rest.
    /// Nothing external is touched for an invalid request.
    #[instrument(skip_all, fields(vibe = %request.vibe, session = tracing::field::Empty))]
    pub async fn assemble(&self, request: &GenerationRequest) -> Result<VideoArtifact> {
        request.validate()?;

        let workspace = SessionWorkspace::create(&self.temp_dir)?;
        tracing::Span::current().record("session", tracing::field::display(workspace.session_id()));

        let result = self.run(request, &workspace).await;

        if let Err(e) = workspace.close() {
            warn!("Failed to cleanup workspace: {}", e);
        }

        match &result {
            Ok(artifact) => info!(
                "Generated {:.1}s video ({} bytes)",
                artifact.metadata.duration_seconds,
                artifact.len()
            ),
            Err(e) => warn!(kind = e.kind(), "Generation failed: {}", e),
        }

        result
    }

    async fn run(&self, request: &GenerationRequest, workspace: &SessionWorkspace) -> Result<VideoArtifact> {
        // Narration
        info!("Synthesizing narration...");
        let narration = workspace.voiceover_path();
        self.synthesizer
            .synthesize(&request.script, &narration)
            .await
            .map_err(|e| stage_error(e, ReelError::Synthesis))?;

        // Footage discovery
        info!("Searching footage for '{}'...", request.vibe);
        let query = self.footage_query(&request.vibe);
        let clips = self.footage.search(&query).await?;
        if clips.is_empty() {
            return Err(ReelError::NoFootageFound {
                vibe: request.vibe.clone(),
            });
        }
        info!("Selected {} clips", clips.len());

        // Download
        let clip_paths = download_all(
            self.footage.as_ref(),
            &clips,
            workspace,
            self.settings.footage.download_concurrency,
        )
        .await
        .map_err(|e| stage_error(e, ReelError::Download))?;

        // Composition
        info!("Composing video...");
        let job = CompositionJob {
            clips: clip_paths,
            narration,
            caption: request.caption(),
            output: workspace.output_path(),
        };
        let report = self
            .compositor
            .compose(&job)
            .await
            .map_err(|e| stage_error(e, ReelError::Composition))?;

        let bytes = tokio::fs::read(&report.output)
            .await
            .map_err(|e| ReelError::Composition(format!("Cannot read encoded video: {}", e)))?;

        Ok(VideoArtifact::mp4(
            bytes,
            ArtifactMetadata {
                session_id: workspace.session_id(),
                width: report.width,
                height: report.height,
                duration_seconds: report.duration_seconds,
                clip_count: job.clips.len(),
                truncated: report.truncated,
            },
        ))
    }
}

/// Attribute plumbing failures (IO, JSON, HTTP) to the step they happened in.
fn stage_error(err: ReelError, stage: fn(String) -> ReelError) -> ReelError {
    if err.kind() == "internal" {
        stage(err.to_string())
    } else {
        err
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_missing_fields_touch_nothing() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(2),
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let request = GenerationRequest {
            script: "   ".into(),
            vibe: "ocean".into(),
        };
        let err = h.orchestrator.assemble(&request).await.unwrap_err();
        assert!(matches!(err, ReelError::InvalidRequest(_)));

        let err = h.orchestrator.generate("Go.", "").await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        assert_eq!(h.speech.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.footage.searches.load(Ordering::SeqCst), 0);
        assert!(h.compositor.jobs.lock().unwrap().is_empty());
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_happy_path() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(3),
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let artifact = h
            .orchestrator
            .generate("Never give up. Keep going.", "ocean")
            .await
            .unwrap();

        assert_eq!(artifact.bytes, b"mp4-bytes");
        assert_eq!(artifact.content_type, "video/mp4");
        assert_eq!(artifact.filename, "motivational_video.mp4");
        assert_eq!(artifact.metadata.width, 1080);
        assert_eq!(artifact.metadata.height, 1920);
        assert_eq!(artifact.metadata.clip_count, 3);

        let query = h.footage.queries.lock().unwrap()[0].clone();
        assert_eq!(query.keyword, "ocean");
        assert_eq!(query.per_page, 5);
        assert_eq!(query.orientation, "portrait");
        assert_eq!(query.min_height, 1080);

        let jobs = h.compositor.jobs.lock().unwrap();
        assert_eq!(jobs[0].caption, "Never give up.");

        // Clips reach the compositor in discovery order
        let contents = h.compositor.clip_contents.lock().unwrap().clone();
        assert_eq!(
            contents,
            vec![
                "https://videos.example/0",
                "https://videos.example/1",
                "https://videos.example/2"
            ]
        );

        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_before_download() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(2),
                search_status: Some(401),
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let err = h.orchestrator.generate("Go.", "ocean").await.unwrap_err();
        assert!(matches!(err, ReelError::FootageDiscovery { status: 401, .. }));
        assert_eq!(err.status_code(), 500);
        assert!(h.footage.downloads.lock().unwrap().is_empty());
        assert!(h.compositor.jobs.lock().unwrap().is_empty());
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_no_footage_fails_fast() {
        let h = harness(FakeSpeech::default(), FakeFootage::default(), FakeCompositor::default());

        let err = h.orchestrator.generate("Go.", "zzzz").await.unwrap_err();
        assert!(matches!(err, ReelError::NoFootageFound { ref vibe } if vibe == "zzzz"));
        assert!(h.footage.downloads.lock().unwrap().is_empty());
        assert!(h.compositor.jobs.lock().unwrap().is_empty());
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_synthesis_failure_stops_pipeline() {
        let h = harness(
            FakeSpeech {
                fail: true,
                ..Default::default()
            },
            FakeFootage {
                clips: clips(1),
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let err = h.orchestrator.generate("Go.", "ocean").await.unwrap_err();
        assert_eq!(err.kind(), "synthesis");
        assert_eq!(h.footage.searches.load(Ordering::SeqCst), 0);
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_download_failure_cleans_up() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(3),
                fail_download: true,
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let err = h.orchestrator.generate("Go.", "ocean").await.unwrap_err();
        assert_eq!(err.kind(), "download");
        assert_eq!(h.footage.downloads.lock().unwrap().len(), 1);
        assert!(h.compositor.jobs.lock().unwrap().is_empty());
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_composition_failure_cleans_up() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(2),
                ..Default::default()
            },
            FakeCompositor {
                fail: true,
                ..Default::default()
            },
        );

        let err = h.orchestrator.generate("Go.", "ocean").await.unwrap_err();
        assert_eq!(err.kind(), "composition");
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_separate_workspaces() {
        let h = harness(
            FakeSpeech::default(),
            FakeFootage {
                clips: clips(2),
                ..Default::default()
            },
            FakeCompositor::default(),
        );

        let (a, b) = tokio::join!(
            h.orchestrator.generate("Go.", "ocean"),
            h.orchestrator.generate("Go.", "ocean")
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.metadata.session_id, b.metadata.session_id);

        let jobs = h.compositor.jobs.lock().unwrap();
        assert_ne!(jobs[0].output, jobs[1].output);
        assert_eq!(workspace_count(h.root.path()), 0);
    }

    #[test]
    fn test_new_requires_api_key() {
        let root = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.general.temp_dir = root.path().to_string_lossy().into_owned();

        let err = Orchestrator::new(settings.clone()).err().unwrap();
        assert_eq!(err.kind(), "config");

        let settings = settings.with_api_key(Some("test-key".into()));
        assert!(Orchestrator::new(settings).is_ok());
    }

    #[test]
    fn test_stage_error_keeps_specific_kinds() {
        let io = ReelError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(stage_error(io, ReelError::Download).kind(), "download");

        let specific = ReelError::NoFootageFound { vibe: "x".into() };
        assert_eq!(stage_error(specific, ReelError::Download).kind(), "no_footage_found");
    }
}

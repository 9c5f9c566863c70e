//! Narration synthesis.
//!
//! # Engines
//!
//! - **Google** (default): the public Google Translate speech endpoint, the
//!   same one gTTS talks to. Long scripts are split into short tokens and the
//!   resulting MP3 segments are appended into one file.
//! - **OpenAI**: the OpenAI speech API, for a more natural voice.

mod google;
mod openai;

pub use google::{split_text, GoogleTts, MAX_TOKEN_CHARS};
pub use openai::OpenAiTts;

use crate::config::{SpeechEngine, SpeechSettings};
use crate::error::Result;
use crate::http::{create_client, create_openai_client};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Trait for text-to-speech engines.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speak `text` and write the audio to `output`.
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()>;

    /// Short engine name for logs.
    fn name(&self) -> &str;
}

/// Build the configured speech engine.
pub fn create_synthesizer(settings: &SpeechSettings) -> Result<Arc<dyn Synthesizer>> {
    let timeout = Duration::from_secs(settings.timeout_seconds);
    let engine: Arc<dyn Synthesizer> = match settings.engine {
        SpeechEngine::Google => Arc::new(GoogleTts::with_config(
            create_client(timeout)?,
            &settings.language,
            &settings.tld,
            settings.slow,
        )?),
        SpeechEngine::OpenAI => Arc::new(OpenAiTts::with_config(
            create_openai_client(timeout)?,
            &settings.openai_model,
            &settings.openai_voice,
        )?),
    };
    Ok(engine)
}

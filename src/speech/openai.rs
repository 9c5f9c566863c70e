//! OpenAI speech API engine.

use super::Synthesizer;
use crate::error::{ReelError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// The speech endpoint rejects longer inputs.
const MAX_INPUT_CHARS: usize = 4096;

/// OpenAI text-to-speech engine.
pub struct OpenAiTts {
    client: Client<OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
}

impl OpenAiTts {
    /// Create an engine with the given model and voice names.
    pub fn with_config(client: Client<OpenAIConfig>, model: &str, voice: &str) -> Result<Self> {
        let model = match model {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let voice = match voice.to_lowercase().as_str() {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            other => {
                return Err(ReelError::Config(format!("Unknown OpenAI voice: {}", other)));
            }
        };

        Ok(Self { client, model, voice })
    }
}

#[async_trait]
impl Synthesizer for OpenAiTts {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReelError::Synthesis("Nothing to speak".to_string()));
        }
        if text.chars().count() > MAX_INPUT_CHARS {
            return Err(ReelError::Synthesis(format!(
                "Script is longer than {} characters",
                MAX_INPUT_CHARS
            )));
        }

        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(self.model.clone())
            .voice(self.voice.clone())
            .response_format(SpeechResponseFormat::Mp3)
            .speed(1.0)
            .build()
            .map_err(|e| ReelError::Synthesis(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| ReelError::Synthesis(format!("OpenAI speech API error: {}", e)))?;

        debug!("Received {} bytes of audio", response.bytes.len());
        tokio::fs::write(output, &response.bytes).await?;

        Ok(())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::create_openai_client;
    use std::time::Duration;

    #[test]
    fn test_rejects_unknown_voice() {
        let client = create_openai_client(Duration::from_secs(5)).unwrap();
        assert!(OpenAiTts::with_config(client.clone(), "tts-1", "nova").is_ok());
        assert!(OpenAiTts::with_config(client, "tts-1", "robot").is_err());
    }
}

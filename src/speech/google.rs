//! Google Translate speech endpoint (the gTTS protocol).

use super::Synthesizer;
use crate::error::{ReelError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use url::Url;

/// The endpoint refuses longer inputs.
pub const MAX_TOKEN_CHARS: usize = 100;

static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;:,]+(?:\s|$)").expect("valid boundary regex"));

/// Speech synthesized through translate.google.<tld>.
pub struct GoogleTts {
    client: reqwest::Client,
    endpoint: Url,
    language: String,
    slow: bool,
}

impl GoogleTts {
    /// Create an engine speaking `language` at normal or slow speed.
    pub fn with_config(client: reqwest::Client, language: &str, tld: &str, slow: bool) -> Result<Self> {
        let endpoint = format!("https://translate.google.{}/translate_tts", tld);
        Self::with_endpoint(client, &endpoint, language, slow)
    }

    /// Create an engine against an explicit `translate_tts` URL.
    pub fn with_endpoint(client: reqwest::Client, endpoint: &str, language: &str, slow: bool) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ReelError::Config(format!("Invalid speech endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            client,
            endpoint,
            language: language.to_string(),
            slow,
        })
    }

    fn token_url(&self, token: &str, idx: usize, total: usize) -> Url {
        let speed = if self.slow { "0.3" } else { "1" };
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", token)
            .append_pair("tl", &self.language)
            .append_pair("client", "tw-ob")
            .append_pair("ttsspeed", speed)
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &token.chars().count().to_string());
        url
    }

    async fn fetch_token(&self, token: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let url = self.token_url(token, idx, total);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReelError::Synthesis(format!("Speech request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReelError::Synthesis(format!(
                "Speech endpoint returned {} for segment {}: {}",
                status, idx, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReelError::Synthesis(format!("Speech response read failed: {}", e)))?;

        if bytes.is_empty() {
            return Err(ReelError::Synthesis(format!("Empty audio for segment {}", idx)));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Synthesizer for GoogleTts {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let tokens = split_text(text, MAX_TOKEN_CHARS);
        if tokens.is_empty() {
            return Err(ReelError::Synthesis("Nothing to speak".to_string()));
        }

        debug!("Synthesizing {} segments", tokens.len());

        // MP3 frames concatenate cleanly, so segments are appended as they arrive
        let mut file = tokio::fs::File::create(output).await?;
        for (idx, token) in tokens.iter().enumerate() {
            let audio = self.fetch_token(token, idx, tokens.len()).await?;
            file.write_all(&audio).await?;
        }
        file.flush().await?;

        Ok(())
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Split text into tokens of at most `max_chars` characters.
///
/// Cuts after punctuation when possible, then at the last space, and only
/// splits a word when it alone exceeds the limit.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut tokens = Vec::new();
    let mut rest = normalized.as_str();

    while !rest.is_empty() {
        if rest.chars().count() <= max_chars {
            tokens.push(rest.to_string());
            break;
        }

        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];

        let cut = BOUNDARY
            .find_iter(window)
            .last()
            .map(|m| m.end())
            .or_else(|| rest[window_end..].starts_with(' ').then_some(window_end))
            .or_else(|| window.rfind(' ').filter(|&i| i > 0))
            .unwrap_or(window_end);

        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if !head.is_empty() {
            tokens.push(head.to_string());
        }
        rest = tail.trim_start();
    }

    tokens
}

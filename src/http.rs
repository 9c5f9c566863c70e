//! HTTP client construction with sensible defaults.

use crate::error::{ReelError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

const USER_AGENT: &str = concat!("reelsmith/", env!("CARGO_PKG_VERSION"));

/// Create a reqwest client with the given request timeout.
///
/// Every outbound call (speech, footage search, clip download) goes through
/// a client built here so none of them can hang forever.
pub fn create_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ReelError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_openai_client(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = create_client(timeout)?;
    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(create_client(Duration::from_secs(5)).is_ok());
    }
}

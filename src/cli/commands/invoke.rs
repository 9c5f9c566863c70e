//! Invoke command: run the function handler on one event.

use crate::config::Settings;
use crate::handler::{self, HandlerEvent, HandlerResponse};
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Read an event from `event_path` (or stdin) and print the handler response.
pub async fn run_invoke(event_path: Option<&str>, settings: Settings) -> Result<()> {
    let raw = match event_path {
        Some(path) => {
            let path = Settings::expand_path(path);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read event file {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let response = match serde_json::from_str::<HandlerEvent>(&raw) {
        Ok(event) => {
            let orchestrator = Orchestrator::new(settings)?;
            handler::handle(&orchestrator, event).await
        }
        Err(e) => HandlerResponse::error(400, &format!("Invalid event: {}", e), "invalid_request"),
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{format_duration, format_size, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the generate command.
pub async fn run_generate(script: &str, vibe: &str, output: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Generate, &settings)?;

    let orchestrator = Orchestrator::new(settings)?;
    let output_path = Settings::expand_path(output);

    let spinner = Output::spinner(&format!("Generating '{}' video...", vibe.trim()));
    let result = orchestrator.generate(script, vibe).await;
    spinner.finish_and_clear();

    let artifact = match result {
        Ok(artifact) => artifact,
        Err(e) => {
            Output::error(&format!("Generation failed ({})", e.kind()));
            return Err(e.into());
        }
    };

    artifact.save(&output_path).await?;

    Output::success(&format!("Saved {}", output_path.display()));
    Output::kv("Resolution", &format!("{}x{}", artifact.metadata.width, artifact.metadata.height));
    Output::kv("Duration", &format_duration(artifact.metadata.duration_seconds));
    Output::kv("Clips", &artifact.metadata.clip_count.to_string());
    Output::kv("Size", &format_size(artifact.len() as u64));
    if artifact.metadata.truncated {
        Output::warning("Footage ran longer than the duration limit and was cut.");
    }

    Ok(())
}

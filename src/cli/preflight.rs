//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{ReelError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Rendering requires the footage key, ffmpeg and ffprobe.
    Generate,
    /// Long-running adapters only need the key up front.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_api_key(settings)?;
    if let Operation::Generate = operation {
        check_tool(&settings.render.ffmpeg_path)?;
        check_tool(&settings.render.ffprobe_path)?;
    }
    Ok(())
}

/// Check that a footage API key is configured.
fn check_api_key(settings: &Settings) -> Result<()> {
    match settings.footage.api_key() {
        Some(_) => Ok(()),
        None => Err(ReelError::Config(
            "No Pexels API key. Set it with: export PEXELS_API_KEY='...' or --pexels-api-key".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ReelError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ReelError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(ReelError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_first() {
        let mut settings = Settings::default();
        settings.footage.api_key = Some("  ".into());
        let err = check(Operation::Serve, &settings).unwrap_err();
        assert!(matches!(err, ReelError::Config(_)));
    }

    #[test]
    fn test_serve_skips_tool_checks() {
        let mut settings = Settings::default().with_api_key(Some("key".into()));
        settings.render.ffmpeg_path = "reelsmith-no-such-ffmpeg".into();
        tokio_test::assert_ok!(check(Operation::Serve, &settings));
    }

    #[test]
    fn test_generate_reports_missing_tool() {
        let mut settings = Settings::default().with_api_key(Some("key".into()));
        settings.render.ffmpeg_path = "reelsmith-no-such-ffmpeg".into();
        let err = tokio_test::assert_err!(check(Operation::Generate, &settings));
        assert!(matches!(err, ReelError::ToolNotFound(ref t) if t == "reelsmith-no-such-ffmpeg"));
    }
}

//! Media inspection with ffprobe.

use crate::error::{ReelError, Result};
use std::path::Path;
use tokio::process::Command;

/// Queries the duration of a media file using ffprobe with JSON output.
pub async fn probe_duration(ffprobe: &str, path: &Path) -> Result<f64> {
    let result = Command::new(ffprobe)
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReelError::ToolNotFound(ffprobe.to_string()));
        }
        Err(e) => {
            return Err(ReelError::Composition(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(ReelError::Composition(format!(
            "ffprobe could not read {}",
            path.display()
        )));
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        ReelError::Composition(format!("Could not determine duration of {}", path.display()))
    })
}

/// Extract `format.duration` from ffprobe's JSON output.
fn parse_duration(json: &str) -> Option<f64> {
    let parsed: serde_json::Value = serde_json::from_str(json).ok()?;
    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let json = r#"{"format": {"filename": "stock_0.mp4", "duration": "12.480000"}}"#;
        assert_eq!(parse_duration(json), Some(12.48));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration("not json"), None);
        assert_eq!(parse_duration(r#"{"format": {}}"#), None);
        assert_eq!(parse_duration(r#"{"format": {"duration": "N/A"}}"#), None);
        assert_eq!(parse_duration(r#"{"format": {"duration": "0.0"}}"#), None);
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let err = probe_duration("reelsmith-no-such-ffprobe", Path::new("x.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReelError::ToolNotFound(_)));
    }
}

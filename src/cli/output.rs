//! CLI output formatting utilities.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Styled terminal output. Status lines share a `>>` marker coloured by
/// severity; warnings and errors go to stderr so piped stdout stays clean.
pub struct Output;

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn marker(self) -> StyledObject<&'static str> {
        let marker = style(">>").bold();
        match self {
            Level::Info => marker.cyan(),
            Level::Success => marker.green(),
            Level::Warning => marker.yellow(),
            Level::Error => marker.red(),
        }
    }
}

fn emit(level: Level, msg: &str) {
    match level {
        Level::Info | Level::Success => println!("{} {}", level.marker(), msg),
        Level::Warning | Level::Error => eprintln!("{} {}", level.marker(), msg),
    }
}

impl Output {
    pub fn info(msg: &str) {
        emit(Level::Info, msg);
    }

    pub fn success(msg: &str) {
        emit(Level::Success, msg);
    }

    pub fn warning(msg: &str) {
        emit(Level::Warning, msg);
    }

    pub fn error(msg: &str) {
        emit(Level::Error, msg);
    }

    /// Section title, preceded by a blank line.
    pub fn header(title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    /// Indented `key: value` detail line.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Steady-ticking spinner; the caller finishes or clears it.
    pub fn spinner(msg: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner().with_message(msg.to_string());
        if let Ok(template) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
            bar.set_style(template);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

/// Format seconds as `1m 5.0s` / `42.0s`.
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = seconds - (minutes * 60) as f64;
    if minutes > 0 {
        format!("{}m {:.1}s", minutes, secs)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Binary-prefixed size: `500 B`, `1.0 KB`, `5.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.0), "42.0s");
        assert_eq!(format_duration(65.0), "1m 5.0s");
    }
}

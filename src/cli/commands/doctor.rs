//! `reelsmith doctor`: checks the render toolchain and credentials before a
//! first render.

use crate::cli::Output;
use crate::config::{Settings, SpeechEngine};
use console::style;
use std::process::Command;

/// Outcome of one diagnostic, with an optional remedy line.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    fn icon(self) -> console::StyledObject<&'static str> {
        match self {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        }
    }
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            hint: hint.map(str::to_string),
        }
    }

    fn ok(name: &str, message: &str) -> Self {
        Self::new(name, CheckStatus::Ok, message, None)
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self::new(name, CheckStatus::Warning, message, Some(hint))
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self::new(name, CheckStatus::Error, message, Some(hint))
    }

    fn print(&self) {
        println!("  {} {} - {}", self.status.icon(), style(&self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Print every check grouped by section; exits 1 if any check errors.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Reelsmith Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        (
            "External Tools",
            vec![
                check_tool("ffmpeg", &settings.render.ffmpeg_path),
                check_tool("ffprobe", &settings.render.ffprobe_path),
            ],
        ),
        (
            "API Configuration",
            vec![check_pexels_key(settings), check_speech_engine(settings)],
        ),
        ("Directories", vec![check_temp_dir(settings)]),
        ("Configuration", vec![check_config_file()]),
    ];

    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
        }
        println!();
    }

    let count = |status: CheckStatus| {
        sections
            .iter()
            .flat_map(|(_, checks)| checks)
            .filter(|check| check.status == status)
            .count()
    };
    let errors = count(CheckStatus::Error);
    let warnings = count(CheckStatus::Warning);

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before generating videos.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Reelsmith is ready to use.");
    }

    Ok(())
}

/// Runs `<program> -version` and reports its first line.
fn check_tool(name: &str, program: &str) -> CheckResult {
    match Command::new(program).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok(name, &truncate(&version, 50))
        }
        Ok(_) => CheckResult::error(name, "installed but not working", install_hint_ffmpeg()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, &format!("{} not found", program), install_hint_ffmpeg())
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), install_hint_ffmpeg()),
    }
}

/// Check that a footage API key is configured.
fn check_pexels_key(settings: &Settings) -> CheckResult {
    match settings.footage.api_key() {
        Some(key) => CheckResult::ok("Pexels API key", &format!("configured ({})", mask_key(key))),
        None => CheckResult::error(
            "Pexels API key",
            "not set",
            "Set with: export PEXELS_API_KEY='...' (free key at https://www.pexels.com/api/)",
        ),
    }
}

/// Check the narration engine's credentials.
fn check_speech_engine(settings: &Settings) -> CheckResult {
    match settings.speech.engine {
        SpeechEngine::Google => CheckResult::ok(
            "Speech engine",
            &format!("google ({}, translate.google.{})", settings.speech.language, settings.speech.tld),
        ),
        SpeechEngine::OpenAI => match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => CheckResult::ok(
                "Speech engine",
                &format!("openai {} / {}", settings.speech.openai_model, settings.speech.openai_voice),
            ),
            _ => CheckResult::error(
                "Speech engine",
                "openai selected but OPENAI_API_KEY is not set",
                "Set with: export OPENAI_API_KEY='sk-...' or use speech.engine = \"google\"",
            ),
        },
    }
}

/// Check the workspace root is writable.
fn check_temp_dir(settings: &Settings) -> CheckResult {
    let dir = settings.temp_dir();
    let probe = std::fs::create_dir_all(&dir).and_then(|_| tempfile::tempfile_in(&dir).map(|_| ()));
    match probe {
        Ok(()) => CheckResult::ok("Temp directory", &dir.display().to_string()),
        Err(e) => CheckResult::error(
            "Temp directory",
            &format!("{} is not writable: {}", dir.display(), e),
            "Set general.temp_dir in the config file",
        ),
    }
}

/// A missing config file only means defaults are in effect.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: reelsmith config init",
        )
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}

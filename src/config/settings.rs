//! Configuration settings for Reelsmith.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything `config.toml` can set; absent sections fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub speech: SpeechSettings,
    pub footage: FootageSettings,
    pub render: RenderSettings,
    pub server: ServerSettings,
}

/// Logging and scratch-space settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory under which per-request workspaces are created.
    pub temp_dir: String,
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/reelsmith".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Text-to-speech engine type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngine {
    /// Google Translate speech endpoint (default, no credential needed).
    #[default]
    Google,
    /// OpenAI speech API (reads OPENAI_API_KEY).
    OpenAI,
}

impl std::str::FromStr for SpeechEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "gtts" => Ok(SpeechEngine::Google),
            "openai" => Ok(SpeechEngine::OpenAI),
            _ => Err(format!("Unknown speech engine: {}", s)),
        }
    }
}

impl std::fmt::Display for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechEngine::Google => write!(f, "google"),
            SpeechEngine::OpenAI => write!(f, "openai"),
        }
    }
}

/// Narration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Speech engine (google, openai).
    pub engine: SpeechEngine,
    /// Spoken language (IETF tag understood by the engine).
    pub language: String,
    /// Use the slow speaking rate.
    pub slow: bool,
    /// Top-level domain of the Google endpoint (com, co.uk, ...).
    pub tld: String,
    /// Model for the OpenAI engine.
    pub openai_model: String,
    /// Voice for the OpenAI engine.
    pub openai_voice: String,
    /// Timeout for each synthesis request.
    pub timeout_seconds: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            engine: SpeechEngine::Google,
            language: "en".to_string(),
            slow: false,
            tld: "com".to_string(),
            openai_model: "tts-1".to_string(),
            openai_voice: "alloy".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Stock footage service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FootageSettings {
    /// Pexels API key. Usually supplied via PEXELS_API_KEY instead.
    pub api_key: Option<String>,
    /// Base URL of the footage API.
    pub base_url: String,
    /// Number of candidate videos requested per search.
    pub per_page: u32,
    /// Requested orientation (portrait, landscape, square).
    pub orientation: String,
    /// Minimum vertical resolution of a selected encoding.
    pub min_height: u32,
    /// Number of clips downloaded at once (1 = strictly serial).
    pub download_concurrency: usize,
    /// Timeout for search and download requests.
    pub timeout_seconds: u64,
}

impl Default for FootageSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.pexels.com".to_string(),
            per_page: 5,
            orientation: "portrait".to_string(),
            min_height: 1080,
            download_concurrency: 1,
            timeout_seconds: 120,
        }
    }
}

impl FootageSettings {
    /// Returns the API key if one is configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Composition and encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Hard cap on the output duration.
    pub max_duration_seconds: f64,
    /// Length of the head and tail fades.
    pub fade_seconds: f64,
    /// How long the caption stays on screen.
    pub caption_seconds: f64,
    /// Caption font size in pixels.
    pub caption_font_size: u32,
    /// Caption colour (any ffmpeg colour name or hex).
    pub caption_color: String,
    /// Caption font (fontconfig pattern).
    pub caption_font: String,
    /// Trim to the duration cap before placing the tail fade.
    pub trim_before_fade: bool,
    /// Video encoder.
    pub video_codec: String,
    /// Audio encoder.
    pub audio_codec: String,
    /// Path to ffmpeg.
    pub ffmpeg_path: String,
    /// Path to ffprobe.
    pub ffprobe_path: String,
    /// Timeout for the whole encode.
    pub timeout_seconds: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 24,
            max_duration_seconds: 60.0,
            fade_seconds: 1.0,
            caption_seconds: 5.0,
            caption_font_size: 70,
            caption_color: "white".to_string(),
            caption_font: "Arial:style=Bold".to_string(),
            trim_before_fade: true,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            timeout_seconds: 600,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Settings from [`Settings::default_config_path`], or defaults if absent.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Like [`Settings::load`] but with an explicit `--config` path.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Write pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ReelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override the footage API key (from a flag or the environment).
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.footage.api_key = Some(key);
        }
        self
    }

    /// `<config dir>/reelsmith/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelsmith")
            .join("config.toml")
    }

    /// Expands a leading `~`.
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded workspace root.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

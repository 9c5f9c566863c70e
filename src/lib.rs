//! Reelsmith - short vertical video generator
//!
//! Turns a motivational script and a mood keyword ("vibe") into a captioned,
//! narrated 1080x1920 MP4 built from stock footage.
//!
//! # Overview
//!
//! One generation runs these steps in order:
//! - Narrate the script with a text-to-speech engine
//! - Search Pexels for portrait footage matching the vibe, keeping one
//!   encoding of at least 1080p per video
//! - Download the clips into a per-request workspace
//! - Concatenate, narrate, caption the first sentence, fade, cap at 60s and
//!   encode at 24 fps with ffmpeg
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `request` - Request validation and caption extraction
//! - `workspace` - Per-request scratch directories
//! - `speech` - Text-to-speech engines
//! - `footage` - Stock footage search and download
//! - `render` - ffmpeg composition
//! - `orchestrator` - Pipeline coordination
//! - `handler`, `mcp`, `cli` - Inbound adapters
//!
//! # Example
//!
//! ```rust,no_run
//! use reelsmith::config::Settings;
//! use reelsmith::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?.with_api_key(std::env::var("PEXELS_API_KEY").ok());
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let video = orchestrator.generate("Never give up. Keep going.", "ocean").await?;
//!     video.save(std::path::Path::new("motivational_video.mp4")).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod footage;
pub mod handler;
pub mod http;
pub mod mcp;
pub mod orchestrator;
pub mod render;
pub mod request;
pub mod speech;
pub mod workspace;

pub use error::{ReelError, Result};

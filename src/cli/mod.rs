//! CLI module for Reelsmith.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, format_size, Output};

use clap::{Parser, Subcommand};

/// Reelsmith - vertical motivational video generator
///
/// Narrates a script over stock footage matching a vibe and renders a
/// captioned 1080x1920 MP4 ready for short-form platforms.
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Pexels API key (overrides the config file)
    #[arg(long, env = "PEXELS_API_KEY", global = true, hide_env_values = true)]
    pub pexels_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one video and write it to a file
    Generate {
        /// Narration text; the first sentence becomes the caption
        #[arg(short, long)]
        script: String,

        /// Mood keyword used to search stock footage
        #[arg(short = 'b', long)]
        vibe: String,

        /// Output file
        #[arg(short, long, default_value = "motivational_video.mp4")]
        output: String,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the function handler on one event and print the response
    Invoke {
        /// Event JSON file (stdin if not specified)
        event: Option<String>,
    },

    /// Start MCP server for AI assistant integration
    Mcp,

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

//! MCP tool definitions for Reelsmith.

use super::protocol::Tool;
use crate::artifact::DEFAULT_FILENAME;
use serde_json::json;

pub const GENERATE_VIDEO: &str = "generate_video";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![Tool {
        name: GENERATE_VIDEO.to_string(),
        description: "Generate a vertical (1080x1920) motivational video. The script is narrated \
            over stock footage matching the vibe, and its first sentence is shown as a caption. \
            The MP4 is written to output_path."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "script": {
                    "type": "string",
                    "description": "Narration text; the first sentence becomes the caption"
                },
                "vibe": {
                    "type": "string",
                    "description": "Mood keyword used to search stock footage (e.g. luxury, grind, ocean)"
                },
                "output_path": {
                    "type": "string",
                    "description": "Where to write the MP4",
                    "default": DEFAULT_FILENAME
                }
            },
            "required": ["script", "vibe"]
        }),
    }]
}

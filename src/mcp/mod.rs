//! MCP (Model Context Protocol) server for Reelsmith.
//!
//! Lets AI assistants generate videos through a `generate_video` tool.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;

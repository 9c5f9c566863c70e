//! CLI command implementations.

mod config;
mod doctor;
mod generate;
mod invoke;
mod mcp;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use generate::run_generate;
pub use invoke::run_invoke;
pub use mcp::run_mcp;
pub use serve::{router, run_serve, AppState};

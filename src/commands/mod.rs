//! Command handlers for the CLI application.
//!
//! - `program`: building and inspecting upload sequences (build, inspect)
//! - `utility`: key table listing and config scaffolding (keys, init-config)

pub mod program;
pub mod utility;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

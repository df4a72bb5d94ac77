//! Utility command handlers.

use std::path::PathBuf;

use anyhow::{bail, Context};

use super::CommandResult;
use xbows_driver::ProgramConfig;
use xbows_protocol::Keycode;

/// List every key name with its bitmap byte and bit
pub fn keys() -> CommandResult {
    println!("{:<14} {:>4} {:>3}", "Key", "Byte", "Bit");
    for key in Keycode::all().filter(|&k| k != Keycode::None) {
        match key.bit_position() {
            Some(pos) => println!("{:<14} {:>4} {:>3}", key.name(), pos.byte, pos.bit),
            None => println!("{:<14} unassigned", key.name()),
        }
    }
    Ok(())
}

/// Write the example config
pub fn init_config(path: Option<PathBuf>, force: bool) -> CommandResult {
    let path = path.unwrap_or_else(ProgramConfig::default_path);
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    ProgramConfig::example()
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote example config to {}", path.display());
    Ok(())
}

//! Macro sub-program
//!
//! Macros are not programmed yet; the section is announced and left empty.

use tracing::debug;
use xbows_protocol::Packet;

use crate::error::ProgramError;
use crate::layer::{check_layer, CUSTOM_LAYERS};

/// Macro packets for custom layer `layer` (1-3). Currently always empty.
pub fn custom_macro_program(layer: u8) -> Result<Vec<Packet>, ProgramError> {
    let layer = check_layer("macro", layer, CUSTOM_LAYERS)?;
    debug!(layer, "no macros to program");
    Ok(Vec::new())
}

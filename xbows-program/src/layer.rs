//! Layer numbering
//!
//! Per-layer sections (keymap, macro, flashlight) number custom layers 1-3.
//! The light program uses its own numbering, 2-4. The two ranges are checked
//! independently; a raw layer value passed to the top-level assembler must
//! satisfy both.

use std::ops::RangeInclusive;

use crate::error::ProgramError;

/// Accepted by keymap, macro and flashlight builders
pub const CUSTOM_LAYERS: RangeInclusive<u8> = 1..=3;

/// Accepted by the light program assembler
pub const LIGHT_LAYERS: RangeInclusive<u8> = 2..=4;

/// Validate `layer` against `range`, naming `section` in the error.
pub fn check_layer(
    section: &'static str,
    layer: u8,
    range: RangeInclusive<u8>,
) -> Result<u8, ProgramError> {
    if range.contains(&layer) {
        Ok(layer)
    } else {
        Err(ProgramError::InvalidLayer {
            section,
            layer,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

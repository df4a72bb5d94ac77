//! Custom layer program assembly for X-Bows keyboards
//!
//! Turns an in-memory [`Program`] (keymap, flashlight keys, lighting
//! programs) into the ordered, checksummed packet sequence the firmware
//! expects, and decodes such a sequence back into a program.

pub mod assemble;
pub mod decode;
pub mod error;
pub mod flashlight;
pub mod frame;
pub mod keymap;
pub mod layer;
pub mod lights;
pub mod macros;
pub mod model;

pub use assemble::{custom_program, wake_packets};
pub use decode::{decode_program, DecodedProgram};
pub use error::ProgramError;
pub use flashlight::custom_flashlight_program;
pub use frame::{AnimationFrame, PatternFrame, Rgb};
pub use keymap::custom_keymap_program;
pub use layer::{CUSTOM_LAYERS, LIGHT_LAYERS};
pub use lights::{custom_light_programs, FrameIndexEntry};
pub use macros::custom_macro_program;
pub use model::{Keymap, LightProgram, Program, FLASHLIGHT_KEYS_SIZE};

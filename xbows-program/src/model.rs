//! In-memory configuration consumed by the program builders

use crate::frame::{AnimationFrame, PatternFrame};

/// Size of the flashlight key bitmap held by a program
pub const FLASHLIGHT_KEYS_SIZE: usize = 176;

/// Per-physical-key binding values, one 4-byte value per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    keys: Vec<u32>,
}

impl Keymap {
    pub fn new(keys: Vec<u32>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[u32] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<u32>> for Keymap {
    fn from(keys: Vec<u32>) -> Self {
        Self::new(keys)
    }
}

/// A lighting program: animation frames followed by pattern frames.
///
/// Used both for the layer's custom lights and for each flashlight program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightProgram {
    pub animation: Vec<AnimationFrame>,
    pub patterns: Vec<PatternFrame>,
}

impl LightProgram {
    /// Bytes this program occupies in the frame data region
    pub fn wire_size(&self) -> usize {
        self.animation.len() * AnimationFrame::WIRE_SIZE
            + self.patterns.len() * PatternFrame::WIRE_SIZE
    }
}

/// Everything uploaded for one custom layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub keymap: Keymap,
    pub custom_lights: LightProgram,
    pub flashlights: Vec<LightProgram>,
    pub flashlight_keys: [u8; FLASHLIGHT_KEYS_SIZE],
}

impl Default for Program {
    fn default() -> Self {
        Self {
            keymap: Keymap::default(),
            custom_lights: LightProgram::default(),
            flashlights: Vec::new(),
            flashlight_keys: [0; FLASHLIGHT_KEYS_SIZE],
        }
    }
}

impl Program {
    /// Custom lights first, then each flashlight program in order
    pub fn light_programs(&self) -> impl Iterator<Item = &LightProgram> {
        std::iter::once(&self.custom_lights).chain(self.flashlights.iter())
    }
}

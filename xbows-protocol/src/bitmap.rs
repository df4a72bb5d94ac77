//! 22-byte key bitmap shared by animation and pattern frames

use tracing::debug;

use crate::error::ProtocolError;
use crate::keycode::Keycode;
use crate::protocol::BITMAP_SIZE;

/// One bit per lit key. Starts cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyBitmap([u8; BITMAP_SIZE]);

impl KeyBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: [u8; BITMAP_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build a bitmap with every key in `keys` enabled.
    pub fn from_keys<I>(keys: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = Keycode>,
    {
        let mut bitmap = Self::new();
        for key in keys {
            bitmap.enable(key)?;
        }
        Ok(bitmap)
    }

    /// Set the bit for `key`.
    ///
    /// Keys without a bitmap position are rejected and leave the bitmap
    /// untouched.
    pub fn enable(&mut self, key: Keycode) -> Result<(), ProtocolError> {
        let Some(pos) = key.bit_position() else {
            debug!(%key, "refusing to light unassigned key");
            return Err(ProtocolError::UnassignedKey(key));
        };
        self.0[pos.byte] |= pos.mask();
        Ok(())
    }

    pub fn is_enabled(&self, key: Keycode) -> bool {
        key.bit_position()
            .is_some_and(|pos| self.0[pos.byte] & pos.mask() != 0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; BITMAP_SIZE];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Keys whose bit is set, in table order. Where several keys share a
    /// code only the first is reported.
    pub fn enabled_keys(&self) -> Vec<Keycode> {
        let mut seen = [0u8; BITMAP_SIZE];
        let mut keys = Vec::new();
        for key in Keycode::all() {
            let Some(pos) = key.bit_position() else {
                continue;
            };
            if self.0[pos.byte] & pos.mask() != 0 && seen[pos.byte] & pos.mask() == 0 {
                seen[pos.byte] |= pos.mask();
                keys.push(key);
            }
        }
        keys
    }

    pub fn as_bytes(&self) -> &[u8; BITMAP_SIZE] {
        &self.0
    }
}

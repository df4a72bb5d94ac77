//! TOML configuration for a custom layer program
//!
//! Keys are referenced by their display names (`"W"`, `"Esc"`, `"LShift"`),
//! colors as `[r, g, b]` arrays. A config converts into the
//! [`xbows_program::Program`] model with [`ProgramConfig::into_program`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use xbows_program::{
    AnimationFrame, Keymap, LightProgram, PatternFrame, Program, Rgb, FLASHLIGHT_KEYS_SIZE,
};
use xbows_protocol::{Keycode, ProtocolError};

/// Errors converting a config into a program
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{count} flashlight key bytes given, at most {max} fit")]
    TooManyFlashlightKeys { count: usize, max: usize },

    /// Bad key name in a frame, with the frame's location in the config
    #[error("{location}: {source}")]
    Key {
        location: String,
        #[source]
        source: ProtocolError,
    },
}

/// One animation frame: the keys lit in this step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrameConfig {
    #[serde(default)]
    pub keys: Vec<String>,
}

/// One pattern frame: keys, color, effect mode and duration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFrameConfig {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub color: [u8; 3],
    #[serde(default)]
    pub mode: u8,
    #[serde(default)]
    pub duration_ms: u16,
}

/// A light program as written in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightProgramConfig {
    #[serde(default)]
    pub animation: Vec<AnimationFrameConfig>,
    #[serde(default)]
    pub pattern: Vec<PatternFrameConfig>,
}

/// Complete custom layer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Target layer; must be valid for both keymap (1-3) and lights (2-4)
    #[serde(default = "default_layer")]
    pub layer: u8,
    /// Binding value per physical key
    #[serde(default)]
    pub keymap: Vec<u32>,
    /// Flashlight key bitmap, zero padded to 176 bytes
    #[serde(default)]
    pub flashlight_keys: Vec<u8>,
    #[serde(default)]
    pub custom_lights: LightProgramConfig,
    #[serde(default)]
    pub flashlights: Vec<LightProgramConfig>,
}

fn default_layer() -> u8 {
    2
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            keymap: Vec::new(),
            flashlight_keys: Vec::new(),
            custom_lights: LightProgramConfig::default(),
            flashlights: Vec::new(),
        }
    }
}

fn parse_keys(
    names: &[String],
    location: impl Fn() -> String,
) -> Result<Vec<Keycode>, ConfigError> {
    names
        .iter()
        .map(|name| name.parse::<Keycode>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConfigError::Key {
            location: location(),
            source,
        })
}

impl LightProgramConfig {
    /// Convert to the program model; `name` locates errors (`custom_lights`,
    /// `flashlights[1]`).
    pub fn to_light_program(&self, name: &str) -> Result<LightProgram, ConfigError> {
        let mut animation = Vec::with_capacity(self.animation.len());
        for (i, frame) in self.animation.iter().enumerate() {
            let location = || format!("{name}.animation[{i}]");
            let keys = parse_keys(&frame.keys, &location)?;
            let frame = AnimationFrame::with_keys(keys).map_err(|source| ConfigError::Key {
                location: location(),
                source,
            })?;
            animation.push(frame);
        }

        let mut patterns = Vec::with_capacity(self.pattern.len());
        for (i, frame) in self.pattern.iter().enumerate() {
            let location = || format!("{name}.pattern[{i}]");
            let [r, g, b] = frame.color;
            let mut pattern = PatternFrame::new(Rgb::new(r, g, b), frame.mode, frame.duration_ms);
            for key in parse_keys(&frame.keys, &location)? {
                pattern.enable(key).map_err(|source| ConfigError::Key {
                    location: location(),
                    source,
                })?;
            }
            patterns.push(pattern);
        }

        Ok(LightProgram {
            animation,
            patterns,
        })
    }
}

impl ProgramConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xbows")
            .join("program.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: ProgramConfig = toml::from_str(&content)?;
            debug!(path = %path.display(), layer = config.layer, "loaded program config");
            Ok(config)
        } else {
            warn!(path = %path.display(), "config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A small starter program: WASD chase with a red flash on Esc, and one
    /// flashlight program on the function row.
    pub fn example() -> Self {
        let keys = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        Self {
            layer: default_layer(),
            keymap: Vec::new(),
            flashlight_keys: Vec::new(),
            custom_lights: LightProgramConfig {
                animation: vec![
                    AnimationFrameConfig { keys: keys(&["W"]) },
                    AnimationFrameConfig { keys: keys(&["A"]) },
                    AnimationFrameConfig { keys: keys(&["S"]) },
                    AnimationFrameConfig { keys: keys(&["D"]) },
                ],
                pattern: vec![PatternFrameConfig {
                    keys: keys(&["Esc"]),
                    color: [255, 0, 0],
                    mode: 1,
                    duration_ms: 250,
                }],
            },
            flashlights: vec![LightProgramConfig {
                animation: vec![AnimationFrameConfig {
                    keys: keys(&["F1", "F2", "F3", "F4"]),
                }],
                pattern: Vec::new(),
            }],
        }
    }

    /// Convert into the program model, resolving key names.
    pub fn into_program(self) -> Result<Program, ConfigError> {
        if self.flashlight_keys.len() > FLASHLIGHT_KEYS_SIZE {
            return Err(ConfigError::TooManyFlashlightKeys {
                count: self.flashlight_keys.len(),
                max: FLASHLIGHT_KEYS_SIZE,
            });
        }
        let mut flashlight_keys = [0u8; FLASHLIGHT_KEYS_SIZE];
        flashlight_keys[..self.flashlight_keys.len()].copy_from_slice(&self.flashlight_keys);

        let custom_lights = self.custom_lights.to_light_program("custom_lights")?;
        let flashlights = self
            .flashlights
            .iter()
            .enumerate()
            .map(|(i, prog)| prog.to_light_program(&format!("flashlights[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Program {
            keymap: Keymap::new(self.keymap),
            custom_lights,
            flashlights,
            flashlight_keys,
        })
    }
}

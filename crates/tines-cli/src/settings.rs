//! TOML settings file mapped onto an [`EngineConfig`].
//!
//! Every field is optional; absent fields fall back to the engine
//! defaults, so a settings file only needs to name what it changes:
//!
//! ```toml
//! scale = 2
//! octave = 0
//! reverb = false
//!
//! [modulators]
//! tremolo = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tines_engine::{EngineConfig, ModSet};

/// Errors from loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the file.
    #[error("failed to read settings file '{path}': {source}")]
    ReadFile {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed values fail engine validation.
    #[error("invalid settings: {0}")]
    Invalid(#[from] tines_engine::ConfigError),
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModulatorSettings {
    vibrato: Option<bool>,
    tremolo: Option<bool>,
    sweep: Option<bool>,
}

/// Deserialized settings file. Convert with [`Settings::into_config`].
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    sample_rate: Option<f32>,
    block_size: Option<usize>,
    scale: Option<usize>,
    octave: Option<usize>,
    reverb: Option<bool>,
    lockout_ms: Option<f32>,
    auto_pluck: Option<bool>,
    nonlinearity: Option<f32>,
    #[serde(default)]
    modulators: Option<ModulatorSettings>,
}

impl Settings {
    /// Load and parse a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Overlay these settings on the engine defaults and validate.
    pub fn into_config(self) -> Result<EngineConfig, SettingsError> {
        let defaults = EngineConfig::default();
        let mods = self.modulators.unwrap_or_default();
        let default_mods = ModSet::default();

        let config = EngineConfig {
            sample_rate: self.sample_rate.unwrap_or(defaults.sample_rate),
            block_size: self.block_size.unwrap_or(defaults.block_size),
            scale_index: self.scale.unwrap_or(defaults.scale_index),
            octave_index: self.octave.unwrap_or(defaults.octave_index),
            reverb: self.reverb.unwrap_or(defaults.reverb),
            mod_set: ModSet {
                vibrato: mods.vibrato.unwrap_or(default_mods.vibrato),
                tremolo: mods.tremolo.unwrap_or(default_mods.tremolo),
                sweep: mods.sweep.unwrap_or(default_mods.sweep),
            },
            lockout_ms: self.lockout_ms.unwrap_or(defaults.lockout_ms),
            auto_pluck: self.auto_pluck.unwrap_or(defaults.auto_pluck),
            nonlinearity: self.nonlinearity.unwrap_or(defaults.nonlinearity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Load a config from an optional settings path, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, SettingsError> {
    match path {
        Some(path) => Settings::load(path)?.into_config(),
        None => Ok(EngineConfig::default()),
    }
}

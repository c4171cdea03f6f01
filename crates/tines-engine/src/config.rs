//! Engine configuration.
//!
//! One engine is parameterized by a configuration value object selected
//! at construction time — tuning, enabled modulators, post effects,
//! trigger behavior — rather than by maintaining parallel engine
//! variants. Validation happens once, up front; the audio path never
//! sees an invalid configuration.

use crate::modulation::ModSet;
use crate::tuning::{OCTAVE_RATIOS, OCTAVE_UNISON, TUNINGS};

/// Complete engine construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Samples per audio block.
    pub block_size: usize,
    /// Initial tuning index into [`TUNINGS`].
    pub scale_index: usize,
    /// Initial octave index into [`OCTAVE_RATIOS`].
    pub octave_index: usize,
    /// Whether the reverb stage is built.
    pub reverb: bool,
    /// Which modulators run.
    pub mod_set: ModSet,
    /// Retrigger lockout in milliseconds.
    pub lockout_ms: f32,
    /// Whether the auto-pluck sequencer is armed at startup.
    pub auto_pluck: bool,
    /// String dispersion amount (the kalimba character), 0–1.
    pub nonlinearity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 4,
            scale_index: 0,
            octave_index: OCTAVE_UNISON,
            reverb: true,
            mod_set: ModSet::default(),
            lockout_ms: 100.0,
            auto_pluck: true,
            nonlinearity: 0.1,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(8000.0..=192_000.0).contains(&self.sample_rate) {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > 4096 {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        if self.scale_index >= TUNINGS.len() {
            return Err(ConfigError::ScaleIndex(self.scale_index));
        }
        if self.octave_index >= OCTAVE_RATIOS.len() {
            return Err(ConfigError::OctaveIndex(self.octave_index));
        }
        if !(0.0..=10_000.0).contains(&self.lockout_ms) {
            return Err(ConfigError::Lockout(self.lockout_ms));
        }
        if !(0.0..=1.0).contains(&self.nonlinearity) {
            return Err(ConfigError::Nonlinearity(self.nonlinearity));
        }
        Ok(())
    }

    /// Lockout duration in samples at the configured rate.
    pub fn lockout_samples(&self) -> u32 {
        (self.lockout_ms / 1000.0 * self.sample_rate) as u32
    }
}

/// Configuration validation failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sample rate outside 8 kHz – 192 kHz.
    SampleRate(f32),
    /// Block size zero or over 4096.
    BlockSize(usize),
    /// Scale index past the tuning table.
    ScaleIndex(usize),
    /// Octave index past the ratio table.
    OctaveIndex(usize),
    /// Lockout outside 0 – 10000 ms.
    Lockout(f32),
    /// Nonlinearity outside 0 – 1.
    Nonlinearity(f32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SampleRate(v) => write!(f, "sample rate {v} Hz outside 8000-192000"),
            Self::BlockSize(v) => write!(f, "block size {v} outside 1-4096"),
            Self::ScaleIndex(v) => {
                write!(f, "scale index {v} past tuning table ({} entries)", TUNINGS.len())
            }
            Self::OctaveIndex(v) => write!(
                f,
                "octave index {v} past ratio table ({} entries)",
                OCTAVE_RATIOS.len()
            ),
            Self::Lockout(v) => write!(f, "lockout {v} ms outside 0-10000"),
            Self::Nonlinearity(v) => write!(f, "nonlinearity {v} outside 0-1"),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_sample_rate() {
        let config = EngineConfig {
            sample_rate: 1000.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SampleRate(_))));
    }

    #[test]
    fn rejects_zero_block() {
        let config = EngineConfig {
            block_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BlockSize(0))));
    }

    #[test]
    fn rejects_out_of_table_indices() {
        let config = EngineConfig {
            scale_index: TUNINGS.len(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ScaleIndex(_))));

        let config = EngineConfig {
            octave_index: OCTAVE_RATIOS.len(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::OctaveIndex(_))));
    }

    #[test]
    fn lockout_samples_at_48k() {
        let config = EngineConfig::default();
        assert_eq!(config.lockout_samples(), 4800);
    }

    #[test]
    fn error_messages_name_the_field() {
        let msg = format!("{}", ConfigError::SampleRate(1.0));
        assert!(msg.contains("sample rate"));
        let msg = format!("{}", ConfigError::ScaleIndex(99));
        assert!(msg.contains("scale index"));
    }
}

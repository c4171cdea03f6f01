//! One-pole lowpass filter.
//!
//! The simplest IIR lowpass — 6 dB/octave rolloff, one multiply per
//! sample:
//!
//! ```text
//! y[n] = (1 - coeff) * x[n] + coeff * y[n-1]
//! ```
//!
//! Used in two places in the engine: as the brightness filter inside each
//! string's feedback loop (where the coefficient is set directly from the
//! normalized brightness value) and as the high-frequency absorber inside
//! the reverb tail (where it is set from a cutoff frequency).

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` stays in [0, 1) so the filter is unconditionally stable
/// - state is flushed to zero below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
}

impl OnePole {
    /// Create a lowpass with the given cutoff frequency.
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Create a lowpass with an explicit smoothing coefficient.
    ///
    /// `coeff` is the pole position: 0 passes the input unchanged, values
    /// approaching 1 filter heavily. Clamped to [0, 0.9999].
    pub fn with_coeff(coeff: f32) -> Self {
        Self {
            state: 0.0,
            coeff: coeff.clamp(0.0, 0.9999),
            sample_rate: 48000.0,
        }
    }

    /// Set the cutoff frequency, recalculating the coefficient as
    /// `coeff = exp(-2π * cutoff / sample_rate)`.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.coeff = expf(-core::f32::consts::TAU * cutoff_hz / self.sample_rate);
    }

    /// Set the pole coefficient directly. Clamped to [0, 0.9999].
    #[inline]
    pub fn set_coeff(&mut self, coeff: f32) {
        self.coeff = coeff.clamp(0.0, 0.9999);
    }

    /// Current pole coefficient.
    #[inline]
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Update the sample rate. Callers must re-set the cutoff afterwards
    /// if the coefficient was frequency-derived.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }
}

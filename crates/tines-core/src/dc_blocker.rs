//! DC blocking filter.
//!
//! First-order highpass with transfer function
//! `H(z) = (1 - z^-1) / (1 - R*z^-1)` where R sits just below 1.
//! Karplus-Strong feedback loops accumulate DC bias over long sustains;
//! this filter removes it without touching audible content (the -3 dB
//! point is ~7 Hz at 48 kHz).
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with
//! Audio Applications", DC Blocker chapter.

use core::f32::consts::PI;

/// DC blocking filter using a first-order highpass.
///
/// `y[n] = x[n] - x[n-1] + R * y[n-1]`
///
/// The -3 dB cutoff is `(1 - R) / (2π) * sample_rate`.
pub struct DcBlocker {
    coeff: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    const DEFAULT_CUTOFF_HZ: f32 = 7.0;

    /// Create a DC blocker for the given sample rate with a ~7 Hz cutoff.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            coeff: Self::calculate_coeff(Self::DEFAULT_CUTOFF_HZ, sample_rate),
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// Process one sample, returning the output with DC removed.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x_prev + self.coeff * self.y_prev;
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    /// Reset filter history to zero.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    /// Update the sample rate, keeping the same cutoff frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = Self::calculate_coeff(Self::DEFAULT_CUTOFF_HZ, sample_rate);
    }

    /// Current R coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    // R = 1 - 2π*fc/fs, clamped so the pole never reaches the unit circle.
    fn calculate_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
        (1.0 - 2.0 * PI * cutoff_hz / sample_rate).clamp(0.9, 0.9999)
    }
}

//! Low-frequency oscillator for modulation.
//!
//! A phase accumulator advanced by `freq / sample_rate` per sample,
//! wrapping at 1.0. The output is a pure function of phase; the LFO has
//! no error states and never blocks.

use core::f32::consts::TAU;
use libm::sinf;

/// LFO waveform shape.
///
/// Fixed at construction — a modulation slot does not change shape at
/// runtime, only rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sinusoid, the usual choice for vibrato.
    #[default]
    Sine,
    /// Linear up/down ramp, used for tremolo.
    Triangle,
    /// Rising ramp with abrupt reset, used for filter sweeps.
    Saw,
}

/// Low-frequency oscillator.
///
/// Output range is [-1, 1] for every waveform.
///
/// # Example
///
/// ```rust
/// use tines_core::{Lfo, LfoWaveform};
///
/// let mut vibrato = Lfo::new(48000.0, 5.0, LfoWaveform::Sine);
/// let value = vibrato.next();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Lfo {
    /// Create an LFO with the given sample rate, frequency, and waveform.
    pub fn new(sample_rate: f32, freq_hz: f32, waveform: LfoWaveform) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Waveform shape.
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Update the sample rate, preserving the configured frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }

    /// Advance one sample and return the output in [-1, 1].
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * TAU),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoWaveform::Saw => 2.0 * self.phase - 1.0,
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hz_completes_one_cycle_per_second() {
        let mut lfo = Lfo::new(44100.0, 1.0, LfoWaveform::Sine);
        for _ in 0..44100 {
            lfo.next();
        }
        let phase_error = lfo.phase().min((lfo.phase() - 1.0).abs());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for waveform in [LfoWaveform::Sine, LfoWaveform::Triangle, LfoWaveform::Saw] {
            let mut lfo = Lfo::new(44100.0, 5.0, waveform);
            for _ in 0..1000 {
                let value = lfo.next();
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "waveform {waveform:?} out of range: {value}"
                );
            }
        }
    }

    #[test]
    fn triangle_is_continuous() {
        let mut lfo = Lfo::new(48000.0, 10.0, LfoWaveform::Triangle);
        let mut prev = lfo.next();
        for _ in 0..10000 {
            let cur = lfo.next();
            assert!(
                (cur - prev).abs() < 0.01,
                "triangle jumped from {prev} to {cur}"
            );
            prev = cur;
        }
    }

    #[test]
    fn sample_rate_change_preserves_frequency() {
        let mut lfo = Lfo::new(44100.0, 2.0, LfoWaveform::Saw);
        lfo.set_sample_rate(48000.0);
        assert!((lfo.frequency() - 2.0).abs() < 1e-4);
    }
}

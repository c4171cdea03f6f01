//! Schroeder allpass filter for reverb diffusion.
//!
//! Passes all frequencies at equal amplitude while smearing phase,
//! turning discrete comb echoes into a dense, smooth tail.

use crate::DelayLine;
use crate::flush_denormal;

/// Schroeder allpass filter.
///
/// Structure: `output = -input + delayed`, with
/// `input + delayed * feedback` written back into the delay. Stable for
/// `|feedback| < 1`.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples.max(2)),
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient. Clamped to [-0.99, 0.99]; ~0.5 is
    /// the usual choice for diffusion.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read();
        let output = -input + delayed;
        self.delay
            .write_and_advance(flush_denormal(input + delayed * self.feedback));
        output
    }

    /// Clear delay content.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}

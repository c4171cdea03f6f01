//! Feedback comb filter with damping, for reverb algorithms.
//!
//! A delayed feedback loop with a one-pole lowpass in the feedback path,
//! simulating high-frequency absorption in acoustic spaces. Building
//! block for Schroeder/Freeverb-style reverbs.

use crate::DelayLine;
use crate::flush_denormal;

/// Comb filter with feedback and damping.
///
/// The feedback path runs through a one-pole lowpass so the tail darkens
/// as it decays, the way real rooms absorb treble faster than bass.
///
/// # Example
///
/// ```rust
/// use tines_core::CombFilter;
///
/// let mut comb = CombFilter::new(1116);
/// comb.set_feedback(0.84);
/// comb.set_damp(0.2);
/// let out = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    delay: DelayLine,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filterstore: f32,
}

impl CombFilter {
    /// Create a comb filter with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            delay: DelayLine::new(delay_samples.max(2)),
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filterstore: 0.0,
        }
    }

    /// Set the feedback amount. Clamped to [0, 0.98] — the loop gain must
    /// stay below unity or the tail grows without bound.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    /// Current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping amount (0 = bright, 1 = dark). Clamped to [0, 1].
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Current damping value.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp1
    }

    /// Process one sample. Output is the delayed signal; the input plus
    /// damped feedback is written back into the loop.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.delay.read();

        // One-pole lowpass in the feedback path
        self.filterstore = flush_denormal(output * self.damp2 + self.filterstore * self.damp1);

        self.delay
            .write_and_advance(input + self.filterstore * self.feedback);

        output
    }

    /// Clear delay content and filter state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filterstore = 0.0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.delay.len()
    }

    /// True if the delay length is zero (never: minimum is 2).
    pub fn is_empty(&self) -> bool {
        self.delay.is_empty()
    }
}

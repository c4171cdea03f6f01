//! Voice mixing and the output post chain.
//!
//! Order is fixed: headroom scaling → DC blocker → reverb (optional) →
//! soft saturation. The DC stage is mandatory — the string feedback
//! loops accumulate bias over long sustains that would otherwise distort
//! the output. The saturator bounds the final signal into [-1, 1] and
//! protects whatever hardware sits downstream.

use tines_core::{AllpassFilter, CombFilter, DcBlocker, Effect, soft_saturate};

/// Freeverb comb delay lengths at the 44.1 kHz reference rate.
/// Mutually prime to avoid stacked resonances.
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass delay lengths at the 44.1 kHz reference rate.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

const REFERENCE_RATE: f32 = 44100.0;

/// Fixed high-frequency damping inside the reverb feedback path.
/// Controls tail brightness; the tail darkens as it decays.
const TAIL_DAMP: f32 = 0.4;

/// Mix headroom for seven simultaneous voices.
const HEADROOM: f32 = 0.35;

/// Saturation drive and makeup, tuned so full polyphony lands just
/// under the rails with gentle harmonic coloration.
const SAT_DRIVE: f32 = 1.2;
const SAT_MAKEUP: f32 = 0.8;

fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    ((samples as f32 * target_rate / REFERENCE_RATE) as usize).max(2)
}

/// Freeverb-style reverb: 8 parallel damped combs into 4 series
/// allpasses, with a dry/wet mix.
///
/// Feedback is clamped below unity — the tail decays for every valid
/// setting.
pub struct Reverb {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
    feedback: f32,
    mix: f32,
}

impl Reverb {
    /// Create a reverb at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i], sample_rate))
            }),
            allpasses: core::array::from_fn(|i| {
                let mut ap = AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate));
                ap.set_feedback(0.5);
                ap
            }),
            feedback: 0.85,
            mix: 0.3,
        };
        reverb.apply_comb_params();
        reverb
    }

    /// Set the tail feedback. Clamped to [0, 0.98].
    pub fn set_feedback(&mut self, feedback: f32) {
        let clamped = feedback.clamp(0.0, 0.98);
        if (clamped - self.feedback).abs() > 1e-4 {
            self.feedback = clamped;
            self.apply_comb_params();
        }
    }

    /// Current tail feedback.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the dry/wet mix. Clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Current dry/wet mix.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    fn apply_comb_params(&mut self) {
        for comb in &mut self.combs {
            comb.set_feedback(self.feedback);
            comb.set_damp(TAIL_DAMP);
        }
    }
}

impl Effect for Reverb {
    fn process(&mut self, input: f32) -> f32 {
        let mut comb_sum = 0.0f32;
        for comb in &mut self.combs {
            comb_sum += comb.process(input);
        }
        comb_sum *= 0.125;

        let mut diffused = comb_sum;
        for allpass in &mut self.allpasses {
            diffused = allpass.process(diffused);
        }

        input * (1.0 - self.mix) + diffused * self.mix
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.combs = core::array::from_fn(|i| {
            CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i], sample_rate))
        });
        self.allpasses = core::array::from_fn(|i| {
            let mut ap = AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i], sample_rate));
            ap.set_feedback(0.5);
            ap
        });
        self.apply_comb_params();
    }

    fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}

/// Stateless tanh saturation stage.
pub struct SoftSaturator {
    drive: f32,
    makeup: f32,
}

impl SoftSaturator {
    /// Create the output saturator with the engine's fixed drive/makeup.
    pub fn new() -> Self {
        Self {
            drive: SAT_DRIVE,
            makeup: SAT_MAKEUP,
        }
    }
}

impl Default for SoftSaturator {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for SoftSaturator {
    fn process(&mut self, input: f32) -> f32 {
        soft_saturate(input, self.drive, self.makeup)
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

/// The complete output stage: headroom, DC removal, optional reverb,
/// saturation.
pub struct PostChain {
    dc_blocker: DcBlocker,
    reverb: Option<Reverb>,
    saturator: SoftSaturator,
}

impl PostChain {
    /// Create the post chain. `with_reverb = false` drops the reverb
    /// stage entirely (the signal path skips it, no CPU spent).
    pub fn new(sample_rate: f32, with_reverb: bool) -> Self {
        Self {
            dc_blocker: DcBlocker::new(sample_rate),
            reverb: with_reverb.then(|| Reverb::new(sample_rate)),
            saturator: SoftSaturator::new(),
        }
    }

    /// Update reverb mix and feedback, if the stage is present.
    pub fn set_reverb_params(&mut self, mix: f32, feedback: f32) {
        if let Some(reverb) = &mut self.reverb {
            reverb.set_mix(mix);
            reverb.set_feedback(feedback);
        }
    }

    /// Whether the reverb stage is present.
    pub fn has_reverb(&self) -> bool {
        self.reverb.is_some()
    }

    /// Process the raw voice sum for one sample into the final mono output.
    #[inline]
    pub fn process(&mut self, voice_sum: f32) -> f32 {
        let mut sample = voice_sum * HEADROOM;
        sample = self.dc_blocker.process(sample);
        if let Some(reverb) = &mut self.reverb {
            sample = reverb.process(sample);
        }
        self.saturator.process(sample)
    }

    /// Clear all stage state.
    pub fn reset(&mut self) {
        self.dc_blocker.reset();
        if let Some(reverb) = &mut self.reverb {
            reverb.reset();
        }
        self.saturator.reset();
    }

    /// Propagate a sample-rate change to every stage.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.dc_blocker.set_sample_rate(sample_rate);
        if let Some(reverb) = &mut self.reverb {
            reverb.set_sample_rate(sample_rate);
        }
    }
}

//! Karplus-Strong plucked-string voice.
//!
//! One voice owns a ring-buffer delay line whose active length sets the
//! pitch period, a one-pole lowpass in the feedback path (brightness),
//! and a feedback gain (damping). A trigger refills the loop with
//! wideband noise — the pluck. A mild bounded nonlinearity in the loop
//! adds pitch-dependent dispersion, shifting the timbre from an ideal
//! string toward the metallic character of a kalimba tine.
//!
//! Loop structure per sample:
//!
//! ```text
//! delay ──→ lowpass(brightness) ──→ × damping ──→ disperse ──┬──→ out
//!   ↑                                                        │
//!   └────────────────────────────────────────────────────────┘
//! ```

use tines_core::{DelayLine, OnePole, lerp, soft_saturate};

/// Lowest playable frequency. Sets the delay-line capacity; also the
/// floor that invalid frequencies are clamped up to.
pub const MIN_FREQUENCY_HZ: f32 = 20.0;

/// Linear congruential noise source for excitation bursts.
///
/// Numerical Recipes constants; one multiply-add per sample, no state
/// beyond the seed. Quality is irrelevant here — the burst is filtered
/// by the string loop within a few periods.
#[derive(Debug, Clone)]
struct NoiseSource {
    seed: u32,
}

impl NoiseSource {
    fn new(seed: u32) -> Self {
        Self { seed: seed.max(1) }
    }

    /// Next value in [-1, 1].
    #[inline]
    fn next(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        self.seed as f32 * 2.328_306_4e-10 * 2.0 - 1.0
    }
}

/// A single Karplus-Strong string voice.
///
/// # Invariants
///
/// - Loop length is always `round(sample_rate / frequency)`, recomputed
///   on every frequency change
/// - Feedback gain (`damping` times the unity-DC-gain lowpass) stays
///   below 1, so the loop cannot diverge
/// - `frequency` is clamped to `[MIN_FREQUENCY_HZ, sample_rate / 2]`
///
/// # Example
///
/// ```rust
/// use tines_engine::KarplusString;
///
/// let mut string = KarplusString::new(48000.0);
/// string.set_frequency(220.0);
/// string.set_damping(0.95);
/// string.set_brightness(0.8);
///
/// let first = string.process(true); // pluck
/// for _ in 0..1000 {
///     let _ = string.process(false);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KarplusString {
    delay: DelayLine,
    feedback_filter: OnePole,
    noise: NoiseSource,
    sample_rate: f32,
    frequency: f32,
    damping: f32,
    brightness: f32,
    nonlinearity: f32,
}

impl KarplusString {
    /// Create a voice at the given sample rate, tuned to a 220 Hz default.
    ///
    /// The delay buffer is sized for [`MIN_FREQUENCY_HZ`] and never
    /// reallocates.
    pub fn new(sample_rate: f32) -> Self {
        let capacity = libm::ceilf(sample_rate / MIN_FREQUENCY_HZ) as usize;
        let mut voice = Self {
            delay: DelayLine::new(capacity.max(2)),
            feedback_filter: OnePole::with_coeff(0.5),
            noise: NoiseSource::new(1664525),
            sample_rate,
            frequency: 220.0,
            damping: 0.9,
            brightness: 0.5,
            nonlinearity: 0.0,
        };
        voice.set_frequency(220.0);
        voice.set_brightness(0.5);
        voice
    }

    /// Set the fundamental frequency in Hz.
    ///
    /// Clamped to `[MIN_FREQUENCY_HZ, sample_rate / 2]`; the loop length
    /// becomes `round(sample_rate / frequency)`. Residual loop content is
    /// kept across the resize.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.clamp(MIN_FREQUENCY_HZ, self.sample_rate * 0.5);
        let period = libm::roundf(self.sample_rate / self.frequency) as usize;
        self.delay.set_len(period);
    }

    /// Current (clamped) frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Current loop length in samples.
    pub fn period_samples(&self) -> usize {
        self.delay.len()
    }

    /// Set the feedback damping. Clamped to [0, 0.99]; higher values
    /// sustain longer.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 0.99);
    }

    /// Current damping.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Set the brightness (high-frequency retention). Clamped to [0, 1];
    /// 1 keeps the full spectrum, 0 filters heavily.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
        self.feedback_filter.set_coeff(1.0 - self.brightness);
    }

    /// Current brightness.
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Set the dispersion amount. Clamped to [0, 1]; small values
    /// (~0.1) give the metallic kalimba character.
    pub fn set_nonlinearity(&mut self, amount: f32) {
        self.nonlinearity = amount.clamp(0.0, 1.0);
    }

    /// Produce one sample. When `trigger` is set, the loop is refilled
    /// with a noise burst first (the pluck), replacing residual content.
    #[inline]
    pub fn process(&mut self, trigger: bool) -> f32 {
        if trigger {
            self.excite();
        }

        let raw = self.delay.read();
        let filtered = self.feedback_filter.process(raw) * self.damping;

        // Bounded dispersion: blend toward tanh(k·x)/k, which has unit
        // slope at the origin and compresses larger amplitudes. Small-signal
        // loop gain therefore stays damping-bounded for any blend amount.
        let shaped = if self.nonlinearity > 0.0 {
            const DRIVE: f32 = 1.5;
            lerp(
                filtered,
                soft_saturate(filtered, DRIVE, 1.0 / DRIVE),
                self.nonlinearity,
            )
        } else {
            filtered
        };

        self.delay.write_and_advance(shaped);
        shaped
    }

    /// Silence the voice without changing parameters.
    pub fn reset(&mut self) {
        self.delay.clear();
        self.feedback_filter.reset();
    }

    fn excite(&mut self) {
        for slot in self.delay.active_mut() {
            *slot = self.noise.next();
        }
    }
}

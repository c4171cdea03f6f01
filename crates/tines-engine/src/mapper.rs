//! Control smoothing and control-to-parameter mapping.
//!
//! Raw normalized sensor readings arrive once per audio block. A
//! [`ControlBank`] slews them with a fixed time constant (no zipper
//! noise); a [`ParameterMapper`] then translates the smoothed values
//! into engineering units with one of three laws:
//!
//! - **linear**: `lo + v * (hi - lo)`
//! - **exponential**: `base * ratio^v`, for ranges spanning decades
//!   (the LFO rate covers 0.1–20 Hz)
//! - **discrete index**: `floor(v * (N - ε))` clamped to `[0, N-1]`,
//!   for scale and octave selection
//!
//! Discrete selections only take effect when the computed index changes,
//! at which point every voice is retuned before the next sample — no
//! voice ever plays a stale pitch against the new scale.
//!
//! Stability-sensitive parameters are clamped here regardless of the
//! control range: the feedback loop must never diverge or fully deaden.

use crate::tuning::{OCTAVE_RATIOS, TUNINGS};
use libm::powf;
use tines_core::SmoothedParam;

/// Number of control channels (one per physical pot).
pub const NUM_CONTROLS: usize = 8;

/// Per-voice damping clamp applied after the global decay multiplier.
pub const DAMPING_CLAMP: (f32, f32) = (0.5, 0.99);

/// Per-voice brightness clamp applied after the global brightness
/// multiplier and LFO sweep offset.
pub const BRIGHTNESS_CLAMP: (f32, f32) = (0.3, 1.0);

/// Control channel identifiers, in pot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlId {
    /// Global brightness multiplier.
    Brightness,
    /// Global decay/sustain multiplier.
    Decay,
    /// Reverb dry/wet mix.
    ReverbMix,
    /// Reverb size (tail feedback).
    ReverbSize,
    /// LFO base rate.
    LfoRate,
    /// LFO depth.
    LfoDepth,
    /// Scale selection.
    Scale,
    /// Octave transpose selection.
    Octave,
}

impl ControlId {
    /// All channels in pot order.
    pub const ALL: [Self; NUM_CONTROLS] = [
        Self::Brightness,
        Self::Decay,
        Self::ReverbMix,
        Self::ReverbSize,
        Self::LfoRate,
        Self::LfoDepth,
        Self::Scale,
        Self::Octave,
    ];

    /// Index into a raw/smoothed control frame.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Map a normalized value onto a linear range.
#[inline]
pub fn map_linear(value: f32, lo: f32, hi: f32) -> f32 {
    lo + value * (hi - lo)
}

/// Map a normalized value onto an exponential range `base * ratio^v`.
///
/// Gives perceptually even steps for frequencies and rates.
#[inline]
pub fn map_exponential(value: f32, base: f32, ratio: f32) -> f32 {
    base * powf(ratio, value)
}

/// Map a normalized value onto a discrete index in `[0, count - 1]`.
///
/// The epsilon keeps `value = 1.0` inside the top bin instead of
/// producing `count`.
#[inline]
pub fn map_discrete(value: f32, count: usize) -> usize {
    let scaled = value.clamp(0.0, 1.0) * (count as f32 - 1e-3);
    (scaled as usize).min(count - 1)
}

/// Bank of slewed control channels, advanced once per audio block.
///
/// The first ingest snaps every smoother to its raw reading so a control
/// surface left mid-travel at startup produces no settling sweep.
#[derive(Debug, Clone)]
pub struct ControlBank {
    smoothers: [SmoothedParam; NUM_CONTROLS],
    primed: bool,
}

impl ControlBank {
    /// Smoothing time constant for every channel.
    const SMOOTHING_MS: f32 = 50.0;

    /// Create a bank updating at the given block rate (blocks per second).
    pub fn new(block_rate: f32) -> Self {
        Self {
            smoothers: core::array::from_fn(|_| {
                SmoothedParam::with_config(0.0, block_rate, Self::SMOOTHING_MS)
            }),
            primed: false,
        }
    }

    /// Ingest one block's raw readings (clamped to [0, 1]) and return the
    /// smoothed frame.
    pub fn ingest(&mut self, raw: &[f32; NUM_CONTROLS]) -> [f32; NUM_CONTROLS] {
        let mut smoothed = [0.0; NUM_CONTROLS];
        for (i, smoother) in self.smoothers.iter_mut().enumerate() {
            let clamped = raw[i].clamp(0.0, 1.0);
            if self.primed {
                smoother.set_target(clamped);
            } else {
                smoother.set_immediate(clamped);
            }
            smoothed[i] = smoother.advance();
        }
        self.primed = true;
        smoothed
    }

    /// Current smoothed value of one channel without advancing.
    pub fn get(&self, id: ControlId) -> f32 {
        self.smoothers[id.index()].get()
    }
}

/// The block-rate parameter snapshot every sample in the block sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedParams {
    /// Multiplier on per-voice base brightness, 0.5–1.0.
    pub brightness_scale: f32,
    /// Multiplier on per-voice base damping, 0.5–1.0.
    pub decay_scale: f32,
    /// Reverb dry/wet mix, 0–1.
    pub reverb_mix: f32,
    /// Reverb tail feedback, 0.70–0.95.
    pub reverb_feedback: f32,
    /// LFO base rate in Hz, 0.1–20 exponential.
    pub lfo_rate_hz: f32,
    /// LFO depth, 0–1.
    pub lfo_depth: f32,
    /// Selected tuning index.
    pub scale_index: usize,
    /// Selected octave index.
    pub octave_index: usize,
    /// True when the scale or octave index changed this block; the engine
    /// must retune every voice before producing the next sample.
    pub retune: bool,
}

/// Translates a smoothed control frame into [`MappedParams`].
#[derive(Debug, Clone)]
pub struct ParameterMapper {
    prev_scale: usize,
    prev_octave: usize,
}

impl ParameterMapper {
    /// Create a mapper with the given initial selections.
    pub fn new(scale_index: usize, octave_index: usize) -> Self {
        Self {
            prev_scale: scale_index,
            prev_octave: octave_index,
        }
    }

    /// Map one smoothed control frame. Called once per block.
    pub fn map(&mut self, smoothed: &[f32; NUM_CONTROLS]) -> MappedParams {
        let get = |id: ControlId| smoothed[id.index()];

        let scale_index = map_discrete(get(ControlId::Scale), TUNINGS.len());
        let octave_index = map_discrete(get(ControlId::Octave), OCTAVE_RATIOS.len());
        let retune = scale_index != self.prev_scale || octave_index != self.prev_octave;
        self.prev_scale = scale_index;
        self.prev_octave = octave_index;

        MappedParams {
            brightness_scale: map_linear(get(ControlId::Brightness), 0.5, 1.0),
            decay_scale: map_linear(get(ControlId::Decay), 0.5, 1.0),
            reverb_mix: get(ControlId::ReverbMix).clamp(0.0, 1.0),
            reverb_feedback: map_linear(get(ControlId::ReverbSize), 0.70, 0.95),
            lfo_rate_hz: map_exponential(get(ControlId::LfoRate), 0.1, 200.0),
            lfo_depth: get(ControlId::LfoDepth).clamp(0.0, 1.0),
            scale_index,
            octave_index,
            retune,
        }
    }
}

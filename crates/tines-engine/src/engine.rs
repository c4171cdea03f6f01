//! The engine facade: all synthesis state behind one `process_block`.
//!
//! The engine owns every piece of mutable state — voices, smoothers,
//! trigger lanes, LFOs, activity timers, the post chain — and exposes a
//! single entry point per audio block. Inside a block the order is
//! fixed: control smoothing and parameter mapping complete first, so
//! every sample in the block sees one consistent parameter snapshot;
//! only the LFO modulation deltas vary per sample.
//!
//! Nothing in [`Engine::process_block`] allocates, blocks, or performs
//! I/O. All buffers are sized at construction.

use crate::activity::ActivityTracker;
use crate::config::{ConfigError, EngineConfig};
use crate::mapper::{
    BRIGHTNESS_CLAMP, ControlBank, DAMPING_CLAMP, MappedParams, NUM_CONTROLS, ParameterMapper,
};
use crate::modulation::LfoBank;
use crate::post::PostChain;
use crate::string::KarplusString;
use crate::trigger::{AutoPluck, TriggerBank};
use crate::tuning::{NUM_VOICES, OCTAVE_RATIOS, TUNINGS, Tuning, VoiceId};

/// One block's worth of external input: raw pot readings and per-voice
/// key levels. Written by the slow I/O loop, read by the audio callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlFrame {
    /// Raw normalized pot readings in [0, 1].
    pub pots: [f32; NUM_CONTROLS],
    /// Per-voice "currently pressed" levels. The engine consumes rising
    /// edges only.
    pub keys: [bool; NUM_VOICES],
}

impl Default for ControlFrame {
    fn default() -> Self {
        Self {
            pots: [0.5; NUM_CONTROLS],
            keys: [false; NUM_VOICES],
        }
    }
}

/// Read-only state for the display and LED collaborators.
///
/// Produced on demand; the engine never waits for a consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySnapshot {
    /// Current tuning name.
    pub scale_name: &'static str,
    /// Note name per voice slot.
    pub note_names: [&'static str; NUM_VOICES],
    /// Current octave ratio (0.5, 1.0, or 2.0).
    pub octave_ratio: f32,
    /// Bit `v` set while voice `v` is within its display window.
    pub active_mask: u32,
    /// Status LED level ("recently triggered").
    pub led: bool,
    /// Whether the auto-pluck sequencer is currently driving the voices.
    pub autonomous: bool,
    /// The block-rate parameter snapshot.
    pub params: MappedParams,
}

/// The complete synthesizer.
///
/// # Example
///
/// ```rust
/// use tines_engine::{ControlFrame, Engine, EngineConfig};
///
/// let mut engine = Engine::new(&EngineConfig::default()).unwrap();
/// let frame = ControlFrame::default();
/// let mut out = [0.0f32; 8]; // one 4-sample stereo block
/// engine.process_block(&frame, &mut out);
/// ```
pub struct Engine {
    sample_rate: f32,
    block_size: usize,

    controls: ControlBank,
    mapper: ParameterMapper,
    voices: [KarplusString; NUM_VOICES],
    triggers: TriggerBank,
    lfo_bank: LfoBank,
    activity: ActivityTracker,
    post: PostChain,

    // Block-rate snapshot, rebuilt at the top of every block
    params: MappedParams,
    // Per-voice targets derived from the current tuning and octave
    base_frequency: [f32; NUM_VOICES],
    base_brightness: [f32; NUM_VOICES],
}

impl Engine {
    /// Build an engine from a validated configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let block_rate = config.sample_rate / config.block_size as f32;
        let auto = config
            .auto_pluck
            .then(|| AutoPluck::default_at(config.sample_rate));

        let mut voices: [KarplusString; NUM_VOICES] =
            core::array::from_fn(|_| KarplusString::new(config.sample_rate));
        for voice in &mut voices {
            voice.set_nonlinearity(config.nonlinearity);
        }

        let mut engine = Self {
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            controls: ControlBank::new(block_rate),
            mapper: ParameterMapper::new(config.scale_index, config.octave_index),
            voices,
            triggers: TriggerBank::new(config.lockout_samples(), auto),
            lfo_bank: LfoBank::new(config.sample_rate, config.mod_set),
            activity: ActivityTracker::new(config.sample_rate),
            post: PostChain::new(config.sample_rate, config.reverb),
            params: MappedParams {
                brightness_scale: 1.0,
                decay_scale: 1.0,
                reverb_mix: 0.3,
                reverb_feedback: 0.85,
                lfo_rate_hz: 2.0,
                lfo_depth: 0.0,
                scale_index: config.scale_index,
                octave_index: config.octave_index,
                retune: false,
            },
            base_frequency: [0.0; NUM_VOICES],
            base_brightness: [0.0; NUM_VOICES],
        };

        engine.retune();
        Ok(engine)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Configured block size in samples.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The tuning currently driving the voices.
    pub fn tuning(&self) -> &'static Tuning {
        &TUNINGS[self.params.scale_index]
    }

    /// A voice's current target frequency (base pitch before vibrato).
    pub fn voice_frequency(&self, voice: VoiceId) -> f32 {
        self.base_frequency[voice.index()]
    }

    /// Process one audio block.
    ///
    /// `out` is an interleaved stereo buffer; `out.len() / 2` samples are
    /// produced (the mono signal duplicated to both channels). Intended
    /// to be called with `2 * block_size` but accepts any even length.
    pub fn process_block(&mut self, frame: &ControlFrame, out: &mut [f32]) {
        // Block rate: smooth controls and map parameters before any
        // sample is produced.
        let smoothed = self.controls.ingest(&frame.pots);
        self.params = self.mapper.map(&smoothed);

        self.lfo_bank.set_rate(self.params.lfo_rate_hz);
        self.lfo_bank.set_depth(self.params.lfo_depth);
        self.post
            .set_reverb_params(self.params.reverb_mix, self.params.reverb_feedback);

        if self.params.retune {
            self.retune();
        }
        self.apply_block_params();

        // Sample rate.
        for stereo_pair in out.chunks_exact_mut(2) {
            let events = self.triggers.scan(&frame.keys);
            let modulation = self.lfo_bank.next();

            let mut sum = 0.0f32;
            for voice_id in VoiceId::all() {
                let v = voice_id.index();
                if events[v] {
                    self.activity.mark(voice_id);
                }

                let voice = &mut self.voices[v];
                voice.set_frequency(self.base_frequency[v] * modulation.pitch_ratio);
                voice.set_brightness(
                    (self.base_brightness[v] + modulation.brightness_offset)
                        .clamp(BRIGHTNESS_CLAMP.0, BRIGHTNESS_CLAMP.1),
                );
                sum += voice.process(events[v]);
            }

            sum *= modulation.amp_scale;
            let sample = self.post.process(sum);
            stereo_pair[0] = sample;
            stereo_pair[1] = sample;

            self.activity.tick();
        }
    }

    /// Produce the display snapshot. Cheap; safe to call at any rate.
    pub fn snapshot(&self) -> DisplaySnapshot {
        let tuning = self.tuning();
        DisplaySnapshot {
            scale_name: tuning.name,
            note_names: tuning.note_names,
            octave_ratio: OCTAVE_RATIOS[self.params.octave_index],
            active_mask: self.activity.active_mask(),
            led: self.activity.led_on(),
            autonomous: self.triggers.autonomous_active(),
            params: self.params,
        }
    }

    /// Silence every voice and clear post-chain state, keeping
    /// parameters and tuning.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.post.reset();
    }

    // Push the selected tuning and octave to every voice. All voices are
    // updated before the next sample is produced, so a scale change can
    // never mix old and new pitches.
    fn retune(&mut self) {
        let tuning = &TUNINGS[self.params.scale_index];
        let ratio = OCTAVE_RATIOS[self.params.octave_index];
        for voice_id in VoiceId::all() {
            let v = voice_id.index();
            self.base_frequency[v] = tuning.frequency(voice_id) * ratio;
            self.voices[v].set_frequency(self.base_frequency[v]);
        }
    }

    // Apply the global multipliers to per-voice base tables, clamped to
    // the stability ranges.
    fn apply_block_params(&mut self) {
        let tuning = &TUNINGS[self.params.scale_index];
        for voice_id in VoiceId::all() {
            let v = voice_id.index();
            let damping = (tuning.damping(voice_id) * self.params.decay_scale)
                .clamp(DAMPING_CLAMP.0, DAMPING_CLAMP.1);
            self.voices[v].set_damping(damping);
            self.base_brightness[v] = (tuning.brightness(voice_id)
                * self.params.brightness_scale)
                .clamp(BRIGHTNESS_CLAMP.0, BRIGHTNESS_CLAMP.1);
        }
    }
}

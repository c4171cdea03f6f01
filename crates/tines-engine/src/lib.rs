//! Tines Engine - polyphonic Karplus-Strong kalimba synthesis
//!
//! A bank of seven plucked-string voices driven by trigger events,
//! modulated by an LFO bank, shaped by per-voice and global tone
//! controls, and mixed through a post chain (DC removal, reverb, soft
//! saturation) into a continuous stereo stream.
//!
//! # Architecture
//!
//! All state lives inside a single [`Engine`] constructed from an
//! [`EngineConfig`]. One call to [`Engine::process_block`] consumes a
//! [`ControlFrame`] (raw pots + key levels) and fills an interleaved
//! stereo buffer. Per block, control smoothing and parameter mapping run
//! first; then the sample loop polls triggers, advances the LFO bank,
//! runs the voices, and applies the post chain.
//!
//! ```text
//! ControlFrame ──→ ControlBank ──→ ParameterMapper ──┐   (block rate)
//! ───────────────────────────────────────────────────┼──────────────
//! keys ──→ TriggerBank ──┐                           │  (sample rate)
//!                        ▼                           ▼
//!          LfoBank ──→ KarplusString × 7 ──→ mix ──→ PostChain ──→ out
//! ```
//!
//! # Real-time guarantees
//!
//! `process_block` never allocates, locks, or performs I/O; all buffers
//! are sized at construction. Parameter-range violations are clamped at
//! the point of use (real-time audio cannot throw), and stability-
//! sensitive values (damping, feedback) are clamped to ranges that keep
//! every feedback loop convergent.
//!
//! # no_std
//!
//! `no_std` compatible with the default `std` feature disabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod activity;
pub mod config;
pub mod engine;
pub mod mapper;
pub mod modulation;
pub mod post;
pub mod string;
pub mod trigger;
pub mod tuning;

pub use activity::ActivityTracker;
pub use config::{ConfigError, EngineConfig};
pub use engine::{ControlFrame, DisplaySnapshot, Engine};
pub use mapper::{
    BRIGHTNESS_CLAMP, ControlBank, ControlId, DAMPING_CLAMP, MappedParams, NUM_CONTROLS,
    ParameterMapper, map_discrete, map_exponential, map_linear,
};
pub use modulation::{LfoBank, ModFrame, ModSet};
pub use post::{PostChain, Reverb, SoftSaturator};
pub use string::{KarplusString, MIN_FREQUENCY_HZ};
pub use trigger::{AutoPluck, TriggerBank, TriggerEvents};
pub use tuning::{NUM_VOICES, OCTAVE_RATIOS, OCTAVE_UNISON, TUNINGS, Tuning, VoiceId};

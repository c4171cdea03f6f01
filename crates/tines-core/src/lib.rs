//! Tines Core - DSP primitives for plucked-string synthesis
//!
//! Foundational building blocks for the tines engine, designed for
//! real-time audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Smoothing
//!
//! - [`SmoothedParam`] - One-pole exponential smoothing for zipper-free
//!   control changes
//!
//! ## Filters
//!
//! - [`OnePole`] - Single-pole lowpass for brightness damping and tone shaping
//! - [`DcBlocker`] - First-order highpass for DC offset removal
//! - [`CombFilter`] - Feedback comb with damping for reverb algorithms
//! - [`AllpassFilter`] - Schroeder allpass for reverb diffusion
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Integer-tap ring buffer (the string's pitch period store)
//!
//! ## Modulation
//!
//! - [`Lfo`] - Low-frequency oscillator (sine, triangle, sawtooth)
//!
//! ## Utilities
//!
//! - [`soft_saturate`], [`flush_denormal`], [`lerp`]
//! - [`Effect`] - object-safe trait for post-chain stages
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tines-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations in processing paths
//! - **No dependencies on std**: pure `no_std` with `libm` for math
//! - **Defensive clamping**: stability-sensitive parameters are clamped at
//!   the point of use, never propagated as errors

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod dc_blocker;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use dc_blocker::DcBlocker;
pub use delay::DelayLine;
pub use effect::Effect;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{flush_denormal, lerp, soft_saturate};
pub use one_pole::OnePole;
pub use param::SmoothedParam;

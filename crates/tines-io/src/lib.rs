//! Audio I/O layer for the tines synthesizer.
//!
//! This crate provides:
//!
//! - **WAV rendering**: [`write_wav_stereo`] for offline output
//! - **Real-time streaming**: [`run_output_stream`] wires an engine into
//!   a cpal output stream
//! - **Shared controls**: [`SharedControls`], the lock-free scalar
//!   channel between the slow control loop and the audio callback
//!
//! The audio callback owns the engine exclusively; everything crossing
//! the thread boundary is a plain atomic scalar. No locks are ever taken
//! on the audio thread.

mod shared;
mod stream;
mod wav;

pub use shared::SharedControls;
pub use stream::{OutputDevice, StreamHandle, default_output_device, list_output_devices, run_output_stream};
pub use wav::{read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Real-time output streaming via cpal.
//!
//! [`run_output_stream`] moves an [`Engine`] into a cpal output callback
//! and wires it to a [`SharedControls`] instance. The callback pulls a
//! control frame at the top of each buffer, renders in engine-sized
//! blocks, and publishes the display snapshot on the way out. The engine
//! is owned exclusively by the callback; nothing else can touch it.

use crate::{Error, Result, SharedControls};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;
use tines_engine::Engine;

/// A selectable audio output device.
#[derive(Debug, Clone)]
pub struct OutputDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the system default output.
    pub is_default: bool,
}

/// Keeps a cpal stream alive. Audio stops when this is dropped.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

/// List available output devices.
pub fn list_output_devices() -> Result<Vec<OutputDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| d.name().ok());

    let devices = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;

    Ok(devices
        .filter_map(|device| device.name().ok())
        .map(|name| OutputDevice {
            is_default: Some(&name) == default_name.as_ref(),
            name,
        })
        .collect())
}

/// Name of the system default output device.
pub fn default_output_device() -> Result<Option<String>> {
    let host = cpal::default_host();
    Ok(host.default_output_device().and_then(|d| d.name().ok()))
}

fn find_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    match name {
        Some(search) => {
            let search_lower = search.to_lowercase();
            let devices = host
                .output_devices()
                .map_err(|e| Error::Stream(e.to_string()))?;
            for device in devices {
                if let Ok(dev_name) = device.name()
                    && dev_name.to_lowercase().contains(&search_lower)
                {
                    return Ok(device);
                }
            }
            Err(Error::DeviceNotFound(search.to_string()))
        }
        None => host.default_output_device().ok_or(Error::NoDevice),
    }
}

/// Start rendering an engine to an output device.
///
/// The stream runs until the returned [`StreamHandle`] is dropped. The
/// engine's configured sample rate and block size are used for the
/// stream; the device must accept the rate.
///
/// # Arguments
/// * `engine` - The synthesizer; moved into the audio callback
/// * `shared` - Control/display channel shared with the slow loop
/// * `device_name` - Substring match against device names, or `None`
///   for the system default
pub fn run_output_stream(
    mut engine: Engine,
    shared: Arc<SharedControls>,
    device_name: Option<&str>,
) -> Result<StreamHandle> {
    let device = find_device(device_name)?;
    let sample_rate = engine.sample_rate() as u32;
    let block = engine.block_size();

    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let callback_shared = Arc::clone(&shared);
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frame = callback_shared.control_frame();
                for chunk in data.chunks_mut(block * 2) {
                    engine.process_block(&frame, chunk);
                }
                callback_shared.publish(&engine.snapshot());
            },
            |err| {
                tracing::error!(error = %err, "output stream error");
            },
            None,
        )
        .map_err(|e| Error::Stream(e.to_string()))?;

    stream.play().map_err(|e| Error::Stream(e.to_string()))?;
    tracing::info!(
        device = device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate,
        block,
        "output stream started"
    );

    Ok(StreamHandle { _stream: stream })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_listing_does_not_panic() {
        // Device availability depends on the system; only the call
        // contract is verified here.
        let result = list_output_devices();
        assert!(result.is_ok() || matches!(result, Err(Error::Stream(_))));
    }

    #[test]
    fn missing_device_is_reported_by_name() {
        let err = find_device(Some("no-such-device-exists-here")).err().unwrap();
        match err {
            Error::DeviceNotFound(name) => assert!(name.contains("no-such-device")),
            Error::NoDevice | Error::Stream(_) => {} // headless CI
            other => panic!("unexpected error: {other}"),
        }
    }
}

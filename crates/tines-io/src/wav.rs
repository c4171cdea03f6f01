//! WAV file output for offline rendering.
//!
//! 16-bit PCM stereo via [hound](https://crates.io/crates/hound). The
//! read half exists for tests and A/B listening of rendered output.

use crate::Result;
use std::path::Path;

/// Write interleaved stereo samples to a 16-bit PCM WAV file.
///
/// Samples are clamped to [-1, 1] before conversion, so an upstream
/// overshoot cannot wrap the integer encoding.
pub fn write_wav_stereo(
    path: impl AsRef<Path>,
    interleaved: &[f32],
    sample_rate: u32,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for &sample in interleaved {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    tracing::info!(
        path = %path.as_ref().display(),
        frames = interleaved.len() / 2,
        sample_rate,
        "wrote WAV file"
    );
    Ok(())
}

/// Read a stereo WAV file back as interleaved f32 samples.
///
/// Returns `(samples, sample_rate)`.
pub fn read_wav_stereo(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
    };

    Ok((samples, spec.sample_rate))
}

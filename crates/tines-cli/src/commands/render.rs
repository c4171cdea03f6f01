//! Offline rendering command.
//!
//! Runs the engine block-by-block with a scheduled pluck pattern and
//! writes the result to a 16-bit stereo WAV file. The same engine code
//! path as real-time playback — only the clock differs.

use crate::commands::index_to_pot;
use crate::settings;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tines_engine::{ControlFrame, ControlId, Engine, NUM_VOICES, OCTAVE_RATIOS, TUNINGS};
use tines_io::write_wav_stereo;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Length of the rendered file in seconds
    #[arg(long, default_value = "8.0")]
    duration: f32,

    /// Settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Tuning index (see `tines scales`)
    #[arg(long)]
    scale: Option<usize>,

    /// Octave index: 0 = down, 1 = unison, 2 = up
    #[arg(long)]
    octave: Option<usize>,

    /// Voice slots to pluck, in order (comma-separated)
    #[arg(long, default_value = "0,2,4,1,3,6,5")]
    pattern: String,

    /// Seconds between plucks
    #[arg(long, default_value = "0.5")]
    interval: f32,

    /// Global brightness, 0-1
    #[arg(long, default_value = "0.5")]
    brightness: f32,

    /// Global decay/sustain, 0-1
    #[arg(long, default_value = "0.7")]
    decay: f32,

    /// Reverb dry/wet mix, 0-1
    #[arg(long, default_value = "0.3")]
    reverb_mix: f32,

    /// Reverb size, 0-1
    #[arg(long, default_value = "0.6")]
    reverb_size: f32,

    /// LFO rate control, 0-1 (exponential 0.1-20 Hz)
    #[arg(long, default_value = "0.5")]
    lfo_rate: f32,

    /// LFO depth, 0-1
    #[arg(long, default_value = "0.0")]
    lfo_depth: f32,
}

fn parse_pattern(text: &str) -> anyhow::Result<Vec<usize>> {
    let voices: Vec<usize> = text
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<_, _>>()
        .context("pattern must be comma-separated voice indices")?;
    anyhow::ensure!(!voices.is_empty(), "pattern must name at least one voice");
    for &v in &voices {
        anyhow::ensure!(v < NUM_VOICES, "voice index {v} past the last voice");
    }
    Ok(voices)
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = settings::load_config(args.settings.as_deref())?;
    if let Some(scale) = args.scale {
        config.scale_index = scale;
    }
    if let Some(octave) = args.octave {
        config.octave_index = octave;
    }
    // The render clock drives the plucks; the sequencer would add its own
    config.auto_pluck = false;
    config.validate()?;

    anyhow::ensure!(args.duration > 0.0, "duration must be positive");
    anyhow::ensure!(args.interval > 0.0, "interval must be positive");
    let pattern = parse_pattern(&args.pattern)?;

    let mut engine = Engine::new(&config)?;
    let sample_rate = engine.sample_rate();
    let block_size = engine.block_size();

    let mut frame = ControlFrame::default();
    frame.pots[ControlId::Brightness.index()] = args.brightness;
    frame.pots[ControlId::Decay.index()] = args.decay;
    frame.pots[ControlId::ReverbMix.index()] = args.reverb_mix;
    frame.pots[ControlId::ReverbSize.index()] = args.reverb_size;
    frame.pots[ControlId::LfoRate.index()] = args.lfo_rate;
    frame.pots[ControlId::LfoDepth.index()] = args.lfo_depth;
    frame.pots[ControlId::Scale.index()] = index_to_pot(config.scale_index, TUNINGS.len());
    frame.pots[ControlId::Octave.index()] = index_to_pot(config.octave_index, OCTAVE_RATIOS.len());

    let total_samples = (args.duration * sample_rate) as usize;
    let interval_samples = (args.interval * sample_rate) as usize;
    let press_samples = (0.02 * sample_rate) as usize; // 20 ms key-down

    let mut rendered = Vec::with_capacity(total_samples * 2);
    let mut block = vec![0.0f32; block_size * 2];

    let mut step = 0usize;
    let mut press_voice = pattern[0];
    let mut press_until = 0usize;
    let mut next_pluck = 0usize;

    let mut t = 0usize;
    while t < total_samples {
        if t >= next_pluck {
            press_voice = pattern[step % pattern.len()];
            press_until = t + press_samples;
            next_pluck += interval_samples;
            step += 1;
        }
        frame.keys = [false; NUM_VOICES];
        if t < press_until {
            frame.keys[press_voice] = true;
        }

        engine.process_block(&frame, &mut block);
        rendered.extend_from_slice(&block);
        t += block_size;
    }

    write_wav_stereo(&args.output, &rendered, sample_rate as u32)?;
    println!(
        "rendered {:.1}s ({} plucks, '{}') to {}",
        args.duration,
        step,
        TUNINGS[config.scale_index].name,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_parses_valid_lists() {
        assert_eq!(parse_pattern("0,1,2").unwrap(), vec![0, 1, 2]);
        assert_eq!(parse_pattern(" 6 , 0 ").unwrap(), vec![6, 0]);
    }

    #[test]
    fn pattern_rejects_bad_input() {
        assert!(parse_pattern("").is_err());
        assert!(parse_pattern("a,b").is_err());
        assert!(parse_pattern("0,7").is_err()); // past the last voice
    }
}

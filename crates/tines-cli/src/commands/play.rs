//! Real-time playback command.
//!
//! Builds an engine, hands it to a cpal output stream, and runs the slow
//! loop: pot values come from the command line, the status line is
//! redrawn from the engine's published snapshot at ~10 Hz, and Ctrl-C
//! stops the session. Without hardware keys attached, the auto-pluck
//! sequencer carries the performance.

use crate::commands::index_to_pot;
use crate::settings;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tines_engine::{ControlId, Engine, OCTAVE_RATIOS, TUNINGS, VoiceId};
use tines_io::SharedControls;

#[derive(Args)]
pub struct PlayArgs {
    /// Output device name (substring match); system default if omitted
    #[arg(long)]
    device: Option<String>,

    /// Settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Tuning index (see `tines scales`)
    #[arg(long)]
    scale: Option<usize>,

    /// Octave index: 0 = down, 1 = unison, 2 = up
    #[arg(long)]
    octave: Option<usize>,

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

    /// Stop after this many seconds; run until Ctrl-C if omitted
    #[arg(long)]
    duration: Option<f32>,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let mut config = settings::load_config(args.settings.as_deref())?;
    if let Some(scale) = args.scale {
        config.scale_index = scale;
    }
    if let Some(octave) = args.octave {
        config.octave_index = octave;
    }
    config.validate()?;

    let engine = Engine::new(&config)?;
    let shared = Arc::new(SharedControls::new());

    // Seed the pots so the engine's first block already sees the
    // requested values (the first ingest snaps, no settling sweep).
    shared.set_pot(ControlId::Brightness.index(), args.brightness);
    shared.set_pot(ControlId::Decay.index(), args.decay);
    shared.set_pot(ControlId::ReverbMix.index(), args.reverb_mix);
    shared.set_pot(ControlId::ReverbSize.index(), args.reverb_size);
    shared.set_pot(ControlId::LfoRate.index(), args.lfo_rate);
    shared.set_pot(ControlId::LfoDepth.index(), args.lfo_depth);
    shared.set_pot(
        ControlId::Scale.index(),
        index_to_pot(config.scale_index, TUNINGS.len()),
    );
    shared.set_pot(
        ControlId::Octave.index(),
        index_to_pot(config.octave_index, OCTAVE_RATIOS.len()),
    );

    let ctrlc_shared = Arc::clone(&shared);
    ctrlc::set_handler(move || ctrlc_shared.stop())?;

    let _stream = tines_io::run_output_stream(engine, Arc::clone(&shared), args.device.as_deref())?;

    println!(
        "playing '{}' — Ctrl-C to stop",
        TUNINGS[config.scale_index].name
    );

    let started = Instant::now();
    while shared.is_running() {
        if let Some(limit) = args.duration
            && started.elapsed().as_secs_f32() >= limit
        {
            break;
        }
        draw_status(&shared);
        std::thread::sleep(Duration::from_millis(100));
    }
    println!();
    Ok(())
}

/// Redraw the one-line status display from the published snapshot.
fn draw_status(shared: &SharedControls) {
    let tuning = &TUNINGS[shared.scale_index().min(TUNINGS.len() - 1)];
    let octave = OCTAVE_RATIOS[shared.octave_index().min(OCTAVE_RATIOS.len() - 1)];
    let mask = shared.active_mask();

    let mut playing = String::new();
    for voice in VoiceId::all() {
        if mask & (1 << voice.index()) != 0 {
            if !playing.is_empty() {
                playing.push(' ');
            }
            playing.push_str(tuning.note_name(voice));
        }
    }
    if playing.is_empty() {
        playing.push_str("---");
    }

    let led = if shared.led() { "*" } else { " " };
    let mode = if shared.autonomous() { "auto" } else { "keys" };
    print!(
        "\r[{led}] {:<20} oct x{octave:<3} {mode}  playing: {playing:<24}",
        tuning.name
    );
    let _ = std::io::stdout().flush();
}

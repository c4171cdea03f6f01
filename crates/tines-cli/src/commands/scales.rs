//! Tuning listing command.

use clap::Args;
use tines_engine::{TUNINGS, VoiceId};

#[derive(Args)]
pub struct ScalesArgs {
    /// Also print per-voice damping and brightness tables
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: ScalesArgs) -> anyhow::Result<()> {
    for (index, tuning) in TUNINGS.iter().enumerate() {
        println!("{index}  {}", tuning.name);
        for voice in VoiceId::all() {
            if args.verbose {
                println!(
                    "     {:<3} {:>8.2} Hz   damping {:.2}   brightness {:.2}",
                    tuning.note_name(voice),
                    tuning.frequency(voice),
                    tuning.damping(voice),
                    tuning.brightness(voice),
                );
            } else {
                println!(
                    "     {:<3} {:>8.2} Hz",
                    tuning.note_name(voice),
                    tuning.frequency(voice),
                );
            }
        }
    }
    Ok(())
}

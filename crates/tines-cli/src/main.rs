//! Tines CLI - play and render the kalimba synthesizer.

mod commands;
mod settings;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tines")]
#[command(author, version, about = "Polyphonic Karplus-Strong kalimba synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in real time through an audio device
    Play(commands::play::PlayArgs),

    /// Render a pluck sequence to a WAV file
    Render(commands::render::RenderArgs),

    /// List the available tunings
    Scales(commands::scales::ScalesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Scales(args) => commands::scales::run(args),
    }
}

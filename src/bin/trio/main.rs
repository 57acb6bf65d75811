//! trio - three-oscillator terminal synthesizer
//!
//! Run with: cargo run --bin trio
//! Play with the home row (s d f g h j k l) and the keys above it
//! (e r y u i). Logs go to a file so they stay out of the TUI.

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use trio_synth::{EngineConfig, BLOCK_SIZE, SAMPLE_RATE};

use app::Synth;

#[derive(Debug, Parser)]
#[command(name = "trio", version, about = "Three-oscillator terminal synthesizer")]
struct Cli {
    /// Output sample rate in Hz
    #[arg(long, default_value_t = SAMPLE_RATE)]
    sample_rate: u32,

    /// Frames rendered per block
    #[arg(long, default_value_t = BLOCK_SIZE)]
    block_size: usize,

    /// Starting octave, -2 to 1
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    octave: i8,

    /// Where to write logs (filter with RUST_LOG)
    #[arg(long, default_value = "trio.log")]
    log_file: PathBuf,

    /// Hold an A4 for this many seconds without the TUI, then exit
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f32>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;
    tracing::info!(?cli, "starting trio");

    let config = EngineConfig::new(cli.sample_rate, cli.block_size);
    let synth = Synth::start(config, cli.octave)?;

    match cli.headless {
        Some(seconds) => app::run_headless(synth, seconds),
        None => ui::run(synth),
    }
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

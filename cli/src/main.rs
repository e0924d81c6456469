use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use concentration_core::{MatchController, RandomDeckGenerator};

mod config;
mod render;
mod session;

/// Memory matching game for the terminal: flip two cards per turn and find every pair.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file with `faces` and `flip_delay_ms`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the card order, random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// How long a revealed pair stays face up, overrides the config file
    #[arg(long)]
    flip_delay_ms: Option<u64>,

    /// Cards per row
    #[arg(long, default_value_t = render::DEFAULT_COLUMNS, value_parser = clap::value_parser!(u16).range(1..))]
    columns: u16,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let mut config = config::load(args.config.as_deref())?;
    if let Some(delay) = args.flip_delay_ms {
        config.flip_delay_ms = delay;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Starting a game of {} pairs with seed {}",
        config.pair_count(),
        seed
    );

    let mut controller = MatchController::from_config(&config, RandomDeckGenerator::new(seed));
    let mut clock = session::MonotonicClock::start();
    let input = session::read_stamped(io::BufReader::new(io::stdin()), clock);
    session::run(
        &mut controller,
        usize::from(args.columns),
        input,
        &mut io::stdout().lock(),
        &mut clock,
    )
}

mod clock;
mod config;
mod error;
mod food;
mod game;
mod grid;
mod input;
mod snake;
mod term;

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clock::FrameClock;
use config::{Args, GameConfig};
use error::GameError;
use game::Session;
use input::{translate, Command};
use term::{guarded, TermEvents, TermManager};

/// Board position as (column, row).
pub type Cell = (u16, u16);

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = GameConfig::from_args(&args).context("invalid game configuration")?;
    info!(seed = ?config.seed, "Configuration loaded");

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(&config, rng).context("failed to start a session")?;

    let mut term = TermManager::new(config.grid).context("failed to prepare the terminal")?;
    guarded(&mut term, |term| play(term, &mut session)).context("game stopped unexpectedly")
}

fn play(term: &mut TermManager, session: &mut Session<StdRng>) -> Result<(), GameError> {
    let mut events = TermEvents;

    term.show_message(&[
        "Arrow keys or WASD to move",
        "+ / - to change speed",
        "Esc or Q to quit",
        "",
        "Press any key to begin",
    ])?;

    if translate(&events.read_key_blocking()?) == Some(Command::Quit) {
        return Ok(());
    }

    game::run(session, term, &mut events, &mut FrameClock::new())
}

fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install the tracing subscriber")
}

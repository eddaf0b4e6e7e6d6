//! Selfplay - match runner for the UCT search engine
//!
//! Pits two independent engines against each other on a chosen game,
//! playing a configurable series and reporting a win/draw tally.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

mod central_config;
mod config;
mod driver;

use games_draughts::Draughts;
use games_tictactoe::TicTacToe;

use crate::config::Config;
use crate::driver::run_series;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let mut rng = if config.seed == 0 {
        ChaCha20Rng::from_entropy()
    } else {
        ChaCha20Rng::seed_from_u64(config.seed)
    };

    let search = config.search_config()?;
    info!(
        game = %config.game,
        games = config.games,
        sweeps = search.sweeps_per_move,
        "Starting self-play series"
    );

    let tally = match config.game.as_str() {
        "tictactoe" => run_series(
            TicTacToe::new(),
            config.games,
            &search,
            &mut rng,
            config.max_plies,
            config.show_boards,
        )?,
        "draughts" => run_series(
            Draughts::new(),
            config.games,
            &search,
            &mut rng,
            config.max_plies,
            config.show_boards,
        )?,
        // validate() already rejected anything else
        other => unreachable!("unvalidated game {}", other),
    };

    info!(%tally, "Series finished");
    println!("{}", tally);

    Ok(())
}

//! Configuration for the self-play runner.
//!
//! Configuration is loaded from selfplay.toml with environment variable
//! overrides. CLI arguments take highest priority, followed by env vars,
//! then selfplay.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use mcts::{CommitPolicy, MctsConfig};

use crate::central_config::{load_config, CentralConfig};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_game() -> String {
    CENTRAL_CONFIG.common.game.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_sweeps() -> u32 {
    CENTRAL_CONFIG.search.sweeps_per_move
}

fn default_exploration_constant() -> f64 {
    CENTRAL_CONFIG.search.exploration_constant
}

fn default_rollout_ply_cap() -> u32 {
    CENTRAL_CONFIG.search.rollout_ply_cap
}

fn default_commit_policy() -> String {
    CENTRAL_CONFIG.search.commit_policy.clone()
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.matches.games
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.matches.seed
}

fn default_max_plies() -> u32 {
    CENTRAL_CONFIG.matches.max_plies
}

fn default_show_boards() -> bool {
    CENTRAL_CONFIG.matches.show_boards
}

#[derive(Parser, Debug, Clone)]
#[command(name = "selfplay")]
#[command(about = "Self-play match runner for the UCT search engine")]
#[command(
    long_about = "Pits two independent UCT engines against each other on a chosen
game and reports the results.

Configuration is loaded from selfplay.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Game to play (tictactoe or draughts)
    #[arg(long, default_value_t = default_game())]
    pub game: String,

    /// Number of games in the series
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Search sweeps each engine runs per move
    #[arg(long, default_value_t = default_sweeps())]
    pub sweeps: u32,

    /// Exploration constant Cp in the UCT formula
    #[arg(long, default_value_t = default_exploration_constant())]
    pub exploration_constant: f64,

    /// Hard cap on random-rollout length, in plies
    #[arg(long, default_value_t = default_rollout_ply_cap())]
    pub rollout_ply_cap: u32,

    /// Move-commitment policy (highest-uct or highest-reward)
    #[arg(long, default_value_t = default_commit_policy())]
    pub commit_policy: String,

    /// RNG seed; 0 draws a fresh seed from the operating system
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Abandon a game that runs longer than this many plies
    #[arg(long, default_value_t = default_max_plies())]
    pub max_plies: u32,

    /// Print the board after every move
    #[arg(long, default_value_t = default_show_boards())]
    pub show_boards: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.game.as_str(), "tictactoe" | "draughts") {
            return Err(anyhow!(
                "unknown game '{}', expected tictactoe or draughts",
                self.game
            ));
        }

        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        // One sweep only visits the root; expansion needs a second.
        if self.sweeps < 2 {
            return Err(anyhow!("sweeps must be at least 2"));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(anyhow!("exploration_constant must be finite and non-negative"));
        }

        if self.rollout_ply_cap == 0 {
            return Err(anyhow!("rollout_ply_cap must be greater than 0"));
        }

        if self.max_plies == 0 {
            return Err(anyhow!("max_plies must be greater than 0"));
        }

        self.parse_commit_policy()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    fn parse_commit_policy(&self) -> Result<CommitPolicy> {
        match self.commit_policy.as_str() {
            "highest-uct" => Ok(CommitPolicy::HighestUct),
            "highest-reward" => Ok(CommitPolicy::HighestReward),
            other => Err(anyhow!(
                "invalid commit policy '{}', expected highest-uct or highest-reward",
                other
            )),
        }
    }

    /// The search configuration both engines play with.
    pub fn search_config(&self) -> Result<MctsConfig> {
        Ok(MctsConfig::default()
            .with_sweeps(self.sweeps)
            .with_exploration_constant(self.exploration_constant)
            .with_rollout_ply_cap(self.rollout_ply_cap)
            .with_commit_policy(self.parse_commit_policy()?))
    }
}

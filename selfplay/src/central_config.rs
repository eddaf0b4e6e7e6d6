//! Centralized configuration loading from selfplay.toml.
//!
//! This module provides a single source of truth for configuration values,
//! loaded from a TOML file with support for environment variable overrides.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod defaults {
    pub const LOG_LEVEL: &str = "info";
    pub const GAME: &str = "tictactoe";
    pub const SWEEPS_PER_MOVE: u32 = 1000;
    pub const EXPLORATION_CONSTANT: f64 = 0.707;
    pub const ROLLOUT_PLY_CAP: u32 = 1000;
    pub const COMMIT_POLICY: &str = "highest-uct";
    pub const GAMES: u32 = 1;
    pub const SEED: u64 = 0;
    pub const MAX_PLIES: u32 = 500;
    pub const SHOW_BOARDS: bool = false;
}

/// Root configuration structure matching selfplay.toml
#[derive(Debug, Deserialize, Default)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default, rename = "match")]
    pub matches: MatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    pub log_level: String,
    pub game: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.into(),
            game: defaults::GAME.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub sweeps_per_move: u32,
    pub exploration_constant: f64,
    pub rollout_ply_cap: u32,
    pub commit_policy: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sweeps_per_move: defaults::SWEEPS_PER_MOVE,
            exploration_constant: defaults::EXPLORATION_CONSTANT,
            rollout_ply_cap: defaults::ROLLOUT_PLY_CAP,
            commit_policy: defaults::COMMIT_POLICY.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub games: u32,
    /// Seed for the shared random number generator; `0` draws a fresh seed
    /// from the operating system.
    pub seed: u64,
    pub max_plies: u32,
    pub show_boards: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: defaults::GAMES,
            seed: defaults::SEED,
            max_plies: defaults::MAX_PLIES,
            show_boards: defaults::SHOW_BOARDS,
        }
    }
}

/// Standard locations to search for selfplay.toml
const CONFIG_SEARCH_PATHS: &[&str] = &["selfplay.toml", "config.toml", "../selfplay.toml"];

/// Load the central configuration from selfplay.toml.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("SELFPLAY_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from SELFPLAY_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "SELFPLAY_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No selfplay.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

fn load_from_path(path: &PathBuf) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "SELFPLAY_COMMON_LOG_LEVEL");
    env_override!(config, common.game, "SELFPLAY_COMMON_GAME");

    // Search
    env_override!(
        config,
        search.sweeps_per_move,
        "SELFPLAY_SEARCH_SWEEPS_PER_MOVE",
        parse
    );
    env_override!(
        config,
        search.exploration_constant,
        "SELFPLAY_SEARCH_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        search.rollout_ply_cap,
        "SELFPLAY_SEARCH_ROLLOUT_PLY_CAP",
        parse
    );
    env_override!(
        config,
        search.commit_policy,
        "SELFPLAY_SEARCH_COMMIT_POLICY"
    );

    // Match
    env_override!(config, matches.games, "SELFPLAY_MATCH_GAMES", parse);
    env_override!(config, matches.seed, "SELFPLAY_MATCH_SEED", parse);
    env_override!(config, matches.max_plies, "SELFPLAY_MATCH_MAX_PLIES", parse);
    env_override!(
        config,
        matches.show_boards,
        "SELFPLAY_MATCH_SHOW_BOARDS",
        parse
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CentralConfig::default();
        assert_eq!(config.common.game, "tictactoe");
        assert_eq!(config.common.log_level, "info");
        assert_eq!(config.search.sweeps_per_move, 1000);
        assert_eq!(config.search.commit_policy, "highest-uct");
        assert_eq!(config.matches.games, 1);
        assert_eq!(config.matches.seed, 0);
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("SELFPLAY_COMMON_GAME", "draughts");
        std::env::set_var("SELFPLAY_MATCH_GAMES", "7");
        std::env::set_var("SELFPLAY_SEARCH_EXPLORATION_CONSTANT", "0.5");

        let config = apply_env_overrides(CentralConfig::default());
        assert_eq!(config.common.game, "draughts");
        assert_eq!(config.matches.games, 7);
        assert!((config.search.exploration_constant - 0.5).abs() < f64::EPSILON);

        std::env::remove_var("SELFPLAY_COMMON_GAME");
        std::env::remove_var("SELFPLAY_MATCH_GAMES");
        std::env::remove_var("SELFPLAY_SEARCH_EXPLORATION_CONSTANT");
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[common]
game = "draughts"
log_level = "debug"

[match]
games = 20
seed = 42
"#;
        let config: CentralConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.common.game, "draughts");
        assert_eq!(config.common.log_level, "debug");
        assert_eq!(config.matches.games, 20);
        assert_eq!(config.matches.seed, 42);
    }

    #[test]
    fn test_partial_config() {
        let toml_content = r#"
[search]
sweeps_per_move = 250
"#;
        let config: CentralConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.search.sweeps_per_move, 250);
        assert_eq!(config.search.rollout_ply_cap, 1000);
        assert_eq!(config.common.game, "tictactoe");
    }
}

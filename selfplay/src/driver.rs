//! Match driver: two independent engines playing one game against each other.
//!
//! Each engine owns its tree for the whole game. The engine on the move runs
//! its sweeps and commits; the opponent is told the committed state through
//! [`Mcts::play_move`] so it keeps the matching subtree. If the opponent's
//! tree was never expanded along that branch, it is rebuilt fresh at the new
//! state.

use std::fmt;

use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use mcts::{Mcts, MctsConfig, SearchError};
use search_core::{GameState, Outcome, Player};

/// Result of one finished (or abandoned) game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub plies: u32,
}

/// Win/draw tally over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesTally {
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    pub draws: u32,
    pub abandoned: u32,
}

impl SeriesTally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won(Player::One) => self.player_one_wins += 1,
            Outcome::Won(Player::Two) => self.player_two_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => self.abandoned += 1,
        }
    }
}

impl fmt::Display for SeriesTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player one {} / player two {} / draws {} / abandoned {}",
            self.player_one_wins, self.player_two_wins, self.draws, self.abandoned
        )
    }
}

/// Play a single game from `start` between two fresh engines.
///
/// Returns `Outcome::Ongoing` in the result if the game was abandoned at
/// `max_plies`.
pub fn run_match<S>(
    start: S,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
    max_plies: u32,
    show_boards: bool,
) -> Result<MatchResult, SearchError>
where
    S: GameState + fmt::Display,
{
    let mut engines = [
        Mcts::new(start.clone(), config.clone()),
        Mcts::new(start.clone(), config.clone()),
    ];
    let mut state = start;
    let mut mover = 0usize;
    let mut plies = 0u32;

    while state.outcome() == Outcome::Ongoing && plies < max_plies {
        engines[mover].run(rng)?;
        state = engines[mover].play_best_move()?;
        plies += 1;

        if show_boards {
            info!(ply = plies, "board after {}:\n{}", state.player().opponent(), state);
        }

        let other = 1 - mover;
        match engines[other].play_move(&state) {
            Ok(()) => {}
            Err(SearchError::NoMatchingChild) => {
                // The opponent never expanded this branch; start it over.
                debug!(ply = plies, "opponent tree missed the move, rebuilding");
                engines[other] = Mcts::new(state.clone(), config.clone());
            }
            Err(e) => return Err(e),
        }
        mover = other;
    }

    let outcome = state.outcome();
    if outcome == Outcome::Ongoing {
        warn!(plies, "game abandoned at the ply limit");
    }

    Ok(MatchResult { outcome, plies })
}

/// Play a series of games and tally the results.
pub fn run_series<S>(
    start: S,
    games: u32,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
    max_plies: u32,
    show_boards: bool,
) -> Result<SeriesTally, SearchError>
where
    S: GameState + fmt::Display,
{
    let mut tally = SeriesTally::default();

    for game in 1..=games {
        let result = run_match(start.clone(), config, rng, max_plies, show_boards)?;
        match result.outcome {
            Outcome::Won(player) => {
                info!(game, plies = result.plies, "{} won", player);
            }
            Outcome::Draw => info!(game, plies = result.plies, "draw"),
            Outcome::Ongoing => info!(game, plies = result.plies, "abandoned"),
        }
        tally.record(result.outcome);
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::TicTacToe;
    use rand::SeedableRng;

    fn config() -> MctsConfig {
        MctsConfig::for_testing().with_commit_policy(mcts::CommitPolicy::HighestReward)
    }

    #[test]
    fn test_match_finishes_within_board_size() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_match(TicTacToe::new(), &config(), &mut rng, 50, false).unwrap();
        assert_ne!(result.outcome, Outcome::Ongoing);
        assert!(result.plies <= 9);
    }

    #[test]
    fn test_ply_limit_abandons_game() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_match(TicTacToe::new(), &config(), &mut rng, 3, false).unwrap();
        assert_eq!(result.outcome, Outcome::Ongoing);
        assert_eq!(result.plies, 3);
    }

    #[test]
    fn test_series_tally_accounts_for_every_game() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);

        let tally = run_series(TicTacToe::new(), 3, &config(), &mut rng, 50, false).unwrap();
        let total =
            tally.player_one_wins + tally.player_two_wins + tally.draws + tally.abandoned;
        assert_eq!(total, 3);
        assert_eq!(tally.abandoned, 0);
    }

    #[test]
    fn test_tally_records_each_outcome() {
        let mut tally = SeriesTally::default();
        tally.record(Outcome::Won(Player::One));
        tally.record(Outcome::Won(Player::Two));
        tally.record(Outcome::Draw);
        tally.record(Outcome::Ongoing);

        assert_eq!(tally.player_one_wins, 1);
        assert_eq!(tally.player_two_wins, 1);
        assert_eq!(tally.draws, 1);
        assert_eq!(tally.abandoned, 1);
    }
}

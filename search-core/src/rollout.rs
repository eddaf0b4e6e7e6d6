//! Random rollout from a game state to a terminal position.

use rand::Rng;
use tracing::trace;

use crate::{GameState, Outcome};

/// Default ceiling on rollout length, in plies.
pub const DEFAULT_PLY_CAP: u32 = 1000;

/// Result of a single random rollout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollout {
    /// Outcome of the last state reached. [`Outcome::Ongoing`] only when the
    /// rollout was capped before termination.
    pub outcome: Outcome,
    /// Number of moves played.
    pub plies: u32,
    /// True if the ply cap was hit before a terminal state.
    pub capped: bool,
}

/// Play uniformly random moves from `state` until the game ends or `ply_cap`
/// moves have been made.
///
/// A capped rollout reports the outcome of the last state reached, which for
/// a non-terminal state is `Ongoing` (reward 0). Hitting the cap points at a
/// rule set that can loop forever (e.g. chess without repetition rules), so
/// the caller is expected to surface it rather than ignore it; see
/// [`Rollout::capped`].
///
/// Intermediate states are dropped as the walk advances; nothing is retained
/// beyond the returned summary.
pub fn rollout<S, R>(state: &S, rng: &mut R, ply_cap: u32) -> Rollout
where
    S: GameState,
    R: Rng,
{
    let mut current = state.clone();
    let mut plies = 0u32;

    loop {
        let mut moves = current.successors();

        if moves.is_empty() {
            trace!(plies, "rollout reached a terminal state");
            return Rollout {
                outcome: current.outcome(),
                plies,
                capped: false,
            };
        }

        if plies >= ply_cap {
            return Rollout {
                outcome: current.outcome(),
                plies,
                capped: true,
            };
        }

        let pick = rng.gen_range(0..moves.len());
        current = moves.swap_remove(pick);
        plies += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Counts down to zero; the player left without a move loses.
    #[derive(Debug, Clone, PartialEq)]
    struct Countdown {
        remaining: u32,
        player: Player,
    }

    impl GameState for Countdown {
        fn player(&self) -> Player {
            self.player
        }

        fn successors(&self) -> Vec<Self> {
            if self.remaining == 0 {
                return Vec::new();
            }
            vec![Countdown {
                remaining: self.remaining - 1,
                player: self.player.opponent(),
            }]
        }
    }

    /// Never terminates: every state has a single successor.
    #[derive(Debug, Clone, PartialEq)]
    struct Endless {
        player: Player,
    }

    impl GameState for Endless {
        fn player(&self) -> Player {
            self.player
        }

        fn successors(&self) -> Vec<Self> {
            vec![Endless {
                player: self.player.opponent(),
            }]
        }
    }

    #[test]
    fn test_rollout_reaches_terminal() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let start = Countdown {
            remaining: 5,
            player: Player::One,
        };

        let result = rollout(&start, &mut rng, 1000);

        assert!(!result.capped);
        assert_eq!(result.plies, 5);
        // Five plies from One leave Two to move with nothing; One wins.
        assert_eq!(result.outcome, Outcome::Won(Player::One));
    }

    #[test]
    fn test_rollout_cap_falls_back_to_last_state() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let start = Endless {
            player: Player::One,
        };

        let result = rollout(&start, &mut rng, 50);

        assert!(result.capped);
        assert_eq!(result.plies, 50);
        assert_eq!(result.outcome, Outcome::Ongoing);
        assert_eq!(result.outcome.reward(), 0.0);
    }

    #[test]
    fn test_rollout_from_terminal_state() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let start = Countdown {
            remaining: 0,
            player: Player::Two,
        };

        let result = rollout(&start, &mut rng, 1000);

        assert!(!result.capped);
        assert_eq!(result.plies, 0);
        assert_eq!(result.outcome, Outcome::Won(Player::One));
    }
}

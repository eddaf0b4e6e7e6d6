//! MCTS configuration parameters.

/// Policy used by [`Mcts::play_best_move`](crate::Mcts::play_best_move) to
/// commit to a move once search is done.
///
/// The classic implementation this engine descends from commits to the child
/// with the highest UCT, which still carries an exploration bonus; most of
/// the MCTS literature recommends committing on raw accumulated reward (or
/// visits) instead. Both are defensible, so the caller picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commit to the child with the highest UCT score.
    HighestUct,
    /// Commit to the child with the highest accumulated reward.
    ///
    /// Raw totals, not means: a child's total scales with its visit count,
    /// so on a side whose totals are all negative this argmax favors the
    /// *least-visited* child. Sound for the side ahead in the game, a
    /// blunder generator for the side behind; prefer
    /// [`CommitPolicy::HighestUct`] unless the totals are known to be
    /// positive.
    HighestReward,
}

/// Configuration for Monte Carlo tree search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of sweeps to run per move decision.
    pub sweeps_per_move: u32,

    /// Exploration constant Cp in the UCT formula. Higher values encourage
    /// exploration, lower values favor exploitation.
    pub exploration_constant: f64,

    /// Hard cap on random-rollout length, in plies.
    pub rollout_ply_cap: u32,

    /// Sign relating a node's reward to its parent's during
    /// backpropagation. `-1.0` for a plain two-player alternating game: each
    /// level up the tree represents the opponent's choice.
    pub opponent_level: f64,

    /// Move-commitment policy for `play_best_move`.
    pub commit_policy: CommitPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            sweeps_per_move: 1000,
            exploration_constant: 0.707,
            rollout_ply_cap: 1000,
            opponent_level: -1.0,
            commit_policy: CommitPolicy::HighestUct,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            sweeps_per_move: 100,
            rollout_ply_cap: 200,
            ..Self::default()
        }
    }

    /// Builder pattern: set sweeps per move.
    pub fn with_sweeps(mut self, n: u32) -> Self {
        self.sweeps_per_move = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration_constant(mut self, cp: f64) -> Self {
        self.exploration_constant = cp;
        self
    }

    /// Builder pattern: set the rollout ply cap.
    pub fn with_rollout_ply_cap(mut self, cap: u32) -> Self {
        self.rollout_ply_cap = cap;
        self
    }

    /// Builder pattern: set the commit policy.
    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.sweeps_per_move, 1000);
        assert!((config.exploration_constant - 0.707).abs() < 1e-9);
        assert_eq!(config.rollout_ply_cap, 1000);
        assert_eq!(config.opponent_level, -1.0);
        assert_eq!(config.commit_policy, CommitPolicy::HighestUct);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_sweeps(50)
            .with_exploration_constant(1.0)
            .with_commit_policy(CommitPolicy::HighestReward);

        assert_eq!(config.sweeps_per_move, 50);
        assert_eq!(config.exploration_constant, 1.0);
        assert_eq!(config.commit_policy, CommitPolicy::HighestReward);
    }
}

//! MCTS search implementation.
//!
//! Implements the classic four-phase sweep:
//! 1. Selection: descend from the root through highest-UCT children to a leaf
//! 2. Expansion: once a leaf has been visited, add a child per legal move
//! 3. Simulation: random rollout from the chosen node to a terminal state
//! 4. Backpropagation: update statistics from the simulated node to the root
//!
//! plus the move-commitment operations that re-root the tree between plies.

use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use search_core::{rollout, GameState};

use crate::config::{CommitPolicy, MctsConfig};
use crate::node::NodeId;
use crate::tree::{SearchTree, TreeError};

/// Errors that can occur during search and move commitment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Tree invariant violation. Continuing to search a tree in this state
    /// is unsafe; callers should treat it as fatal.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// `play_move` was given a state that is not among the root's children.
    /// Recoverable: the tree was simply never expanded along that branch,
    /// and the caller can rebuild from the forced state.
    #[error("no child matches the requested state")]
    NoMatchingChild,
}

/// A Monte Carlo tree search engine over one game.
///
/// Owns its tree for the duration of a game; between plies the tree is
/// re-rooted at the committed move and all other branches are pruned. Two
/// engines playing each other hold fully independent trees.
pub struct Mcts<S: GameState> {
    tree: SearchTree<S>,
    config: MctsConfig,
}

impl<S: GameState> Mcts<S> {
    /// Create an engine rooted at the given state.
    pub fn new(state: S, config: MctsConfig) -> Self {
        Self {
            tree: SearchTree::new(state),
            config,
        }
    }

    /// The search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// The state the engine currently considers the game to be in.
    pub fn root_state(&self) -> &S {
        &self.tree.get(self.tree.root()).state
    }

    /// Run the configured number of sweeps.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        for _ in 0..self.config.sweeps_per_move {
            self.sweep(rng)?;
        }
        Ok(())
    }

    /// One full selection, expansion, simulation, backpropagation pass.
    pub fn sweep(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf = self.selection()?;
        let chosen = self.expansion(leaf, rng)?;

        let result = rollout(
            &self.tree.get(chosen).state,
            rng,
            self.config.rollout_ply_cap,
        );
        if result.capped {
            // Documented fallback: score the rollout by the last state
            // reached, which for an unfinished game is a reward of zero.
            warn!(
                plies = result.plies,
                "rollout hit the ply cap before termination"
            );
        }

        trace!(
            node = chosen.0,
            plies = result.plies,
            reward = result.outcome.reward(),
            "sweep simulated"
        );

        self.backpropagation(chosen, result.outcome.reward())
    }

    /// Descend from the root through best children until a leaf is reached.
    fn selection(&mut self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();
        while !self.tree.get(current).is_leaf() {
            current = self.tree.best_child(current)?;
        }
        Ok(current)
    }

    /// Expand `leaf` if it has been visited before and is not terminal,
    /// returning a uniformly random new child to simulate from. A first-visit
    /// or terminal leaf is returned unchanged and simulated in place.
    fn expansion(&mut self, leaf: NodeId, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let node = self.tree.get(leaf);
        if node.visit_count == 0 || node.terminal {
            return Ok(leaf);
        }

        let moves = node.state.successors();
        if moves.is_empty() {
            self.tree.get_mut(leaf).terminal = true;
            return Ok(leaf);
        }

        for state in moves {
            self.tree.add_child(leaf, state);
        }
        debug!(
            node = leaf.0,
            children = self.tree.get(leaf).children.len(),
            "expanded leaf"
        );

        Ok(self.tree.random_child(leaf, rng)?)
    }

    /// Walk from the simulated node back to the root, updating statistics.
    ///
    /// `reward` is normalized to +1 for a player-one win. Each node banks it
    /// signed for the player who moved into the node, so a parent choosing
    /// among children maximizes its own mover's return; `opponent_level`
    /// carries that alternation up the tree. After an ancestor's visit count
    /// changes, every child's exploration bonus is stale, not just the path
    /// child's, so all of them are recomputed. The root itself never gets a
    /// UCT.
    fn backpropagation(&mut self, simulated: NodeId, reward: f64) -> Result<(), SearchError> {
        {
            let node = self.tree.get_mut(simulated);
            node.visit_count += 1;
            node.total_reward += node.state.player().opponent().sign() * reward;
        }

        let mut current = simulated;
        let mut parent = self.tree.get(current).parent;
        while parent.is_some() {
            let acting_sign = self.tree.get(current).state.player().opponent().sign();
            {
                let ancestor = self.tree.get_mut(parent);
                ancestor.visit_count += 1;
                ancestor.total_reward += acting_sign * self.config.opponent_level * reward;
            }

            // ln(parent_n) just moved under every sibling, not only the one
            // on the path.
            let children = self.tree.get(parent).children.clone();
            for child in children {
                self.tree.refresh_uct(child, self.config.exploration_constant)?;
            }

            current = parent;
            parent = self.tree.get(current).parent;
        }

        Ok(())
    }

    /// Accept a move forced from outside (the opponent's move), re-rooting
    /// the tree at the matching child and pruning every sibling subtree.
    ///
    /// Fails with [`SearchError::NoMatchingChild`] if the tree was never
    /// expanded along that branch; the caller is expected to recover by
    /// constructing a fresh engine for the forced state.
    pub fn play_move(&mut self, state: &S) -> Result<(), SearchError> {
        let root = self.tree.root();
        let child = self
            .tree
            .find_child(root, state)
            .ok_or(SearchError::NoMatchingChild)?;

        self.tree.reroot(child);
        debug!(nodes = self.tree.len(), "re-rooted on forced move");
        Ok(())
    }

    /// Commit to a move according to the configured [`CommitPolicy`],
    /// re-root there (pruning all other branches) and return the chosen
    /// state.
    pub fn play_best_move(&mut self) -> Result<S, SearchError> {
        let root = self.tree.root();
        let chosen = match self.config.commit_policy {
            CommitPolicy::HighestUct => self.tree.best_child(root)?,
            CommitPolicy::HighestReward => self.tree.child_with_highest_reward(root)?,
        };

        self.tree.reroot(chosen);
        debug!(nodes = self.tree.len(), "committed best move");
        Ok(self.tree.get(chosen).state.clone())
    }
}

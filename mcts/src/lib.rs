//! Monte Carlo Tree Search over pluggable two-player games.
//!
//! This crate provides a game-agnostic UCT-MCTS engine that works with any
//! game implementing the `search-core` [`GameState`](search_core::GameState)
//! trait.
//!
//! # Overview
//!
//! The engine builds a search tree one *sweep* at a time. Each sweep runs
//! four phases:
//!
//! 1. **Selection**: descend from the root through the children with the
//!    highest UCT score until a leaf is reached
//! 2. **Expansion**: if the leaf has been visited before and is not
//!    terminal, add one child per legal move and pick a random one
//! 3. **Simulation**: play a uniformly random game from the chosen node to
//!    a terminal state (bounded by a ply cap)
//! 4. **Backpropagation**: update visit counts and rewards from the
//!    simulated node back up to the root
//!
//! Between plies, [`Mcts::play_best_move`] commits to a move and
//! [`Mcts::play_move`] accepts the opponent's, each re-rooting the tree at
//! the chosen child and pruning every other branch to bound memory.
//!
//! # Usage
//!
//! ```rust
//! use mcts::{Mcts, MctsConfig};
//! use games_tictactoe::TicTacToe;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut engine = Mcts::new(TicTacToe::new(), MctsConfig::for_testing());
//!
//! engine.run(&mut rng).unwrap();
//! let chosen = engine.play_best_move().unwrap();
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior: sweeps per move
//! decision, the UCT exploration constant (default 0.707), the rollout ply
//! cap, the opponent-level sign, and the move-commitment policy (highest
//! UCT, the classic behavior, or highest accumulated reward).

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{CommitPolicy, MctsConfig};
pub use node::{Node, NodeId};
pub use search::{Mcts, SearchError};
pub use tree::{SearchTree, TreeError};

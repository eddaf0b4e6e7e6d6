//! Core traits and types for two-player game search
//!
//! This crate provides the capability contract between the MCTS engine and
//! concrete game implementations:
//! - `GameState`: enumerate successors, detect terminal states, report winners
//! - `Player` / `Outcome`: the two sides and the result of a finished game
//! - `rollout`: random self-play from a state to a terminal state (or ply cap)
//!
//! The engine depends only on this crate; game crates implement `GameState`
//! and never see the search tree.

pub mod rollout;

pub use rollout::{rollout, Rollout};

use std::fmt;

/// One of the two sides of a zero-sum game.
///
/// Rewards are normalized so that `+1.0` is a win for [`Player::One`] and
/// `-1.0` a win for [`Player::Two`]; [`Player::sign`] gives that factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Reward sign of this player: `+1.0` for One, `-1.0` for Two.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Player::One => 1.0,
            Player::Two => -1.0,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player one"),
            Player::Two => write!(f, "player two"),
        }
    }
}

/// Result of a game as reported by [`GameState::outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The given player has won.
    Won(Player),
    /// The game is over with no winner.
    Draw,
    /// The game is not over yet.
    Ongoing,
}

impl Outcome {
    /// Normalized reward: `+1.0` if One won, `-1.0` if Two won, else `0.0`.
    #[inline]
    pub fn reward(self) -> f64 {
        match self {
            Outcome::Won(p) => p.sign(),
            Outcome::Draw | Outcome::Ongoing => 0.0,
        }
    }
}

/// A position in a two-player, zero-sum, perfect-information game.
///
/// States are immutable values: applying a move produces a fresh state, and
/// two states are equal iff their boards and players to move are equal
/// (`PartialEq` is value-based, never identity-based).
///
/// The base contract ties the three queries together: a state is terminal
/// iff it has no successors, and by default the player left without a move
/// has lost. Games with their own end conditions (tic-tac-toe lines, stale
/// positions that draw) override [`is_terminal`](GameState::is_terminal) and
/// [`outcome`](GameState::outcome) consistently: `successors()` must return
/// an empty vector exactly when `is_terminal()` is true.
pub trait GameState: Clone + PartialEq + fmt::Debug {
    /// The player to move in this state.
    fn player(&self) -> Player;

    /// Every position reachable in one legal move. Empty iff terminal.
    fn successors(&self) -> Vec<Self>;

    /// Whether the game is over in this state.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// The result of the game, meaningful once [`is_terminal`](GameState::is_terminal)
    /// holds. Default convention: no legal moves means the mover has lost.
    fn outcome(&self) -> Outcome {
        if self.is_terminal() {
            Outcome::Won(self.player().opponent())
        } else {
            Outcome::Ongoing
        }
    }
}

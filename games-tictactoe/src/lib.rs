//! Tic-tac-toe implementation of the `search-core` game contract.
//!
//! The smallest fully enumerable two-player game, used as the reference
//! instantiation and throughout the engine's tests. Cells hold `+1` for X
//! (player one), `-1` for O (player two), `0` for empty, in the flat 0-8
//! numbering:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```

use std::fmt;

use search_core::{GameState, Outcome, Player};

/// The eight winning lines: rows, columns, diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A tic-tac-toe position: board plus player to move.
///
/// Immutable value type; [`place`](TicTacToe::place) returns a fresh state.
/// Two positions are equal iff their boards and movers are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    cells: [i8; 9],
    to_move: Player,
}

impl TicTacToe {
    /// The empty board, X to move.
    pub fn new() -> Self {
        Self {
            cells: [0; 9],
            to_move: Player::One,
        }
    }

    /// Build a position from raw cells (`+1` X, `-1` O, `0` empty).
    pub fn from_cells(cells: [i8; 9], to_move: Player) -> Self {
        Self { cells, to_move }
    }

    /// Occupant of a cell, if any.
    pub fn cell(&self, index: usize) -> Option<Player> {
        match self.cells[index] {
            1 => Some(Player::One),
            -1 => Some(Player::Two),
            _ => None,
        }
    }

    /// Place the mover's mark at `index`, handing the turn over.
    ///
    /// The cell must be empty and the game still open.
    pub fn place(&self, index: usize) -> Self {
        debug_assert_eq!(self.cells[index], 0, "cell {} is occupied", index);
        debug_assert_eq!(self.line_winner(), None, "game is already decided");

        let mut next = *self;
        next.cells[index] = match self.to_move {
            Player::One => 1,
            Player::Two => -1,
        };
        next.to_move = self.to_move.opponent();
        next
    }

    /// The owner of a completed line, if any.
    fn line_winner(&self) -> Option<Player> {
        for line in &LINES {
            let [a, b, c] = *line;
            if self.cells[a] != 0 && self.cells[a] == self.cells[b] && self.cells[b] == self.cells[c]
            {
                return Some(if self.cells[a] == 1 {
                    Player::One
                } else {
                    Player::Two
                });
            }
        }
        None
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != 0)
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    fn player(&self) -> Player {
        self.to_move
    }

    fn successors(&self) -> Vec<Self> {
        if self.line_winner().is_some() {
            return Vec::new();
        }

        (0..9)
            .filter(|&i| self.cells[i] == 0)
            .map(|i| self.place(i))
            .collect()
    }

    fn is_terminal(&self) -> bool {
        self.line_winner().is_some() || self.is_full()
    }

    /// Line check first; a full board without a line is a draw. This
    /// overrides the base "no moves means the mover lost" convention.
    fn outcome(&self) -> Outcome {
        if let Some(winner) = self.line_winner() {
            return Outcome::Won(winner);
        }
        if self.is_full() {
            return Outcome::Draw;
        }
        Outcome::Ongoing
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let mark = match self.cells[3 * row + col] {
                    1 => 'x',
                    -1 => 'o',
                    _ => '.',
                };
                write!(f, " {}", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

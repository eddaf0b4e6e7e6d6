//! Italian draughts implementation of the `search-core` game contract.
//!
//! Played on the dark squares of an 8x8 board, stored flat: square `s` sits
//! at row `s / 8`, column `s % 8`, with white (player one) moving up the
//! rows. Cells hold `+1`/`-1` for white/black men, `+2`/`-2` for kings.
//!
//! Rule set, as inherited:
//! - men move one step diagonally forward, kings in all four diagonal
//!   directions
//! - captures are mandatory and chain; among candidate moves only those
//!   capturing the most pieces are legal, with ties broken by preferring a
//!   king move and then the most kings captured
//! - men capture men only, never kings
//! - a man reaching the far row promotes; promotion ends a capture chain
//! - the player left without a legal move has lost

use std::fmt;

use search_core::{GameState, Player};

/// Diagonal steps on the flat board: up-left and up-right for white.
const DIAGONALS: [i32; 2] = [7, 9];

/// A draughts position: board plus player to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draughts {
    board: [i8; 64],
    to_move: Player,
}

/// Candidate move with the bookkeeping the legality filters need.
struct Candidate {
    board: [i8; 64],
    /// 1 if a man moved, 2 if a king moved.
    moving_piece: i8,
    pieces_taken: u32,
    kings_taken: u32,
}

/// `+1` for white (player one), `-1` for black.
fn side(player: Player) -> i8 {
    match player {
        Player::One => 1,
        Player::Two => -1,
    }
}

/// Whether two squares are diagonally adjacent (also rejects off-board
/// indices, so callers can probe `square + step` blindly).
fn are_neighbours(a: i32, b: i32) -> bool {
    if !(0..64).contains(&a) || !(0..64).contains(&b) {
        return false;
    }
    let (ar, ac) = (a / 8, a % 8);
    let (br, bc) = (b / 8, b % 8);
    (ar - br).abs() == 1 && (ac - bc).abs() == 1
}

/// Whether `square` is the promotion row for the given side.
fn is_promotion_row(square: i32, player: i8) -> bool {
    (square / 8 == 7 && player == 1) || (square / 8 == 0 && player == -1)
}

impl Draughts {
    /// The standard starting position: twelve men per side on the dark
    /// squares of the first three rows, white to move.
    pub fn new() -> Self {
        let mut board = [0i8; 64];
        for square in 0..64 {
            if (square / 8 + square % 8) % 2 != 0 {
                continue;
            }
            if square / 8 <= 2 {
                board[square] = 1;
            } else if square / 8 >= 5 {
                board[square] = -1;
            }
        }
        Self {
            board,
            to_move: Player::One,
        }
    }

    /// Build a position from raw cells.
    pub fn from_board(board: [i8; 64], to_move: Player) -> Self {
        Self { board, to_move }
    }

    /// Raw cell value at `square`.
    pub fn cell(&self, square: usize) -> i8 {
        self.board[square]
    }

    /// All movement sequences of one man, chained captures included. Each
    /// landing position is recorded as a candidate; shorter prefixes of a
    /// longer chain are weeded out later by the maximum-capture filter.
    fn man_moves(
        candidates: &mut Vec<Candidate>,
        board: [i8; 64],
        player: i8,
        square: i32,
        taken_pieces: u32,
        taken_kings: u32,
    ) {
        for diagonal in DIAGONALS {
            let next = square + i32::from(player) * diagonal;
            if !are_neighbours(square, next) {
                continue;
            }

            if board[next as usize] == 0 && taken_pieces == 0 {
                let mut new_board = board;
                new_board[square as usize] = 0;
                new_board[next as usize] = if is_promotion_row(next, player) {
                    2 * player
                } else {
                    player
                };
                candidates.push(Candidate {
                    board: new_board,
                    moving_piece: 1,
                    pieces_taken: taken_pieces,
                    kings_taken: taken_kings,
                });
            } else if board[next as usize] == -player {
                // An opposing man ahead; men never capture kings.
                let landing = next + i32::from(player) * diagonal;
                if !are_neighbours(next, landing) || board[landing as usize] != 0 {
                    continue;
                }

                let mut new_board = board;
                new_board[square as usize] = 0;
                new_board[next as usize] = 0;
                if is_promotion_row(landing, player) {
                    // Promotion ends the chain.
                    new_board[landing as usize] = 2 * player;
                    candidates.push(Candidate {
                        board: new_board,
                        moving_piece: 1,
                        pieces_taken: taken_pieces + 1,
                        kings_taken: taken_kings,
                    });
                } else {
                    new_board[landing as usize] = player;
                    candidates.push(Candidate {
                        board: new_board,
                        moving_piece: 1,
                        pieces_taken: taken_pieces + 1,
                        kings_taken: taken_kings,
                    });
                    Self::man_moves(
                        candidates,
                        new_board,
                        player,
                        landing,
                        taken_pieces + 1,
                        taken_kings,
                    );
                }
            }
        }
    }

    /// All movement sequences of one king.
    fn king_moves(
        candidates: &mut Vec<Candidate>,
        board: [i8; 64],
        player: i8,
        square: i32,
        taken_pieces: u32,
        taken_kings: u32,
    ) {
        for diagonal in DIAGONALS {
            for direction in [-1i32, 1] {
                let step = i32::from(player) * direction * diagonal;
                let next = square + step;
                if !are_neighbours(square, next) {
                    continue;
                }

                if board[next as usize] == 0 && taken_pieces == 0 {
                    let mut new_board = board;
                    new_board[square as usize] = 0;
                    new_board[next as usize] = 2 * player;
                    candidates.push(Candidate {
                        board: new_board,
                        moving_piece: 2,
                        pieces_taken: taken_pieces,
                        kings_taken: taken_kings,
                    });
                } else if board[next as usize] * player < 0 {
                    let landing = next + step;
                    if !are_neighbours(next, landing) || board[landing as usize] != 0 {
                        continue;
                    }

                    let captured_king = board[next as usize] == -2 * player;
                    let mut new_board = board;
                    new_board[square as usize] = 0;
                    new_board[next as usize] = 0;
                    new_board[landing as usize] = 2 * player;

                    let kings = taken_kings + u32::from(captured_king);
                    candidates.push(Candidate {
                        board: new_board,
                        moving_piece: 2,
                        pieces_taken: taken_pieces + 1,
                        kings_taken: kings,
                    });
                    Self::king_moves(
                        candidates,
                        new_board,
                        player,
                        landing,
                        taken_pieces + 1,
                        kings,
                    );
                }
            }
        }
    }

    /// Apply the legality filters to the raw candidates: only moves with the
    /// maximum number of captures are legal; among capturing moves a king
    /// move outranks a man move, and then the most captured kings win.
    fn filter_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        if candidates.len() < 2 {
            return candidates;
        }

        let max_pieces = candidates.iter().map(|c| c.pieces_taken).max().unwrap_or(0);
        if max_pieces == 0 {
            return candidates;
        }
        candidates.retain(|c| c.pieces_taken == max_pieces);

        if candidates.iter().any(|c| c.moving_piece == 2) {
            candidates.retain(|c| c.moving_piece == 2);
        }

        let max_kings = candidates.iter().map(|c| c.kings_taken).max().unwrap_or(0);
        if max_kings > 0 {
            candidates.retain(|c| c.kings_taken == max_kings);
        }

        candidates
    }
}

impl Default for Draughts {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Draughts {
    fn player(&self) -> Player {
        self.to_move
    }

    fn successors(&self) -> Vec<Self> {
        let player = side(self.to_move);
        let mut candidates = Vec::new();

        for square in 0..64i32 {
            let cell = self.board[square as usize];
            if cell == player {
                Self::man_moves(&mut candidates, self.board, player, square, 0, 0);
            } else if cell == 2 * player {
                Self::king_moves(&mut candidates, self.board, player, square, 0, 0);
            }
        }

        Self::filter_candidates(candidates)
            .into_iter()
            .map(|c| Draughts {
                board: c.board,
                to_move: self.to_move.opponent(),
            })
            .collect()
    }

    // is_terminal and outcome use the base contract: the player left
    // without a move has lost.
}

impl fmt::Display for Draughts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "|")?;
            for col in 0..8 {
                let mark = match self.board[8 * row + col] {
                    1 => 'o',
                    2 => 'O',
                    -1 => 'x',
                    -2 => 'X',
                    _ => ' ',
                };
                write!(f, "{}|", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

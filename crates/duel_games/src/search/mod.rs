//! Adversarial search for AI opponents.
//!
//! - Tic-tac-toe: exhaustive minimax, with an occasional random move so the
//!   AI stays beatable
//! - Connect-four: depth-limited minimax with alpha-beta pruning over a
//!   center-first column order, scored by a window heuristic at the horizon

mod alpha_beta;
mod evaluate;
mod minimax;

use crate::board::Board;
use crate::types::Mark;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Tuning for the AI opponent.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct SearchConfig {
    /// Probability that a tic-tac-toe turn plays a random legal move.
    #[serde(default = "default_blunder_rate")]
    blunder_rate: f64,

    /// Plies searched below each candidate connect-four column.
    #[serde(default = "default_connect_four_depth")]
    connect_four_depth: u8,
}

fn default_blunder_rate() -> f64 {
    0.05
}

fn default_connect_four_depth() -> u8 {
    4
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            blunder_rate: default_blunder_rate(),
            connect_four_depth: default_connect_four_depth(),
        }
    }
}

/// Search could not produce a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SearchError {
    /// The board has no empty position.
    #[display("No legal move on a full board")]
    NoLegalMove,
    /// The AI and its opponent were given the same mark.
    #[display("AI and opponent share mark {}", _0)]
    SameMarks(#[error(not(source))] Mark),
}

/// Picks moves for the AI seat.
#[derive(Debug, Clone, Copy, Default, Getters)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    /// Creates an engine with the given tuning.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Chooses a position for `ai` on `board`.
    ///
    /// The result is a cell index for tic-tac-toe and a column for
    /// connect-four. It is fully determined by the board and the values
    /// drawn from `rng`.
    ///
    /// # Errors
    ///
    /// [`SearchError::NoLegalMove`] if the board is full;
    /// [`SearchError::SameMarks`] if `ai == opponent`.
    #[instrument(skip(self, board, rng), fields(kind = %board.kind(), ai = %ai))]
    pub fn best_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        ai: Mark,
        opponent: Mark,
        rng: &mut R,
    ) -> Result<usize, SearchError> {
        if ai == opponent {
            return Err(SearchError::SameMarks(ai));
        }
        let legal = board.legal_moves();
        if legal.is_empty() {
            return Err(SearchError::NoLegalMove);
        }

        let choice = match board {
            Board::TicTacToe(b) => {
                if rng.random_bool(self.blunder_rate()) {
                    let pick = legal[rng.random_range(0..legal.len())];
                    debug!(position = pick, "Playing a random move");
                    Some(pick)
                } else {
                    minimax::best_move(b, ai, opponent)
                }
            }
            Board::ConnectFour(b) => {
                alpha_beta::best_move(b, ai, opponent, self.config.connect_four_depth)
            }
        };

        let position = choice.ok_or(SearchError::NoLegalMove)?;
        debug!(position, "Search chose move");
        Ok(position)
    }

    fn blunder_rate(&self) -> f64 {
        let rate = self.config.blunder_rate;
        if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
    }
}

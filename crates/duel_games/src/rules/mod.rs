//! Win and draw detection.
//!
//! Classification is a pure function of the board, so it can be run on
//! real boards and on the search's hypothetical ones alike.

mod connect_four;
mod tictactoe;

pub(crate) use connect_four::winner as connect_four_winner;
pub(crate) use tictactoe::winner as tictactoe_winner;

use crate::board::Board;
use crate::types::Mark;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of classifying a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Play continues.
    Undecided,
    /// The mark completed a line.
    WonBy(Mark),
    /// Full board with no line.
    Drawn,
}

impl Classification {
    /// Returns true for a won or drawn board.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Classification::Undecided)
    }

    /// Returns the winning mark, if any.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Classification::WonBy(mark) => Some(mark),
            _ => None,
        }
    }
}

/// Classifies a board as undecided, won, or drawn.
///
/// A win takes precedence over a full board: the move that fills the
/// last cell may also complete a line.
#[instrument(level = "trace", skip(board), fields(kind = %board.kind()))]
pub fn classify(board: &Board) -> Classification {
    let winner = match board {
        Board::TicTacToe(b) => tictactoe_winner(b),
        Board::ConnectFour(b) => connect_four_winner(b),
    };
    match winner {
        Some(mark) => Classification::WonBy(mark),
        None if board.is_full() => Classification::Drawn,
        None => Classification::Undecided,
    }
}

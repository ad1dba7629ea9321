//! Core domain types shared by every grid game.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// One of the two markers placed on a board.
///
/// Participant A always plays `X` and moves first; participant B plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// First mover.
    X,
    /// Second mover.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Holds a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns true if the cell holds no mark.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the mark held by this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

/// Every game a session can be requested for.
///
/// The grid games ([`GridKind`]) and rock-paper-scissors have session
/// logic; the others are enumerated so callers can name them and be refused
/// cleanly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameKind {
    /// 3x3 grid, three in a row.
    #[strum(to_string = "tictactoe", serialize = "tic-tac-toe")]
    #[serde(rename = "tictactoe")]
    TicTacToe,
    /// 6x7 grid with gravity, four in a row.
    ConnectFour,
    /// Not a grid game.
    RockPaperScissors,
    /// Not a grid game.
    Hangman,
    /// Not a grid game.
    Blackjack,
}

impl GameKind {
    /// Returns true for the kinds that play on a board.
    pub fn is_grid(self) -> bool {
        GridKind::try_from(self).is_ok()
    }
}

/// The board-based game kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GridKind {
    /// 3x3 tic-tac-toe.
    #[display("tictactoe")]
    TicTacToe,
    /// 6x7 connect-four.
    #[display("connect-four")]
    ConnectFour,
}

impl From<GridKind> for GameKind {
    fn from(kind: GridKind) -> Self {
        match kind {
            GridKind::TicTacToe => GameKind::TicTacToe,
            GridKind::ConnectFour => GameKind::ConnectFour,
        }
    }
}

/// A game kind was used where its rules are not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("{} is not supported here", kind)]
pub struct UnsupportedGameKind {
    /// The rejected kind.
    pub kind: GameKind,
}

impl TryFrom<GameKind> for GridKind {
    type Error = UnsupportedGameKind;

    fn try_from(kind: GameKind) -> Result<Self, Self::Error> {
        match kind {
            GameKind::TicTacToe => Ok(GridKind::TicTacToe),
            GameKind::ConnectFour => Ok(GridKind::ConnectFour),
            other => Err(UnsupportedGameKind { kind: other }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_opponent_flips() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent().opponent(), Mark::O);
    }

    #[test]
    fn test_only_two_grid_kinds() {
        let grids: Vec<_> = GameKind::iter().filter(|k| k.is_grid()).collect();
        assert_eq!(grids, vec![GameKind::TicTacToe, GameKind::ConnectFour]);
    }

    #[test]
    fn test_non_grid_kind_rejected() {
        let err = GridKind::try_from(GameKind::Hangman).unwrap_err();
        assert_eq!(err.kind, GameKind::Hangman);
        assert_eq!(err.to_string(), "hangman is not supported here");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(GameKind::from_str("tictactoe").unwrap(), GameKind::TicTacToe);
        assert_eq!(GameKind::from_str("tic-tac-toe").unwrap(), GameKind::TicTacToe);
        assert_eq!(GameKind::from_str("connect-four").unwrap(), GameKind::ConnectFour);
        assert_eq!(GameKind::ConnectFour.to_string(), "connect-four");
    }
}

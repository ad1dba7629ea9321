//! Fixed-shape boards and placement rules.
//!
//! Boards are values: [`Board::place`] returns a new board and leaves the
//! receiver untouched, so a rejected placement can never corrupt state.

pub(crate) mod connect_four;
mod tictactoe;

pub use connect_four::ConnectFourBoard;
pub use tictactoe::TicTacToeBoard;

use crate::types::{Cell, GridKind, Mark};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Reasons a placement is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum PlaceError {
    /// The tic-tac-toe cell already holds a mark.
    #[display("Position {} is already occupied", _0)]
    PositionOccupied(#[error(not(source))] usize),

    /// The connect-four column has no empty row left.
    #[display("Column {} is full", _0)]
    ColumnFull(#[error(not(source))] usize),

    /// The position does not exist on this board.
    #[display("Position {} is out of range", _0)]
    PositionOutOfRange(#[error(not(source))] usize),
}

/// A board for one of the grid games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cells", rename_all = "kebab-case")]
pub enum Board {
    /// 3x3 board, positions are cell indices 0-8.
    TicTacToe(TicTacToeBoard),
    /// 6x7 board, positions are column indices 0-6.
    ConnectFour(ConnectFourBoard),
}

impl Board {
    /// Creates an empty board for the given kind.
    #[instrument]
    pub fn empty(kind: GridKind) -> Self {
        match kind {
            GridKind::TicTacToe => Board::TicTacToe(TicTacToeBoard::new()),
            GridKind::ConnectFour => Board::ConnectFour(ConnectFourBoard::new()),
        }
    }

    /// Returns which game this board belongs to.
    pub fn kind(&self) -> GridKind {
        match self {
            Board::TicTacToe(_) => GridKind::TicTacToe,
            Board::ConnectFour(_) => GridKind::ConnectFour,
        }
    }

    /// Returns true if `position` cannot take another mark.
    ///
    /// For connect-four the position is a column, which is occupied once
    /// it is full. Positions outside the board report `false`.
    pub fn is_occupied(&self, position: usize) -> bool {
        match self {
            Board::TicTacToe(b) => b.is_occupied(position),
            Board::ConnectFour(b) => b.is_column_full(position),
        }
    }

    /// Places `mark` at `position`, returning the resulting board.
    ///
    /// # Errors
    ///
    /// - [`PlaceError::PositionOutOfRange`] if the position does not exist
    /// - [`PlaceError::PositionOccupied`] for a filled tic-tac-toe cell
    /// - [`PlaceError::ColumnFull`] for a full connect-four column
    pub fn place(&self, position: usize, mark: Mark) -> Result<Board, PlaceError> {
        match self {
            Board::TicTacToe(b) => b.place(position, mark).map(Board::TicTacToe),
            Board::ConnectFour(b) => b.drop_mark(position, mark).map(Board::ConnectFour),
        }
    }

    /// Positions that currently accept a mark, in ascending order.
    pub fn legal_moves(&self) -> Vec<usize> {
        match self {
            Board::TicTacToe(b) => b.empty_positions().collect(),
            Board::ConnectFour(b) => b.open_columns().collect(),
        }
    }

    /// Returns true when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells().all(|c| !c.is_empty())
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells().filter(|c| !c.is_empty()).count()
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells().filter(|c| c.mark() == Some(mark)).count()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> Box<dyn Iterator<Item = Cell> + '_> {
        match self {
            Board::TicTacToe(b) => Box::new(b.squares().iter().copied()),
            Board::ConnectFour(b) => Box::new(b.rows().iter().flatten().copied()),
        }
    }

    /// Returns the cell at a row-major index, if it exists.
    pub fn get(&self, index: usize) -> Option<Cell> {
        match self {
            Board::TicTacToe(b) => b.get(index),
            Board::ConnectFour(b) => b.get_index(index),
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::TicTacToe(b) => write!(f, "{b}"),
            Board::ConnectFour(b) => write!(f, "{b}"),
        }
    }
}

pub(crate) fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Occupied(Mark::X) => 'X',
        Cell::Occupied(Mark::O) => 'O',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_boards() {
        let ttt = Board::empty(GridKind::TicTacToe);
        assert_eq!(ttt.cells().count(), 9);
        assert_eq!(ttt.occupied_count(), 0);

        let c4 = Board::empty(GridKind::ConnectFour);
        assert_eq!(c4.cells().count(), 42);
        assert_eq!(c4.legal_moves(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_place_does_not_mutate_receiver() {
        let board = Board::empty(GridKind::TicTacToe);
        let next = board.place(0, Mark::X).unwrap();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(next.occupied_count(), 1);
    }

    #[test]
    fn test_occupied_cell_rejected_unchanged() {
        let board = Board::empty(GridKind::TicTacToe).place(4, Mark::X).unwrap();
        let before = board;
        assert_eq!(board.place(4, Mark::O), Err(PlaceError::PositionOccupied(4)));
        assert_eq!(board, before);
        assert!(board.is_occupied(4));
    }

    #[test]
    fn test_full_column_distinct_from_out_of_range() {
        let mut board = Board::empty(GridKind::ConnectFour);
        let mut mark = Mark::X;
        for _ in 0..6 {
            board = board.place(2, mark).unwrap();
            mark = mark.opponent();
        }
        let before = board;
        assert_eq!(board.place(2, Mark::X), Err(PlaceError::ColumnFull(2)));
        assert_eq!(board.place(7, Mark::X), Err(PlaceError::PositionOutOfRange(7)));
        assert_eq!(board, before);
        assert!(board.is_occupied(2));
        assert!(!board.is_occupied(3));
        assert!(!board.legal_moves().contains(&2));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let board = Board::empty(GridKind::TicTacToe).place(0, Mark::X).unwrap();
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(json["kind"], "tic-tac-toe");
    }
}

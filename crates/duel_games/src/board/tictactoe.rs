//! 3x3 tic-tac-toe board.

use super::{PlaceError, symbol};
use crate::types::{Cell, Mark};
use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TicTacToeBoard {
    /// Squares in row-major order (0-8).
    squares: [Cell; CELLS],
}

impl TicTacToeBoard {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.squares.get(pos).copied()
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Cell; CELLS] {
        &self.squares
    }

    /// Checks if a square holds a mark.
    pub fn is_occupied(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Occupied(_)))
    }

    /// Places a mark, returning the new board.
    pub fn place(&self, pos: usize, mark: Mark) -> Result<Self, PlaceError> {
        match self.get(pos) {
            None => Err(PlaceError::PositionOutOfRange(pos)),
            Some(Cell::Occupied(_)) => Err(PlaceError::PositionOccupied(pos)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.squares[pos] = Cell::Occupied(mark);
                Ok(next)
            }
        }
    }

    /// Indices of empty squares, ascending.
    pub fn empty_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }
}

impl std::fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Cell::Empty => write!(f, "{pos}")?,
                    cell => write!(f, "{}", symbol(cell))?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

//! Line detection for tic-tac-toe.

use crate::board::TicTacToeBoard;
use crate::types::{Cell, Mark};

/// The eight winning lines.
pub(crate) const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the mark holding three in a row, if any.
pub(crate) fn winner(board: &TicTacToeBoard) -> Option<Mark> {
    let squares = board.squares();
    LINES.iter().find_map(|&[a, b, c]| match squares[a] {
        Cell::Occupied(mark) if squares[b] == squares[a] && squares[c] == squares[a] => Some(mark),
        _ => None,
    })
}

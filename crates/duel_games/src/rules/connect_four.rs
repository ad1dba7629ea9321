//! Four-in-a-row detection for connect-four.

use crate::board::ConnectFourBoard;
use crate::board::connect_four::WINDOWS;
use crate::types::{Cell, Mark};

/// Returns the mark holding four consecutive cells in any direction.
pub(crate) fn winner(board: &ConnectFourBoard) -> Option<Mark> {
    WINDOWS.iter().find_map(|window| match board.window(window) {
        [Cell::Occupied(m), b, c, d] if [b, c, d].iter().all(|&x| x == Cell::Occupied(m)) => {
            Some(m)
        }
        _ => None,
    })
}

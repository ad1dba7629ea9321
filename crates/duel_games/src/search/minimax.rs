//! Exhaustive minimax for tic-tac-toe.

use crate::board::TicTacToeBoard;
use crate::rules::tictactoe_winner;
use crate::types::Mark;

const WIN: i32 = 10;

/// Returns the best position for `ai`, or `None` on a full board.
///
/// Candidates are tried in ascending order and only a strictly better
/// score replaces the current best.
pub(super) fn best_move(board: &TicTacToeBoard, ai: Mark, opponent: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for pos in board.empty_positions() {
        let Ok(child) = board.place(pos, ai) else {
            continue;
        };
        let score = minimax(&child, 0, false, ai, opponent);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((pos, score));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Scores a position from the AI's point of view.
///
/// Winning sooner scores higher and losing later scores less badly.
fn minimax(board: &TicTacToeBoard, depth: i32, maximizing: bool, ai: Mark, opponent: Mark) -> i32 {
    match tictactoe_winner(board) {
        Some(m) if m == ai => return WIN - depth,
        Some(_) => return depth - WIN,
        None => {}
    }

    let to_move = if maximizing { ai } else { opponent };
    let scores = board
        .empty_positions()
        .filter_map(|pos| board.place(pos, to_move).ok())
        .map(|child| minimax(&child, depth + 1, !maximizing, ai, opponent));

    let best = if maximizing { scores.max() } else { scores.min() };
    // No empty cell and no winner: draw
    best.unwrap_or(0)
}

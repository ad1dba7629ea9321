//! Depth-limited minimax with alpha-beta pruning for connect-four.

use super::evaluate::evaluate;
use crate::board::ConnectFourBoard;
use crate::board::connect_four::CENTER_ORDER;
use crate::rules::connect_four_winner;
use crate::types::Mark;

/// Terminal score for a completed four.
pub(super) const FOUR: i32 = 10_000;

/// Returns the best column for `ai`, or `None` if every column is full.
///
/// An immediately winning column is returned without searching. Otherwise
/// each open column, center first, is scored with `depth` further plies
/// and the first strictly best one wins ties.
pub(super) fn best_move(
    board: &ConnectFourBoard,
    ai: Mark,
    opponent: Mark,
    depth: u8,
) -> Option<usize> {
    let children = || {
        CENTER_ORDER
            .into_iter()
            .filter_map(move |col| board.drop_mark(col, ai).ok().map(|child| (col, child)))
    };

    if let Some((col, _)) = children().find(|(_, child)| connect_four_winner(child) == Some(ai)) {
        return Some(col);
    }

    let mut best: Option<(usize, i32)> = None;
    for (col, child) in children() {
        let score = alpha_beta(&child, depth, false, ai, opponent, i32::MIN, i32::MAX);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((col, score));
        }
    }
    best.map(|(col, _)| col)
}

fn alpha_beta(
    board: &ConnectFourBoard,
    depth: u8,
    maximizing: bool,
    ai: Mark,
    opponent: Mark,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match connect_four_winner(board) {
        Some(m) if m == ai => return FOUR,
        Some(_) => return -FOUR,
        None => {}
    }
    if depth == 0 || board.is_full() {
        return evaluate(board, ai, opponent);
    }

    let to_move = if maximizing { ai } else { opponent };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for col in CENTER_ORDER {
        let Ok(child) = board.drop_mark(col, to_move) else {
            continue;
        };
        let score = alpha_beta(&child, depth - 1, !maximizing, ai, opponent, alpha, beta);
        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

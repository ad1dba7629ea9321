//! Static evaluation of connect-four positions at the search horizon.

use crate::board::ConnectFourBoard;
use crate::board::connect_four::{COLS, WINDOWS};
use crate::types::{Cell, Mark};

const CENTER_DISC: i32 = 3;
const OWN_FOUR: i32 = 100;
const OWN_THREE: i32 = 5;
const OWN_TWO: i32 = 2;
const THEIR_THREE: i32 = -4;
const THEIR_TWO: i32 = -1;

/// Scores a board from the AI's point of view.
pub(super) fn evaluate(board: &ConnectFourBoard, ai: Mark, opponent: Mark) -> i32 {
    let center = COLS / 2;
    let center_score: i32 = board
        .rows()
        .iter()
        .map(|row| match row[center] {
            Cell::Occupied(m) if m == ai => CENTER_DISC,
            Cell::Occupied(m) if m == opponent => -CENTER_DISC,
            _ => 0,
        })
        .sum();

    let window_score: i32 = WINDOWS
        .iter()
        .map(|w| score_window(&board.window(w), ai, opponent))
        .sum();

    center_score + window_score
}

/// Scores one 4-cell window.
fn score_window(window: &[Cell; 4], ai: Mark, opponent: Mark) -> i32 {
    let count = |mark: Mark| window.iter().filter(|c| c.mark() == Some(mark)).count();
    let own = count(ai);
    let theirs = count(opponent);
    let empty = window.iter().filter(|c| c.is_empty()).count();

    let mut score = match (own, empty) {
        (4, _) => OWN_FOUR,
        (3, 1) => OWN_THREE,
        (2, 2) => OWN_TWO,
        _ => 0,
    };
    score += match (theirs, empty) {
        (3, 1) => THEIR_THREE,
        (2, 2) => THEIR_TWO,
        _ => 0,
    };
    score
}

//! Duel games - pure grid game logic for two-party sessions.
//!
//! This crate knows nothing about players, sessions, or time. It provides:
//!
//! - **Boards**: fixed-shape grids for tic-tac-toe (3x3) and connect-four (6x7)
//! - **Rules**: classification of a board as undecided, won, or drawn
//! - **Search**: AI move selection by exhaustive minimax or depth-limited alpha-beta
//! - **Invariants**: checks that a placement was a legal step from the previous board
//! - **Hands**: rock-paper-scissors throws and their showdown
//!
//! # Example
//!
//! ```
//! use duel_games::{Board, Classification, GridKind, Mark, SearchConfig, SearchEngine, classify};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let board = Board::empty(GridKind::TicTacToe).place(4, Mark::X)?;
//! assert_eq!(classify(&board), Classification::Undecided);
//!
//! let engine = SearchEngine::new(SearchConfig::default().with_blunder_rate(0.0));
//! let mut rng = StdRng::seed_from_u64(7);
//! let reply = engine.best_move(&board, Mark::O, Mark::X, &mut rng)?;
//! assert!([0, 2, 6, 8].contains(&reply));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod hand;
mod invariants;
mod rules;
mod search;
mod types;

pub use board::{Board, ConnectFourBoard, PlaceError, TicTacToeBoard};
pub use board::connect_four::{COLS as CONNECT_FOUR_COLS, ROWS as CONNECT_FOUR_ROWS};
pub use hand::{Hand, Showdown, showdown};
pub use invariants::{
    BalancedMarks, BoardStep, BoardStepInvariants, Invariant, InvariantSet, InvariantViolation,
    MonotonicOccupancy, SinglePlacement,
};
pub use rules::{Classification, classify};
pub use search::{SearchConfig, SearchEngine, SearchError};
pub use types::{Cell, GameKind, GridKind, Mark, UnsupportedGameKind};

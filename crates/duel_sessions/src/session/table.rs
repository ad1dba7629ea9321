//! What a round is played on.

use crate::ids::Seat;
use duel_games::{Board, GameKind, GridKind, Hand, UnsupportedGameKind};
use serde::{Deserialize, Serialize};

/// Hands thrown so far in a rock-paper-scissors round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Throws {
    a: Option<Hand>,
    b: Option<Hand>,
}

impl Throws {
    /// Hand thrown by `seat`, if any.
    pub fn get(&self, seat: Seat) -> Option<Hand> {
        match seat {
            Seat::A => self.a,
            Seat::B => self.b,
        }
    }

    pub(crate) fn set(&mut self, seat: Seat, hand: Hand) {
        match seat {
            Seat::A => self.a = Some(hand),
            Seat::B => self.b = Some(hand),
        }
    }

    /// Both hands, once both seats have thrown.
    pub fn both(&self) -> Option<(Hand, Hand)> {
        self.a.zip(self.b)
    }
}

/// Round state: a board for grid games, hands for rock-paper-scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Table {
    /// A tic-tac-toe or connect-four board.
    Grid(Board),
    /// Simultaneous throws.
    Throws(Throws),
}

impl Table {
    /// Fresh round state for `kind`.
    ///
    /// # Errors
    ///
    /// [`UnsupportedGameKind`] for games without session rules.
    pub fn for_kind(kind: GameKind) -> Result<Self, UnsupportedGameKind> {
        match kind {
            GameKind::RockPaperScissors => Ok(Table::Throws(Throws::default())),
            other => GridKind::try_from(other).map(|grid| Table::Grid(Board::empty(grid))),
        }
    }

    /// The game this table is for.
    pub fn kind(&self) -> GameKind {
        match self {
            Table::Grid(board) => board.kind().into(),
            Table::Throws(_) => GameKind::RockPaperScissors,
        }
    }

    /// Same game, nothing played.
    pub fn cleared(&self) -> Self {
        match self {
            Table::Grid(board) => Table::Grid(Board::empty(board.kind())),
            Table::Throws(_) => Table::Throws(Throws::default()),
        }
    }

    /// The board, for grid games.
    pub fn board(&self) -> Option<&Board> {
        match self {
            Table::Grid(board) => Some(board),
            Table::Throws(_) => None,
        }
    }

    /// What may be shown to both players.
    ///
    /// Hands stay hidden until both seats have thrown.
    pub fn view(&self) -> TableView {
        match self {
            Table::Grid(board) => TableView::Grid { board: *board },
            Table::Throws(throws) => TableView::Throws {
                a_ready: throws.a.is_some(),
                b_ready: throws.b.is_some(),
                revealed: throws.both(),
            },
        }
    }
}

/// Public view of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableView {
    /// Grid games show the whole board.
    Grid {
        /// Current board.
        board: Board,
    },
    /// Rock-paper-scissors shows who has thrown.
    Throws {
        /// Seat A has thrown.
        a_ready: bool,
        /// Seat B has thrown.
        b_ready: bool,
        /// Both hands, once the round is decided.
        revealed: Option<(Hand, Hand)>,
    },
}

impl TableView {
    /// The board, for grid games.
    pub fn board(&self) -> Option<&Board> {
        match self {
            TableView::Grid { board } => Some(board),
            TableView::Throws { .. } => None,
        }
    }
}

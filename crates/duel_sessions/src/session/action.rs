//! Actions players submit to a session.

use duel_games::Hand;
use serde::{Deserialize, Serialize};

/// A discrete player action addressed to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Take seat B of a lobby.
    Join,
    /// Abandon the session.
    Cancel,
    /// Place a mark: a cell index for tic-tac-toe, a column for connect-four.
    #[display("Move({})", _0)]
    Move(usize),
    /// Throw a hand in rock-paper-scissors.
    #[display("Throw({})", _0)]
    Throw(Hand),
    /// Ask for another round.
    RematchVote,
}

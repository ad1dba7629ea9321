//! Identities of sessions, players, and seats.

use derive_more::{Display, From};
use duel_games::Mark;
use serde::{Deserialize, Serialize};

/// Opaque session identifier, minted by the registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("S-{}", _0)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identity of a human player, as supplied by the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Whoever occupies a seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    /// A human player.
    #[display("{}", _0)]
    Player(PlayerId),
    /// The built-in AI opponent.
    #[display("AI")]
    Ai,
}

impl Participant {
    /// Returns true for the AI sentinel.
    pub fn is_ai(&self) -> bool {
        matches!(self, Participant::Ai)
    }
}

/// One of the two positions in a session.
///
/// Seat A is the creator, plays `X`, and moves first in every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Seat {
    /// The creator.
    A,
    /// The joiner or the AI.
    B,
}

impl Seat {
    /// Returns the mark this seat plays.
    pub fn mark(self) -> Mark {
        match self {
            Seat::A => Mark::X,
            Seat::B => Mark::O,
        }
    }

    /// Returns the seat playing `mark`.
    pub fn of_mark(mark: Mark) -> Self {
        match mark {
            Mark::X => Seat::A,
            Mark::O => Seat::B,
        }
    }

    /// Returns the other seat.
    pub fn other(self) -> Self {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }
}

/// Who seat B will be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Another player joins from the lobby.
    #[display("vs-player")]
    VsPlayer,
    /// The AI takes seat B immediately.
    #[display("vs-ai")]
    VsAi,
}

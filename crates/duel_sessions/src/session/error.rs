//! Errors returned to callers of the session layer.

use super::phase::Phase;
use crate::ids::SessionId;
use derive_more::{Display, Error, From};
use duel_games::{GameKind, PlaceError, SearchError, UnsupportedGameKind};

/// An action broke a rule. The session is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum GuardViolation {
    /// The action is not accepted in the current phase.
    #[display("Action not allowed during {}", phase)]
    WrongPhase {
        /// Phase the session was in.
        phase: Phase,
    },

    /// The actor is not the current turn owner.
    #[display("It is not your turn")]
    NotYourTurn,

    /// The creator tried to join their own lobby.
    #[display("You cannot join your own game")]
    CannotJoinSelf,

    /// Only the creator may cancel a lobby.
    #[display("Only the creator can cancel this game")]
    OnlyCreatorMayCancel,

    /// The actor has no seat in this session.
    #[display("You are not part of this game")]
    NotParticipant,

    /// The action belongs to a different game.
    #[display("That action does not apply to {}", kind)]
    WrongGame {
        /// Game the session plays.
        kind: GameKind,
    },

    /// The seat has already thrown this round.
    #[display("You have already chosen")]
    AlreadyThrown,

    /// The board refused the placement.
    #[display("Illegal move: {}", _0)]
    #[from]
    IllegalPlacement(PlaceError),
}

/// Why an action addressed to the registry did not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum ActionError {
    /// No live session has this id. Benign: the game ended or never existed.
    #[display("Session {} has expired or is unknown", _0)]
    #[from(ignore)]
    SessionExpiredOrUnknown(#[error(not(source))] SessionId),

    /// The action was invalid for the session's state.
    #[display("{}", _0)]
    Guard(GuardViolation),

    /// The AI could not produce a move. The round is left as it was.
    #[display("AI search failed: {}", _0)]
    Search(SearchError),

    /// The AI produced a move the board rejected.
    #[display("AI move rejected: {}", _0)]
    #[from(ignore)]
    AiPlacement(PlaceError),
}

impl ActionError {
    /// Returns true if the session no longer exists.
    pub fn is_expired(&self) -> bool {
        matches!(self, ActionError::SessionExpiredOrUnknown(_))
    }
}

impl From<PlaceError> for ActionError {
    fn from(err: PlaceError) -> Self {
        ActionError::Guard(GuardViolation::IllegalPlacement(err))
    }
}

/// A session could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum CreateError {
    /// The game has no board-based session logic.
    #[display("{}", _0)]
    Unsupported(UnsupportedGameKind),
}

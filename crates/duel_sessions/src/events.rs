//! What sessions report to the outside world.
//!
//! The registry emits a [`SessionSnapshot`] after every accepted action and
//! a [`TerminalNotice`] whenever a round or a session ends. Outcome
//! bookkeeping for long-term stats goes to an [`OutcomeRecorder`].

use crate::ids::{Mode, Participant, Seat, SessionId};
use crate::ledger::ScoreLedger;
use crate::session::{Phase, RematchConsent, RoundOutcome, TableView};
use derive_more::Display;
use duel_games::{Board, GameKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Serializable view of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session id.
    pub id: SessionId,
    /// Game being played.
    pub kind: GameKind,
    /// Player or AI opponent.
    pub mode: Mode,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Board or throws, as visible to both players.
    pub table: TableView,
    /// Who moves next, while a round is active.
    pub turn_owner: Option<Participant>,
    /// Lineage scores.
    pub ledger: ScoreLedger,
    /// Rematch votes so far.
    pub consent: RematchConsent,
    /// 1-based round number.
    pub round: u32,
    /// Outcome of the round just finished.
    pub last_outcome: Option<RoundOutcome>,
}

impl SessionSnapshot {
    /// The board, for grid games.
    pub fn board(&self) -> Option<&Board> {
        self.table.board()
    }
}

/// Why a round or session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalReason {
    /// The seat won the round.
    #[display("won by {}", _0)]
    Won(Seat),
    /// The round was drawn.
    #[display("drawn")]
    Drawn,
    /// Nobody acted before the phase deadline.
    #[display("timed out in {}", _0)]
    TimedOut(Phase),
    /// A participant cancelled.
    #[display("cancelled")]
    Cancelled,
}

impl From<RoundOutcome> for TerminalReason {
    fn from(outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::Won(seat) => TerminalReason::Won(seat),
            RoundOutcome::Drawn => TerminalReason::Drawn,
        }
    }
}

/// Emitted when a round resolves or a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalNotice {
    /// Session id at the time of the event.
    pub id: SessionId,
    /// Game that was played.
    pub kind: GameKind,
    /// What happened.
    pub reason: TerminalReason,
    /// Lineage scores after the event.
    pub ledger: ScoreLedger,
}

/// One participant's result for a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Outcome {
    /// Won the round.
    Win,
    /// Lost the round.
    Loss,
    /// Drew the round.
    Draw,
}

impl Outcome {
    /// Result for `seat` given how the round ended.
    pub fn for_seat(round: RoundOutcome, seat: Seat) -> Self {
        match round {
            RoundOutcome::Won(winner) if winner == seat => Outcome::Win,
            RoundOutcome::Won(_) => Outcome::Loss,
            RoundOutcome::Drawn => Outcome::Draw,
        }
    }
}

/// Receives session events.
pub trait SessionObserver {
    /// Called after an accepted action or a new session.
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot);

    /// Called when a round resolves or the session ends.
    fn on_terminal(&mut self, notice: &TerminalNotice);
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        debug!(
            id = %snapshot.id,
            phase = %snapshot.phase,
            round = snapshot.round,
            "Session snapshot"
        );
    }

    fn on_terminal(&mut self, notice: &TerminalNotice) {
        info!(
            id = %notice.id,
            kind = %notice.kind,
            reason = %notice.reason,
            draws = *notice.ledger.draws(),
            "Session event"
        );
    }
}

/// Receives per-participant results for long-term stats.
pub trait OutcomeRecorder {
    /// Called once per participant for every resolved round.
    fn record_outcome(
        &mut self,
        participant: &Participant,
        kind: GameKind,
        outcome: Outcome,
        vs_ai: bool,
    );
}

/// Discards outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl OutcomeRecorder for NoopRecorder {
    fn record_outcome(&mut self, _: &Participant, _: GameKind, _: Outcome, _: bool) {}
}

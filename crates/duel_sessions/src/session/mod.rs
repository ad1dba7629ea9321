//! The per-session state machine.
//!
//! A [`Session`] is a plain value: it never looks at a clock or a channel.
//! Callers pass the current [`Instant`] in, and read back the armed
//! deadline through [`Session::ticket`] and [`Session::deadline`].
//!
//! Every action is validated against the current phase before anything
//! changes. A rejected action returns an error and leaves the session exactly
//! as it was.

mod action;
mod error;
mod phase;
mod table;

pub use action::Action;
pub use error::{ActionError, CreateError, GuardViolation};
pub use phase::{Phase, PhaseTicket, PhaseTimeouts, RematchConsent};
pub use table::{Table, TableView, Throws};

use crate::events::{SessionSnapshot, TerminalReason};
use crate::ids::{Mode, Participant, PlayerId, Seat, SessionId};
use crate::ledger::ScoreLedger;
use derive_getters::Getters;
use duel_games::{
    Board, BoardStep, BoardStepInvariants, Classification, GameKind, Hand, InvariantSet,
    SearchEngine, Showdown, classify, showdown,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RoundOutcome {
    /// The seat won the round.
    #[display("won by {}", _0)]
    Won(Seat),
    /// Nobody won the round.
    #[display("drawn")]
    Drawn,
}

/// Something an accepted action caused, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Seat B was taken.
    Joined(Participant),
    /// A mark was placed.
    Moved {
        /// Seat that moved.
        seat: Seat,
        /// Cell index or column.
        position: usize,
    },
    /// A hand was thrown.
    Thrown {
        /// Seat that threw.
        seat: Seat,
        /// The hand.
        hand: Hand,
    },
    /// The round ended and the ledger was updated.
    Resolved(RoundOutcome),
    /// A rematch vote was counted.
    Voted(Seat),
    /// Consent was reached and a fresh round started.
    NewRound,
    /// The session reached `Terminal`.
    Ended(TerminalReason),
}

/// What a session needs from its owner to process one action.
pub struct ActionContext<'a, R: ?Sized> {
    /// Engine used for AI moves on a board.
    pub engine: &'a SearchEngine,
    /// Randomness for the engine and AI throws.
    pub rng: &'a mut R,
    /// Deadlines armed on phase entry.
    pub timeouts: &'a PhaseTimeouts,
    /// Current time.
    pub now: Instant,
}

/// One two-seat game session and its rematch lineage.
#[derive(Debug, Clone, Getters)]
pub struct Session {
    /// Current id. Changes when a rematch round starts.
    id: SessionId,
    /// Game played in every round.
    kind: GameKind,
    /// Who fills seat B.
    mode: Mode,
    /// The creator, seat A.
    participant_a: PlayerId,
    /// Seat B, once joined.
    participant_b: Option<Participant>,
    /// Lifecycle phase.
    phase: Phase,
    /// Seat to move next on a board.
    turn: Seat,
    /// Current round state.
    table: Table,
    /// Scores for the lineage.
    ledger: ScoreLedger,
    /// Rematch votes.
    consent: RematchConsent,
    /// 1-based round number within the lineage.
    round: u32,
    /// Outcome of the most recent round while rematch is pending.
    last_outcome: Option<RoundOutcome>,
    /// Deadline of the current phase.
    deadline: Option<Instant>,
    /// Increases on every phase entry.
    epoch: u64,
}

impl Session {
    /// Creates a session.
    ///
    /// Against a player the session waits in the lobby. Against the AI it
    /// starts at once with seat B taken by [`Participant::Ai`].
    pub fn new(
        id: SessionId,
        table: Table,
        creator: PlayerId,
        mode: Mode,
        timeouts: &PhaseTimeouts,
        now: Instant,
    ) -> Self {
        let (phase, participant_b) = match mode {
            Mode::VsPlayer => (Phase::LobbyWaiting, None),
            Mode::VsAi => (Phase::Active, Some(Participant::Ai)),
        };
        let mut session = Self {
            id,
            kind: table.kind(),
            mode,
            participant_a: creator,
            participant_b,
            phase,
            turn: Seat::A,
            table,
            ledger: ScoreLedger::new(),
            consent: RematchConsent::default(),
            round: 1,
            last_outcome: None,
            deadline: None,
            epoch: 0,
        };
        session.enter(phase, timeouts, now);
        session
    }

    /// Returns the seat held by `actor`, if any.
    pub fn seat_of(&self, actor: &PlayerId) -> Option<Seat> {
        if *actor == self.participant_a {
            return Some(Seat::A);
        }
        match &self.participant_b {
            Some(Participant::Player(b)) if b == actor => Some(Seat::B),
            _ => None,
        }
    }

    /// Returns whoever holds `seat`.
    pub fn occupant(&self, seat: Seat) -> Option<Participant> {
        match seat {
            Seat::A => Some(Participant::Player(self.participant_a.clone())),
            Seat::B => self.participant_b.clone(),
        }
    }

    /// Returns the participant expected to move, while a board round is
    /// active. Throws are simultaneous and have no turn owner.
    pub fn turn_owner(&self) -> Option<Participant> {
        match (self.phase, &self.table) {
            (Phase::Active, Table::Grid(_)) => self.occupant(self.turn),
            _ => None,
        }
    }

    /// The board, for grid games.
    pub fn board(&self) -> Option<&Board> {
        self.table.board()
    }

    /// Identifies the deadline armed for the current phase.
    pub fn ticket(&self) -> PhaseTicket {
        PhaseTicket {
            phase: self.phase,
            epoch: self.epoch,
        }
    }

    /// Returns a serializable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            kind: self.kind,
            mode: self.mode,
            phase: self.phase,
            table: self.table.view(),
            turn_owner: self.turn_owner(),
            ledger: self.ledger,
            consent: self.consent,
            round: self.round,
            last_outcome: self.last_outcome,
        }
    }

    pub(crate) fn rekey(&mut self, id: SessionId) {
        self.id = id;
    }

    fn enter(&mut self, phase: Phase, timeouts: &PhaseTimeouts, now: Instant) {
        self.phase = phase;
        self.epoch += 1;
        self.deadline = timeouts.for_phase(phase).map(|d| now + d);
        debug!(id = %self.id, %phase, epoch = self.epoch, "Entered phase");
    }

    fn require_phase(&self, expected: Phase) -> Result<(), GuardViolation> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GuardViolation::WrongPhase { phase: self.phase })
        }
    }

    /// Applies `action` from `actor`.
    ///
    /// # Errors
    ///
    /// [`ActionError::Guard`] if the action breaks a rule, and
    /// [`ActionError::Search`] if the AI could not reply. Neither changes
    /// the session.
    #[instrument(skip(self, ctx), fields(id = %self.id, phase = %self.phase))]
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        actor: &PlayerId,
        action: Action,
        ctx: &mut ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, ActionError> {
        match action {
            Action::Join => Ok(self.join(actor, ctx)?),
            Action::Cancel => Ok(self.cancel(actor, ctx)?),
            Action::Move(position) => self.play(actor, position, ctx),
            Action::Throw(hand) => self.throw(actor, hand, ctx),
            Action::RematchVote => Ok(self.vote(actor, ctx)?),
        }
    }

    fn join<R: ?Sized>(
        &mut self,
        actor: &PlayerId,
        ctx: &ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, GuardViolation> {
        self.require_phase(Phase::LobbyWaiting)?;
        if *actor == self.participant_a {
            return Err(GuardViolation::CannotJoinSelf);
        }
        let guest = Participant::Player(actor.clone());
        self.participant_b = Some(guest.clone());
        self.turn = Seat::A;
        self.enter(Phase::Active, ctx.timeouts, ctx.now);
        info!(id = %self.id, guest = %guest, "Player joined");
        Ok(vec![Effect::Joined(guest)])
    }

    fn cancel<R: ?Sized>(
        &mut self,
        actor: &PlayerId,
        ctx: &ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, GuardViolation> {
        match self.phase {
            Phase::LobbyWaiting => {
                if *actor != self.participant_a {
                    return Err(GuardViolation::OnlyCreatorMayCancel);
                }
            }
            Phase::Active | Phase::RematchPending => {
                self.seat_of(actor).ok_or(GuardViolation::NotParticipant)?;
            }
            phase => return Err(GuardViolation::WrongPhase { phase }),
        }
        self.enter(Phase::Terminal, ctx.timeouts, ctx.now);
        info!(id = %self.id, actor = %actor, "Session cancelled");
        Ok(vec![Effect::Ended(TerminalReason::Cancelled)])
    }

    fn play<R: Rng + ?Sized>(
        &mut self,
        actor: &PlayerId,
        position: usize,
        ctx: &mut ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, ActionError> {
        self.require_phase(Phase::Active)?;
        let seat = self.seat_of(actor).ok_or(GuardViolation::NotParticipant)?;
        if seat != self.turn {
            return Err(GuardViolation::NotYourTurn.into());
        }

        let Table::Grid(current) = self.table else {
            return Err(GuardViolation::WrongGame { kind: self.kind }.into());
        };
        let mut board = current
            .place(position, seat.mark())
            .map_err(GuardViolation::IllegalPlacement)?;
        debug_check_step(&current, &board);
        let mut effects = vec![Effect::Moved { seat, position }];
        let mut turn = seat.other();
        let mut verdict = classify(&board);

        if !verdict.is_terminal() && self.occupant(turn).is_some_and(|p| p.is_ai()) {
            let ai = turn.mark();
            let reply = ctx
                .engine
                .best_move(&board, ai, ai.opponent(), &mut *ctx.rng)?;
            let next = board.place(reply, ai).map_err(ActionError::AiPlacement)?;
            debug_check_step(&board, &next);
            effects.push(Effect::Moved {
                seat: turn,
                position: reply,
            });
            board = next;
            turn = turn.other();
            verdict = classify(&board);
        }

        self.table = Table::Grid(board);
        self.turn = turn;
        let outcome = match verdict {
            Classification::Undecided => None,
            Classification::WonBy(mark) => Some(RoundOutcome::Won(Seat::of_mark(mark))),
            Classification::Drawn => Some(RoundOutcome::Drawn),
        };
        if let Some(outcome) = outcome {
            self.resolve(outcome, ctx);
            effects.push(Effect::Resolved(outcome));
        }
        Ok(effects)
    }

    fn throw<R: Rng + ?Sized>(
        &mut self,
        actor: &PlayerId,
        hand: Hand,
        ctx: &mut ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, ActionError> {
        self.require_phase(Phase::Active)?;
        let seat = self.seat_of(actor).ok_or(GuardViolation::NotParticipant)?;
        let Table::Throws(mut throws) = self.table else {
            return Err(GuardViolation::WrongGame { kind: self.kind }.into());
        };
        if throws.get(seat).is_some() {
            return Err(GuardViolation::AlreadyThrown.into());
        }

        throws.set(seat, hand);
        let mut effects = vec![Effect::Thrown { seat, hand }];
        let other = seat.other();
        if throws.get(other).is_none() && self.occupant(other).is_some_and(|p| p.is_ai()) {
            let reply = Hand::random(&mut *ctx.rng);
            throws.set(other, reply);
            effects.push(Effect::Thrown {
                seat: other,
                hand: reply,
            });
        }

        self.table = Table::Throws(throws);
        if let Some((a, b)) = throws.both() {
            let outcome = match showdown(a, b) {
                Showdown::FirstWins => RoundOutcome::Won(Seat::A),
                Showdown::SecondWins => RoundOutcome::Won(Seat::B),
                Showdown::Tie => RoundOutcome::Drawn,
            };
            self.resolve(outcome, ctx);
            effects.push(Effect::Resolved(outcome));
        }
        Ok(effects)
    }

    fn resolve<R: ?Sized>(&mut self, outcome: RoundOutcome, ctx: &ActionContext<'_, R>) {
        self.enter(Phase::Resolved, ctx.timeouts, ctx.now);
        match outcome {
            RoundOutcome::Won(seat) => self.ledger.record_win(seat),
            RoundOutcome::Drawn => self.ledger.record_draw(),
        }
        self.last_outcome = Some(outcome);
        self.consent.reset();
        info!(id = %self.id, round = self.round, %outcome, "Round resolved");
        self.enter(Phase::RematchPending, ctx.timeouts, ctx.now);
    }

    fn vote<R: ?Sized>(
        &mut self,
        actor: &PlayerId,
        ctx: &ActionContext<'_, R>,
    ) -> Result<Vec<Effect>, GuardViolation> {
        self.require_phase(Phase::RematchPending)?;
        let seat = self.seat_of(actor).ok_or(GuardViolation::NotParticipant)?;
        self.consent.vote(seat);
        let mut effects = vec![Effect::Voted(seat)];
        if self.consent.satisfied(self.mode) {
            self.table = self.table.cleared();
            self.turn = Seat::A;
            self.consent.reset();
            self.round += 1;
            self.last_outcome = None;
            self.enter(Phase::Active, ctx.timeouts, ctx.now);
            info!(id = %self.id, round = self.round, "Rematch started");
            effects.push(Effect::NewRound);
        }
        Ok(effects)
    }

    /// Ends the session if `ticket` still names the current phase.
    ///
    /// Returns false, changing nothing, for a ticket left over from an
    /// earlier phase entry.
    pub fn expire(&mut self, ticket: PhaseTicket) -> bool {
        if ticket != self.ticket() || self.deadline.is_none() {
            return false;
        }
        self.phase = Phase::Terminal;
        self.epoch += 1;
        self.deadline = None;
        info!(id = %self.id, phase = %ticket.phase, "Session timed out");
        true
    }
}

fn debug_check_step(before: &Board, after: &Board) {
    let step = BoardStep { before, after };
    debug_assert!(
        <BoardStepInvariants as InvariantSet<BoardStep<'_>>>::check_all(&step).is_ok(),
        "placement broke a board invariant"
    );
}

//! The session registry.
//!
//! Owns every live session together with the search engine, the
//! randomness, and the event sinks. It does no I/O and never reads the clock;
//! the supervisor or a test drives it with explicit instants.

use crate::config::ArenaConfig;
use crate::events::{
    NoopRecorder, Outcome, OutcomeRecorder, SessionObserver, SessionSnapshot, TerminalNotice,
    TerminalReason, TracingObserver,
};
use crate::ids::{Mode, Participant, PlayerId, Seat, SessionId};
use crate::session::{
    Action, ActionContext, ActionError, CreateError, Effect, Phase, PhaseTicket, PhaseTimeouts,
    RoundOutcome, Session, Table,
};
use duel_games::{GameKind, Hand, SearchEngine};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Id the session lives under after the action.
    pub id: SessionId,
    /// State after the action. For a cancelled session, its final state.
    pub snapshot: SessionSnapshot,
    /// Position the AI replied with, if it moved.
    pub ai_move: Option<usize>,
    /// Hand the AI threw, if it threw.
    pub ai_throw: Option<Hand>,
    /// How the round ended, if this action ended it.
    pub resolution: Option<RoundOutcome>,
}

/// What happened when a deadline was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TimeoutOutcome {
    /// The session timed out and was removed.
    Fired,
    /// The ticket is from an earlier phase entry. Nothing changed.
    Stale,
    /// The deadline has not passed yet. Nothing changed.
    NotDue,
    /// No session has this id.
    Unknown,
}

/// All live sessions plus the services they use.
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
    timeouts: PhaseTimeouts,
    engine: SearchEngine,
    rng: StdRng,
    observer: Box<dyn SessionObserver + Send>,
    recorder: Box<dyn OutcomeRecorder + Send>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("next_id", &self.next_id)
            .field("timeouts", &self.timeouts)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    ///
    /// Seeds the rng from [`ArenaConfig::rng_seed`] when set, otherwise from
    /// the OS.
    pub fn new(config: &ArenaConfig) -> Self {
        let rng = match config.rng_seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            sessions: HashMap::new(),
            next_id: 1,
            timeouts: config.timeouts(),
            engine: SearchEngine::new(*config.search()),
            rng,
            observer: Box::new(TracingObserver),
            recorder: Box::new(NoopRecorder),
        }
    }

    /// Replaces the event observer.
    pub fn with_observer(mut self, observer: impl SessionObserver + Send + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replaces the outcome recorder.
    pub fn with_recorder(mut self, recorder: impl OutcomeRecorder + Send + 'static) -> Self {
        self.recorder = Box::new(recorder);
        self
    }

    /// Replaces the rng.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    fn mint_id(&mut self) -> SessionId {
        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Opens a session for `kind` created by `creator`.
    ///
    /// # Errors
    ///
    /// [`CreateError::Unsupported`] for games without session rules.
    #[instrument(skip(self, now))]
    pub fn create(
        &mut self,
        kind: GameKind,
        creator: PlayerId,
        mode: Mode,
        now: Instant,
    ) -> Result<SessionId, CreateError> {
        let table = Table::for_kind(kind)?;
        let id = self.mint_id();
        let session = Session::new(id, table, creator, mode, &self.timeouts, now);
        info!(%id, %kind, %mode, "Session created");
        self.observer.on_snapshot(&session.snapshot());
        self.sessions.insert(id, session);
        Ok(id)
    }

    /// Returns the live session with this id.
    pub fn get(&self, id: SessionId) -> Result<&Session, ActionError> {
        self.sessions
            .get(&id)
            .ok_or(ActionError::SessionExpiredOrUnknown(id))
    }

    /// Returns a snapshot of the live session with this id.
    pub fn snapshot(&self, id: SessionId) -> Result<SessionSnapshot, ActionError> {
        self.get(id).map(Session::snapshot)
    }

    /// Drops a session without emitting anything.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Ids of every live session, in creation order.
    pub fn ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Earliest armed deadline across all sessions.
    pub fn next_deadline(&self) -> Option<(Instant, SessionId, PhaseTicket)> {
        self.sessions
            .values()
            .filter_map(|s| (*s.deadline()).map(|at| (at, *s.id(), s.ticket())))
            .min_by_key(|(at, id, _)| (*at, *id))
    }

    /// Applies `action` from `actor` to session `id`.
    ///
    /// When a rematch round starts, the session moves to a fresh id and the
    /// old one stops resolving. A cancelled session is removed.
    ///
    /// # Errors
    ///
    /// [`ActionError::SessionExpiredOrUnknown`] for an id with no live
    /// session. Guard and search failures leave the session as it was.
    #[instrument(skip(self, now), fields(actor = %actor))]
    pub fn submit(
        &mut self,
        id: SessionId,
        actor: &PlayerId,
        action: Action,
        now: Instant,
    ) -> Result<ActionReport, ActionError> {
        let Some(mut session) = self.sessions.remove(&id) else {
            debug!("Action for unknown session");
            return Err(ActionError::SessionExpiredOrUnknown(id));
        };

        let mut ctx = ActionContext {
            engine: &self.engine,
            rng: &mut self.rng,
            timeouts: &self.timeouts,
            now,
        };
        let effects = match session.apply(actor, action, &mut ctx) {
            Ok(effects) => effects,
            Err(err) => {
                warn!(error = %err, "Action rejected");
                self.sessions.insert(id, session);
                return Err(err);
            }
        };

        let vs_ai = *session.mode() == Mode::VsAi;
        let mut ai_move = None;
        let mut ai_throw = None;
        let mut resolution = None;
        for effect in &effects {
            match effect {
                Effect::Moved {
                    seat: Seat::B,
                    position,
                } if vs_ai => ai_move = Some(*position),
                Effect::Thrown {
                    seat: Seat::B,
                    hand,
                } if vs_ai => ai_throw = Some(*hand),
                Effect::Resolved(outcome) => {
                    resolution = Some(*outcome);
                    self.record(&session, *outcome);
                }
                Effect::NewRound => {
                    let fresh = self.mint_id();
                    session.rekey(fresh);
                    info!(old = %id, new = %fresh, "Session moved to a new id");
                }
                Effect::Ended(reason) => self.notify(&session, *reason),
                Effect::Joined(_)
                | Effect::Moved { .. }
                | Effect::Thrown { .. }
                | Effect::Voted(_) => {}
            }
        }

        let snapshot = session.snapshot();
        let live_id = *session.id();
        self.observer.on_snapshot(&snapshot);
        if *session.phase() != Phase::Terminal {
            self.sessions.insert(live_id, session);
        }
        Ok(ActionReport {
            id: live_id,
            snapshot,
            ai_move,
            ai_throw,
            resolution,
        })
    }

    /// Delivers the deadline identified by `ticket` to session `id`.
    #[instrument(skip(self, now))]
    pub fn fire_timeout(
        &mut self,
        id: SessionId,
        ticket: PhaseTicket,
        now: Instant,
    ) -> TimeoutOutcome {
        let Some(session) = self.sessions.get_mut(&id) else {
            return TimeoutOutcome::Unknown;
        };
        if session.ticket() != ticket {
            debug!("Stale timeout ignored");
            return TimeoutOutcome::Stale;
        }
        if (*session.deadline()).is_none_or(|at| now < at) {
            return TimeoutOutcome::NotDue;
        }
        if !session.expire(ticket) {
            return TimeoutOutcome::Stale;
        }
        if let Some(session) = self.sessions.remove(&id) {
            self.observer.on_snapshot(&session.snapshot());
            self.notify(&session, TerminalReason::TimedOut(ticket.phase));
        }
        TimeoutOutcome::Fired
    }

    /// Fires every deadline that has passed by `now`.
    ///
    /// Returns the ids of the sessions that timed out.
    pub fn expire_due(&mut self, now: Instant) -> Vec<SessionId> {
        let due: Vec<_> = self
            .sessions
            .values()
            .filter(|s| (*s.deadline()).is_some_and(|at| at <= now))
            .map(|s| (*s.id(), s.ticket()))
            .collect();
        let mut fired: Vec<_> = due
            .into_iter()
            .filter(|(id, ticket)| self.fire_timeout(*id, *ticket, now) == TimeoutOutcome::Fired)
            .map(|(id, _)| id)
            .collect();
        fired.sort();
        fired
    }

    fn record(&mut self, session: &Session, outcome: RoundOutcome) {
        let vs_ai = *session.mode() == Mode::VsAi;
        for seat in [Seat::A, Seat::B] {
            let participant = session.occupant(seat).unwrap_or(Participant::Ai);
            self.recorder.record_outcome(
                &participant,
                *session.kind(),
                Outcome::for_seat(outcome, seat),
                vs_ai,
            );
        }
        self.notify(session, outcome.into());
    }

    fn notify(&mut self, session: &Session, reason: TerminalReason) {
        self.observer.on_terminal(&TerminalNotice {
            id: *session.id(),
            kind: *session.kind(),
            reason,
            ledger: *session.ledger(),
        });
    }
}

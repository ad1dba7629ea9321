//! Duel sessions - lifecycle, matchmaking, and rematches for two-party duels.
//!
//! A [`SessionRegistry`] owns every live [`Session`]. Sessions play
//! tic-tac-toe, connect-four, or rock-paper-scissors. Each session walks
//! the phases lobby, active, resolved, rematch pending, and terminal, and
//! every phase except resolved carries a deadline. The
//! [`supervisor`](spawn) task owns a registry and drives those deadlines
//! on the tokio clock.
//!
//! # Example
//!
//! ```
//! use duel_sessions::{Action, ArenaConfig, Mode, Phase, SessionRegistry};
//! use duel_games::GameKind;
//! use tokio::time::Instant;
//!
//! let mut registry = SessionRegistry::new(&ArenaConfig::default().with_rng_seed(1));
//! let now = Instant::now();
//! let id = registry.create(GameKind::TicTacToe, "ana".into(), Mode::VsPlayer, now)?;
//! let report = registry.submit(id, &"bo".into(), Action::Join, now)?;
//! assert_eq!(report.snapshot.phase, Phase::Active);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod events;
mod ids;
mod ledger;
mod registry;
mod session;
mod supervisor;

pub use config::{ArenaConfig, ConfigError};
pub use events::{
    NoopRecorder, Outcome, OutcomeRecorder, SessionObserver, SessionSnapshot, TerminalNotice,
    TerminalReason, TracingObserver,
};
pub use ids::{Mode, Participant, PlayerId, Seat, SessionId};
pub use ledger::{ScoreLedger, SeatScore};
pub use registry::{ActionReport, SessionRegistry, TimeoutOutcome};
pub use session::{
    Action, ActionContext, ActionError, CreateError, Effect, GuardViolation, Phase, PhaseTicket,
    PhaseTimeouts, RematchConsent, RoundOutcome, Session, Table, TableView, Throws,
};
pub use supervisor::{SupervisorError, SupervisorHandle, spawn};

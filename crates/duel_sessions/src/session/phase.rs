//! Lifecycle phases and the bookkeeping attached to them.

use crate::ids::{Mode, Seat};
use derive_getters::Getters;
use derive_new::new;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Phase {
    /// Waiting for a second player to join.
    LobbyWaiting,
    /// A round is being played.
    Active,
    /// The round just ended and the ledger is being updated.
    Resolved,
    /// Waiting for rematch votes.
    RematchPending,
    /// Finished; the session is evicted.
    Terminal,
}

/// Identifies one armed deadline: the phase it belongs to and the
/// phase-entry counter at the time it was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseTicket {
    /// Phase the deadline was armed for.
    pub phase: Phase,
    /// Phase-entry counter when it was armed.
    pub epoch: u64,
}

/// Per-phase deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct PhaseTimeouts {
    /// Lobby wait before the session is abandoned.
    lobby: Duration,
    /// Time allowed for one round.
    active: Duration,
    /// Time allowed to agree on a rematch.
    rematch: Duration,
}

impl PhaseTimeouts {
    /// Deadline length for `phase`, or `None` for phases without one.
    pub fn for_phase(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::LobbyWaiting => Some(self.lobby),
            Phase::Active => Some(self.active),
            Phase::RematchPending => Some(self.rematch),
            Phase::Resolved | Phase::Terminal => None,
        }
    }
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(60),
            Duration::from_secs(300),
            Duration::from_secs(120),
        )
    }
}

/// Rematch votes, cleared whenever negotiation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct RematchConsent {
    /// Seat A voted to continue.
    a: bool,
    /// Seat B voted to continue.
    b: bool,
}

impl RematchConsent {
    /// Clears both votes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a vote from `seat`. Voting twice changes nothing.
    pub fn vote(&mut self, seat: Seat) {
        match seat {
            Seat::A => self.a = true,
            Seat::B => self.b = true,
        }
    }

    /// Returns true once every required seat has voted.
    ///
    /// Against the AI only seat A votes.
    pub fn satisfied(&self, mode: Mode) -> bool {
        match mode {
            Mode::VsPlayer => self.a && self.b,
            Mode::VsAi => self.a,
        }
    }
}

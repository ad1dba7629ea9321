//! Per-lineage score keeping.

use crate::ids::Seat;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Counters for one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct SeatScore {
    /// Rounds won.
    wins: u32,
    /// Rounds lost.
    losses: u32,
    /// Consecutive wins up to now.
    streak: u32,
    /// Longest streak seen in this lineage.
    best_streak: u32,
}

/// Scores for a lineage of rematch rounds.
///
/// Created empty with the session, carried across rematches, and dropped
/// with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct ScoreLedger {
    /// Seat A's counters.
    a: SeatScore,
    /// Seat B's counters.
    b: SeatScore,
    /// Drawn rounds, shared by both seats.
    draws: u32,
}

impl ScoreLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counters for `seat`.
    pub fn seat(&self, seat: Seat) -> &SeatScore {
        match seat {
            Seat::A => &self.a,
            Seat::B => &self.b,
        }
    }

    fn seat_mut(&mut self, seat: Seat) -> &mut SeatScore {
        match seat {
            Seat::A => &mut self.a,
            Seat::B => &mut self.b,
        }
    }

    /// Records a round won by `winner`.
    #[instrument(skip(self))]
    pub fn record_win(&mut self, winner: Seat) {
        let w = self.seat_mut(winner);
        w.wins += 1;
        w.streak += 1;
        w.best_streak = w.best_streak.max(w.streak);

        let l = self.seat_mut(winner.other());
        l.losses += 1;
        l.streak = 0;
    }

    /// Records a drawn round.
    #[instrument(skip(self))]
    pub fn record_draw(&mut self) {
        self.draws += 1;
        self.a.streak = 0;
        self.b.streak = 0;
    }

    /// Total rounds resolved in this lineage.
    pub fn games_played(&self) -> u32 {
        self.a.wins + self.b.wins + self.draws
    }
}

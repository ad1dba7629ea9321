//! Rock-paper-scissors hands.

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// One throw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Hand {
    /// Beats scissors.
    #[display("rock")]
    Rock,
    /// Beats rock.
    #[display("paper")]
    Paper,
    /// Beats paper.
    #[display("scissors")]
    Scissors,
}

/// Result of two simultaneous throws, from the first thrower's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Showdown {
    /// The first hand wins.
    FirstWins,
    /// The second hand wins.
    SecondWins,
    /// Same hand.
    Tie,
}

impl Hand {
    /// Every hand, in a fixed order.
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// The hand this one defeats.
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Paper => Hand::Rock,
            Hand::Scissors => Hand::Paper,
        }
    }

    /// Picks a hand uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Hand {
        Hand::ALL[rng.random_range(0..Hand::ALL.len())]
    }
}

/// Compares two throws.
pub fn showdown(first: Hand, second: Hand) -> Showdown {
    if first == second {
        Showdown::Tie
    } else if first.beats() == second {
        Showdown::FirstWins
    } else {
        Showdown::SecondWins
    }
}

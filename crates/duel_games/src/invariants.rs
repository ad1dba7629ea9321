//! First-class invariants over a single placement.
//!
//! Invariants are logical properties that must hold across every move. They
//! are testable independently and checked by sessions in debug builds.

use crate::board::Board;
use crate::types::{Cell, Mark};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, d)| InvariantViolation::new(d))
        .collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, d)| InvariantViolation::new(d))
        .collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// A board before and after one placement.
#[derive(Debug, Clone, Copy)]
pub struct BoardStep<'a> {
    /// Board before the move.
    pub before: &'a Board,
    /// Board after the move.
    pub after: &'a Board,
}

/// Invariant: a filled cell never changes or empties.
pub struct MonotonicOccupancy;

impl Invariant<BoardStep<'_>> for MonotonicOccupancy {
    fn holds(step: &BoardStep<'_>) -> bool {
        step.before.kind() == step.after.kind()
            && step
                .before
                .cells()
                .zip(step.after.cells())
                .all(|(b, a)| b == Cell::Empty || b == a)
    }

    fn description() -> &'static str {
        "Filled cells are never overwritten or cleared"
    }
}

/// Invariant: exactly one cell was filled.
pub struct SinglePlacement;

impl Invariant<BoardStep<'_>> for SinglePlacement {
    fn holds(step: &BoardStep<'_>) -> bool {
        step.after.occupied_count() == step.before.occupied_count() + 1
    }

    fn description() -> &'static str {
        "Each move fills exactly one cell"
    }
}

/// Invariant: X moves first and the players alternate.
pub struct BalancedMarks;

impl Invariant<BoardStep<'_>> for BalancedMarks {
    fn holds(step: &BoardStep<'_>) -> bool {
        let x = step.after.count(Mark::X);
        let o = step.after.count(Mark::O);
        x == o || x == o + 1
    }

    fn description() -> &'static str {
        "X leads O by at most one mark"
    }
}

/// Every invariant checked after a session placement.
pub type BoardStepInvariants = (MonotonicOccupancy, SinglePlacement, BalancedMarks);

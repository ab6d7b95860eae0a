//! Search policies.
//!
//! Every route mode runs the same label-setting search; a policy decides
//! which hops are usable from the instant the traveller is at a stop, what
//! each usable hop costs, and when one label at a stop makes another one
//! redundant.

use std::fmt;
use std::ops::Add;

use crate::domain::ClockTime;
use crate::network::Hop;

/// Cost and instant of a partial path ending at some stop.
pub type LabelKey<C> = (C, ClockTime);

/// Availability, cost and dominance rules for one route mode.
///
/// `current` is the instant reached at the hop's tail: the query start for
/// the search origin, otherwise the `reaches` instant of the last hop of
/// the partial path.
pub trait SearchPolicy {
    /// Accumulated path cost. Hop costs are never negative, so a path
    /// never costs less than any of its prefixes.
    type Cost: Copy + Ord + Default + Add<Output = Self::Cost> + fmt::Debug;

    /// Whether `hop` can be taken from a stop reached at `current`.
    fn is_available(&self, current: ClockTime, hop: &Hop) -> bool;

    /// Cost of taking `hop` from a stop reached at `current`.
    fn cost(&self, current: ClockTime, hop: &Hop) -> Self::Cost;

    /// Whether `label` is at least as good as `other` at the same stop,
    /// both now and for every way of continuing from it.
    fn dominates(&self, label: LabelKey<Self::Cost>, other: LabelKey<Self::Cost>) -> bool;
}

/// Fewest departures ridden.
///
/// A label with more hops can still arrive earlier and catch a connection
/// the fewer-hop label misses, so labels are pruned only by both
/// criteria together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shortest;

impl SearchPolicy for Shortest {
    type Cost = u64;

    fn is_available(&self, current: ClockTime, hop: &Hop) -> bool {
        hop.leaves >= current
    }

    fn cost(&self, _current: ClockTime, _hop: &Hop) -> u64 {
        1
    }

    fn dominates(&self, (hops, arrival): LabelKey<u64>, other: LabelKey<u64>) -> bool {
        hops <= other.0 && arrival <= other.1
    }
}

/// Least elapsed time, waiting included, in seconds.
///
/// Costs telescope: the total cost of a path is its final arrival minus
/// the query start, so this also finds the earliest arrival.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fastest;

impl SearchPolicy for Fastest {
    type Cost = u64;

    fn is_available(&self, current: ClockTime, hop: &Hop) -> bool {
        hop.leaves >= current
    }

    fn cost(&self, current: ClockTime, hop: &Hop) -> u64 {
        u64::from(
            hop.reaches
                .seconds_from_midnight()
                .saturating_sub(current.seconds_from_midnight()),
        )
    }

    fn dominates(&self, (cost, arrival): LabelKey<u64>, other: LabelKey<u64>) -> bool {
        cost <= other.0 && arrival <= other.1
    }
}

/// Cost of a backwards partial plan, compared span first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanCost {
    /// Seconds between leaving the stop and the target arrival
    pub span: u64,
    /// Seconds spent waiting at transfer stops
    pub waiting: u64,
}

impl Add for PlanCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            span: self.span + rhs.span,
            waiting: self.waiting + rhs.waiting,
        }
    }
}

/// Backwards search for the latest-leaving, least-waiting plan that still
/// makes a fixed arrival.
///
/// Runs over a reversed view, so `hop.leaves` is the original arrival and
/// `hop.reaches` the original departure. `current` is the latest instant
/// the traveller may be at the hop's tail.
#[derive(Debug, Clone, Copy)]
pub struct Foremost {
    not_before: ClockTime,
}

impl Foremost {
    /// A policy that never uses departures leaving before `not_before`.
    pub fn new(not_before: ClockTime) -> Self {
        Self { not_before }
    }
}

impl SearchPolicy for Foremost {
    type Cost = PlanCost;

    fn is_available(&self, current: ClockTime, hop: &Hop) -> bool {
        hop.reaches <= current && hop.leaves <= current && hop.reaches >= self.not_before
    }

    fn cost(&self, current: ClockTime, hop: &Hop) -> PlanCost {
        PlanCost {
            span: hop.reaches.abs_diff_secs(current),
            waiting: hop.leaves.abs_diff_secs(current),
        }
    }

    fn dominates(&self, (cost, leave_by): LabelKey<PlanCost>, other: LabelKey<PlanCost>) -> bool {
        let (other_cost, other_leave_by) = other;
        // A later instant keeps every hop the other label can take, and
        // each of those then waits longer by exactly the difference.
        let later_by = leave_by.abs_diff_secs(other_leave_by);
        leave_by >= other_leave_by && cost.waiting + later_by <= other_cost.waiting
    }
}

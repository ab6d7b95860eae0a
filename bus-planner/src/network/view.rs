//! Directional views of a network.
//!
//! The route engine never walks a `TransitNetwork` directly: it walks a
//! `GraphView`, which decides which way edges point. `ForwardView` follows
//! departures in their direction of travel; `ReversedView` walks them
//! backwards, from arrival stop to departure stop, without copying the
//! graph.

use crate::domain::{ClockTime, Departure};

use super::{DepartureId, StopIdx, TransitNetwork};

/// An edge as seen in a view's direction of traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// The underlying departure
    pub id: DepartureId,
    /// Stop the hop leads to
    pub head: StopIdx,
    /// Instant the hop leaves its tail
    pub leaves: ClockTime,
    /// Instant the hop reaches `head`
    pub reaches: ClockTime,
}

/// A traversal direction over a transit network.
pub trait GraphView {
    /// True if hops run against the direction of travel.
    const REVERSED: bool;

    /// The underlying network.
    fn network(&self) -> &TransitNetwork;

    /// Traversable hops out of `stop`.
    ///
    /// Departures whose far end is not a registered stop are skipped.
    fn hops_from(&self, stop: StopIdx) -> impl Iterator<Item = Hop> + '_;

    /// Sort key for an instant reached at a stop: lower is better.
    ///
    /// Forward searches prefer being somewhere early; reversed searches
    /// prefer being able to leave late.
    fn instant_key(instant: ClockTime) -> i64 {
        let secs = i64::from(instant.seconds_from_midnight());
        if Self::REVERSED { -secs } else { secs }
    }

    /// Returns the departure behind a hop.
    fn departure(&self, id: DepartureId) -> &Departure {
        self.network().departure(id)
    }
}

/// Departures in their direction of travel.
#[derive(Debug, Clone, Copy)]
pub struct ForwardView<'a>(pub &'a TransitNetwork);

impl GraphView for ForwardView<'_> {
    const REVERSED: bool = false;

    fn network(&self) -> &TransitNetwork {
        self.0
    }

    fn hops_from(&self, stop: StopIdx) -> impl Iterator<Item = Hop> + '_ {
        self.0.outgoing(stop).iter().filter_map(move |&id| {
            let (_, to) = self.0.endpoints(id);
            let departure = self.0.departure(id);
            to.map(|head| Hop {
                id,
                head,
                leaves: departure.departs,
                reaches: departure.arrives,
            })
        })
    }
}

/// Departures walked backwards.
///
/// A departure `(src, dep, dest, arr)` is seen as a hop from `dest`
/// leaving at `arr` and reaching `src` at `dep`.
#[derive(Debug, Clone, Copy)]
pub struct ReversedView<'a>(pub &'a TransitNetwork);

impl GraphView for ReversedView<'_> {
    const REVERSED: bool = true;

    fn network(&self) -> &TransitNetwork {
        self.0
    }

    fn hops_from(&self, stop: StopIdx) -> impl Iterator<Item = Hop> + '_ {
        self.0.incoming(stop).iter().filter_map(move |&id| {
            let (from, _) = self.0.endpoints(id);
            let departure = self.0.departure(id);
            from.map(|head| Hop {
                id,
                head,
                leaves: departure.arrives,
                reaches: departure.departs,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, Stop};

    fn stop(name: &str) -> Stop {
        Stop::parse(name).unwrap()
    }

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn network() -> TransitNetwork {
        TransitNetwork::assemble(
            [stop("A"), stop("B")],
            [
                Departure::new(stop("A"), stop("B"), t("08:00"), t("08:10"), LineId::new("1")),
                Departure::new(stop("A"), stop("Z"), t("08:00"), t("08:10"), LineId::new("1")),
                Departure::new(stop("Z"), stop("B"), t("09:00"), t("09:10"), LineId::new("1")),
            ],
        )
    }

    #[test]
    fn forward_hops_follow_travel() {
        let network = network();
        let view = ForwardView(&network);
        let a = network.stop_idx("A").unwrap();
        let b = network.stop_idx("B").unwrap();

        let hops: Vec<_> = view.hops_from(a).collect();
        assert_eq!(hops.len(), 1, "edge to unknown stop Z is not traversable");
        assert_eq!(hops[0].head, b);
        assert_eq!(hops[0].leaves, t("08:00"));
        assert_eq!(hops[0].reaches, t("08:10"));
    }

    #[test]
    fn reversed_hops_swap_ends() {
        let network = network();
        let view = ReversedView(&network);
        let a = network.stop_idx("A").unwrap();
        let b = network.stop_idx("B").unwrap();

        let hops: Vec<_> = view.hops_from(b).collect();
        assert_eq!(hops.len(), 1, "edge from unknown stop Z is not traversable");
        assert_eq!(hops[0].head, a);
        assert_eq!(hops[0].leaves, t("08:10"));
        assert_eq!(hops[0].reaches, t("08:00"));
        assert_eq!(view.departure(hops[0].id).source, stop("A"));
    }

    #[test]
    fn instant_preference() {
        assert!(ForwardView::instant_key(t("08:00")) < ForwardView::instant_key(t("09:00")));
        assert!(ReversedView::instant_key(t("09:00")) < ReversedView::instant_key(t("08:00")));
    }
}

//! Label-setting search over a time-dependent graph.
//!
//! One Dijkstra-style loop serves every route mode. A label is one way of
//! reaching a stop: its accumulated cost, the instant it is at the stop,
//! and the hop it came in on. A stop keeps every label no other label at
//! that stop dominates, so a cheap label that arrives late never hides a
//! dearer one that catches more connections. Labels live in query-local
//! vectors, never on the network, so any number of searches can share a
//! snapshot.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use tracing::trace;

use crate::domain::ClockTime;
use crate::network::{DepartureId, GraphView, StopIdx};

use super::engine::RouteError;
use super::policy::SearchPolicy;

/// Index of a label in the query's label arena.
type LabelIdx = usize;

/// One way of reaching a stop.
#[derive(Debug, Clone)]
struct Label<C> {
    cost: C,
    instant: ClockTime,
    /// Label this one extends, and the departure taken from it
    parent: Option<(LabelIdx, DepartureId)>,
    /// False once another label at the same stop dominates it
    live: bool,
}

/// Frontier entry, ordered so that `BinaryHeap` pops the best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<C> {
    cost: C,
    instant_key: i64,
    stop: StopIdx,
    label: LabelIdx,
}

impl<C: Ord> Ord for Entry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped for a min-heap; ties fall back to the instant preference
        // of the view, then to stop identity, then to creation order.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.instant_key.cmp(&self.instant_key))
            .then_with(|| other.stop.cmp(&self.stop))
            .then_with(|| other.label.cmp(&self.label))
    }
}

impl<C: Ord> PartialOrd for Entry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A usable hop out of the stop being expanded:
/// (cost, instant key, head, departure, reaches).
type Candidate<C> = (C, i64, StopIdx, DepartureId, ClockTime);

/// What a finished search found.
#[derive(Debug, Clone)]
pub(crate) struct SearchOutcome {
    /// Departures from origin to target in traversal order, if reached.
    pub path: Option<Vec<DepartureId>>,
    /// Number of labels settled before the search stopped.
    pub settled: usize,
}

/// Query parameters shared by every mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Query {
    pub origin: StopIdx,
    pub target: StopIdx,
    pub start: ClockTime,
    pub deadline: Option<Instant>,
}

/// Run the label-setting search from `query.origin` until a label at
/// `query.target` is settled or the frontier empties.
///
/// Labels settle in cost order and path costs never decrease, so the first
/// settled target label is the cheapest; the view's instant preference
/// breaks cost ties.
///
/// # Errors
///
/// Returns `RouteError::Timeout` if the deadline passes; it is checked
/// once per settled label.
pub(crate) fn label_setting<V, P>(
    view: &V,
    policy: &P,
    query: Query,
) -> Result<SearchOutcome, RouteError>
where
    V: GraphView,
    P: SearchPolicy,
{
    let network = view.network();
    let stop_count = network.stop_count();

    let origin = query.origin.0 as usize;
    let target = query.target.0 as usize;
    if origin >= stop_count || target >= stop_count {
        return Ok(SearchOutcome {
            path: None,
            settled: 0,
        });
    }

    let mut labels: Vec<Label<P::Cost>> = vec![Label {
        cost: P::Cost::default(),
        instant: query.start,
        parent: None,
        live: true,
    }];
    // Live labels per stop; none dominates another
    let mut bags: Vec<Vec<LabelIdx>> = vec![Vec::new(); stop_count];
    bags[origin].push(0);

    let mut frontier = BinaryHeap::new();
    frontier.push(Entry {
        cost: P::Cost::default(),
        instant_key: V::instant_key(query.start),
        stop: query.origin,
        label: 0,
    });

    let mut settled = 0;
    let mut reached = None;

    while let Some(entry) = frontier.pop() {
        if query.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(RouteError::Timeout);
        }

        let label = &labels[entry.label];
        if !label.live {
            continue;
        }
        let current = label.instant;
        let base_cost = label.cost;

        settled += 1;
        trace!(
            stop = %network.stop(entry.stop),
            cost = ?base_cost,
            instant = %current,
            "settled"
        );

        if entry.stop == query.target {
            reached = Some(entry.label);
            break;
        }

        let mut candidates: Vec<Candidate<P::Cost>> = view
            .hops_from(entry.stop)
            .filter(|hop| view.departure(hop.id).is_causal())
            .filter(|hop| policy.is_available(current, hop))
            .map(|hop| {
                (
                    base_cost + policy.cost(current, &hop),
                    V::instant_key(hop.reaches),
                    hop.head,
                    hop.id,
                    hop.reaches,
                )
            })
            .collect();
        // Cheapest first, so a hop dominated by a sibling towards the same
        // stop is dropped rather than inserted and then retired.
        candidates.sort();

        for (cost, instant_key, head, id, reaches) in candidates {
            let bag = &mut bags[head.0 as usize];
            let key = (cost, reaches);

            if bag
                .iter()
                .any(|&idx| policy.dominates((labels[idx].cost, labels[idx].instant), key))
            {
                continue;
            }
            bag.retain(|&idx| {
                let existing = &mut labels[idx];
                let dominated = policy.dominates(key, (existing.cost, existing.instant));
                if dominated {
                    existing.live = false;
                }
                !dominated
            });

            let idx = labels.len();
            labels.push(Label {
                cost,
                instant: reaches,
                parent: Some((entry.label, id)),
                live: true,
            });
            bag.push(idx);
            frontier.push(Entry {
                cost,
                instant_key,
                stop: head,
                label: idx,
            });
        }
    }

    let path = reached.map(|idx| path_to(&labels, idx));
    Ok(SearchOutcome { path, settled })
}

/// Departures leading to `idx`, in traversal order.
fn path_to<C>(labels: &[Label<C>], mut idx: LabelIdx) -> Vec<DepartureId> {
    let mut path = Vec::new();
    while let Some((parent, id)) = labels[idx].parent {
        path.push(id);
        idx = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cost: u64, instant_key: i64, stop: u32) -> Entry<u64> {
        Entry {
            cost,
            instant_key,
            stop: StopIdx(stop),
            label: 0,
        }
    }

    fn label(parent: Option<(LabelIdx, u32)>) -> Label<u64> {
        Label {
            cost: 0,
            instant: ClockTime::parse_hhmm("08:00").unwrap(),
            parent: parent.map(|(idx, id)| (idx, DepartureId(id))),
            live: true,
        }
    }

    #[test]
    fn frontier_pops_cheapest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(5, 0, 0));
        heap.push(entry(1, 0, 1));
        heap.push(entry(3, 0, 2));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(1));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(2));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(0));
    }

    #[test]
    fn frontier_ties_use_instant_then_stop() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(1, 20, 0));
        heap.push(entry(1, 10, 2));
        heap.push(entry(1, 10, 1));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(1));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(2));
        assert_eq!(heap.pop().unwrap().stop, StopIdx(0));
    }

    #[test]
    fn paths_follow_parents_from_the_origin() {
        let labels = vec![
            label(None),
            label(Some((0, 7))),
            label(Some((0, 3))),
            label(Some((1, 4))),
        ];
        assert_eq!(path_to(&labels, 3), vec![DepartureId(7), DepartureId(4)]);
        assert_eq!(path_to(&labels, 2), vec![DepartureId(3)]);
        assert!(path_to(&labels, 0).is_empty());
    }
}

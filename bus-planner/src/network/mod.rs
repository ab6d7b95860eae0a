//! Transit network model.
//!
//! A `TransitNetwork` is an immutable snapshot of one calendar variant of
//! the timetable: its stops, its scheduled departures and the adjacency
//! indices the route engine walks. Networks are never mutated after
//! construction; a schedule change builds a new one.

mod view;

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Departure, Stop};

pub use view::{ForwardView, GraphView, Hop, ReversedView};

/// Dense index of a stop within one network.
///
/// Stops are indexed in ascending name order, so comparing indices
/// compares stop identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopIdx(pub u32);

/// Stable identity of a departure within one network.
///
/// Route queries key their per-edge bookkeeping on this id rather than
/// on the departure itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureId(pub u32);

/// Error from strict network construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// A departure names a stop that is not in the stop set
    #[error("departure {departure} references unknown stop {stop}")]
    UnknownStop { departure: Departure, stop: Stop },

    /// A departure arrives before it leaves
    #[error("departure {0} arrives before it leaves")]
    NonCausal(Departure),
}

/// A departure together with its resolved endpoints.
///
/// Endpoints are `None` only in networks assembled leniently from data
/// that references unknown stops.
#[derive(Debug, Clone)]
struct Edge {
    departure: Departure,
    from: Option<StopIdx>,
    to: Option<StopIdx>,
}

/// Immutable graph of stops and scheduled departures.
#[derive(Debug, Clone, Default)]
pub struct TransitNetwork {
    stops: Vec<Stop>,
    index: HashMap<Stop, StopIdx>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<DepartureId>>,
    incoming: Vec<Vec<DepartureId>>,
}

impl TransitNetwork {
    /// Build a network, rejecting inconsistent input.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any departure references a stop missing from
    /// `stops`, or arrives before it leaves.
    pub fn build(
        stops: impl IntoIterator<Item = Stop>,
        departures: impl IntoIterator<Item = Departure>,
    ) -> Result<Self, IntegrityError> {
        let network = Self::assemble(stops, departures);

        for edge in &network.edges {
            let departure = &edge.departure;
            if edge.from.is_none() {
                return Err(IntegrityError::UnknownStop {
                    departure: departure.clone(),
                    stop: departure.source.clone(),
                });
            }
            if edge.to.is_none() {
                return Err(IntegrityError::UnknownStop {
                    departure: departure.clone(),
                    stop: departure.destination.clone(),
                });
            }
            if !departure.is_causal() {
                return Err(IntegrityError::NonCausal(departure.clone()));
            }
        }

        Ok(network)
    }

    /// Build a network without rejecting anything.
    ///
    /// Departures with unknown endpoints are kept but can never be
    /// traversed; non-causal departures are kept and left to the route
    /// engine to skip. Use [`TransitNetwork::validate`] to find out
    /// whether the result is clean.
    pub fn assemble(
        stops: impl IntoIterator<Item = Stop>,
        departures: impl IntoIterator<Item = Departure>,
    ) -> Self {
        let stops: Vec<Stop> = stops
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<Stop, StopIdx> = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.clone(), StopIdx(i as u32)))
            .collect();

        let departures: BTreeSet<Departure> = departures.into_iter().collect();

        let mut outgoing = vec![Vec::new(); stops.len()];
        let mut incoming = vec![Vec::new(); stops.len()];
        let mut edges = Vec::with_capacity(departures.len());

        for (i, departure) in departures.into_iter().enumerate() {
            let id = DepartureId(i as u32);
            let from = index.get(&departure.source).copied();
            let to = index.get(&departure.destination).copied();

            if let Some(from) = from {
                outgoing[from.0 as usize].push(id);
            }
            if let Some(to) = to {
                incoming[to.0 as usize].push(id);
            }

            edges.push(Edge {
                departure,
                from,
                to,
            });
        }

        Self {
            stops,
            index,
            edges,
            outgoing,
            incoming,
        }
    }

    /// Look up a stop by name.
    ///
    /// The name is normalized first, so any spelling of a known stop
    /// matches. Returns `None` for stops this network does not serve.
    pub fn lookup_stop(&self, name: &str) -> Option<Stop> {
        self.stop_idx(name).map(|idx| self.stop(idx).clone())
    }

    /// Look up a stop's index by name.
    pub fn stop_idx(&self, name: &str) -> Option<StopIdx> {
        let stop = Stop::parse(name).ok()?;
        self.index.get(&stop).copied()
    }

    /// Index of a stop value, if it belongs to this network.
    pub fn idx_of(&self, stop: &Stop) -> Option<StopIdx> {
        self.index.get(stop).copied()
    }

    /// All departures leaving `stop`.
    ///
    /// Unknown stops have no departures.
    pub fn departures_from(&self, stop: &Stop) -> Vec<&Departure> {
        self.idx_of(stop)
            .map(|idx| {
                self.outgoing[idx.0 as usize]
                    .iter()
                    .map(|id| self.departure(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if every departure joins two registered stops and
    /// does not arrive before it leaves.
    pub fn validate(&self) -> bool {
        self.edges
            .iter()
            .all(|e| e.from.is_some() && e.to.is_some() && e.departure.is_causal())
    }

    /// All stops, in ascending name order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All departures, in canonical order (indexed by `DepartureId`).
    pub fn departures(&self) -> impl Iterator<Item = &Departure> {
        self.edges.iter().map(|e| &e.departure)
    }

    /// Returns the stop at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not come from this network.
    pub fn stop(&self, idx: StopIdx) -> &Stop {
        &self.stops[idx.0 as usize]
    }

    /// Returns the departure with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not come from this network.
    pub fn departure(&self, id: DepartureId) -> &Departure {
        &self.edges[id.0 as usize].departure
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of departures.
    pub fn departure_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the network has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    fn endpoints(&self, id: DepartureId) -> (Option<StopIdx>, Option<StopIdx>) {
        let edge = &self.edges[id.0 as usize];
        (edge.from, edge.to)
    }

    fn outgoing(&self, idx: StopIdx) -> &[DepartureId] {
        &self.outgoing[idx.0 as usize]
    }

    fn incoming(&self, idx: StopIdx) -> &[DepartureId] {
        &self.incoming[idx.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, LineId};

    fn stop(name: &str) -> Stop {
        Stop::parse(name).unwrap()
    }

    fn dep(from: &str, to: &str, departs: &str, arrives: &str, line: &str) -> Departure {
        Departure::new(
            stop(from),
            stop(to),
            ClockTime::parse_hhmm(departs).unwrap(),
            ClockTime::parse_hhmm(arrives).unwrap(),
            LineId::new(line),
        )
    }

    fn abc() -> TransitNetwork {
        TransitNetwork::build(
            [stop("A"), stop("B"), stop("C")],
            [
                dep("A", "B", "08:00", "08:10", "1"),
                dep("B", "C", "08:15", "08:25", "1"),
                dep("A", "C", "08:05", "08:40", "2"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn build_valid_network() {
        let network = abc();
        assert_eq!(network.stop_count(), 3);
        assert_eq!(network.departure_count(), 3);
        assert!(network.validate());
    }

    #[test]
    fn build_rejects_unknown_source() {
        let result = TransitNetwork::build(
            [stop("B")],
            [dep("A", "B", "08:00", "08:10", "1")],
        );
        assert_eq!(
            result.unwrap_err(),
            IntegrityError::UnknownStop {
                departure: dep("A", "B", "08:00", "08:10", "1"),
                stop: stop("A"),
            }
        );
    }

    #[test]
    fn build_rejects_unknown_destination() {
        let result = TransitNetwork::build(
            [stop("A")],
            [dep("A", "B", "08:00", "08:10", "1")],
        );
        assert!(matches!(
            result,
            Err(IntegrityError::UnknownStop { stop, .. }) if stop == self::stop("B")
        ));
    }

    #[test]
    fn build_rejects_non_causal() {
        let result = TransitNetwork::build(
            [stop("A"), stop("B")],
            [dep("A", "B", "08:10", "08:00", "1")],
        );
        assert!(matches!(result, Err(IntegrityError::NonCausal(_))));
    }

    #[test]
    fn build_accepts_zero_duration() {
        let result = TransitNetwork::build(
            [stop("A"), stop("B")],
            [dep("A", "B", "08:00", "08:00", "1")],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn error_display() {
        let err = IntegrityError::NonCausal(dep("A", "B", "08:10", "08:00", "1"));
        assert_eq!(
            err.to_string(),
            "departure a 08:10 -> b 08:00 (line 1) arrives before it leaves"
        );
    }

    #[test]
    fn assemble_keeps_bad_edges_and_fails_validation() {
        let network = TransitNetwork::assemble(
            [stop("A"), stop("B")],
            [
                dep("A", "B", "08:10", "08:00", "1"),
                dep("A", "Z", "08:00", "08:10", "1"),
            ],
        );
        assert_eq!(network.departure_count(), 2);
        assert!(!network.validate());
    }

    #[test]
    fn lookup_normalizes() {
        let network = TransitNetwork::build(
            [stop("Parc des Glaisins")],
            Vec::<Departure>::new(),
        )
        .unwrap();
        assert_eq!(
            network.lookup_stop("Parc_Des-Glaisins"),
            Some(stop("parc des glaisins"))
        );
        assert_eq!(network.lookup_stop("Campus"), None);
        assert_eq!(network.lookup_stop(""), None);
    }

    #[test]
    fn departures_from_stop() {
        let network = abc();
        let mut from_a: Vec<_> = network.departures_from(&stop("A")).into_iter().cloned().collect();
        from_a.sort();
        assert_eq!(
            from_a,
            vec![
                dep("A", "B", "08:00", "08:10", "1"),
                dep("A", "C", "08:05", "08:40", "2"),
            ]
        );
        assert!(network.departures_from(&stop("C")).is_empty());
        assert!(network.departures_from(&stop("Z")).is_empty());
    }

    #[test]
    fn stops_indexed_by_name() {
        let network = TransitNetwork::build(
            [stop("C"), stop("A"), stop("B"), stop("A")],
            Vec::<Departure>::new(),
        )
        .unwrap();
        assert_eq!(network.stops(), &[stop("A"), stop("B"), stop("C")]);
        assert_eq!(network.stop_idx("b"), Some(StopIdx(1)));
    }

    #[test]
    fn duplicate_departures_collapse() {
        let network = TransitNetwork::build(
            [stop("A"), stop("B")],
            [
                dep("A", "B", "08:00", "08:10", "1"),
                dep("A", "B", "08:00", "08:10", "1"),
            ],
        )
        .unwrap();
        assert_eq!(network.departure_count(), 1);
    }

    #[test]
    fn incoming_index_mirrors_outgoing() {
        let network = abc();
        let c = network.stop_idx("C").unwrap();
        let into_c: Vec<_> = network
            .incoming(c)
            .iter()
            .map(|id| network.departure(*id).source.clone())
            .collect();
        assert_eq!(into_c.len(), 2);
        assert!(into_c.contains(&stop("A")));
        assert!(into_c.contains(&stop("B")));
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;

        let network = Arc::new(abc());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let network = Arc::clone(&network);
                std::thread::spawn(move || network.departures_from(&stop("A")).len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }
}

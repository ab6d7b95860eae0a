//! Route engine: mode dispatch and journey materialization.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ClockTime, DomainError, Journey};
use crate::network::{DepartureId, ForwardView, ReversedView, StopIdx, TransitNetwork};

use super::config::SearchConfig;
use super::policy::{Fastest, Foremost, Shortest};
use super::search::{Query, SearchOutcome, label_setting};

/// Error from a route query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Origin or destination is not served by the network
    #[error("unknown stop: {name}")]
    UnknownStop { name: String },

    /// The query cannot be answered as asked
    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    /// The search ran out of its time budget
    #[error("route search timed out")]
    Timeout,

    /// The search produced a path that is not a valid journey
    #[error("search produced an invalid journey: {0}")]
    InvalidJourney(#[from] DomainError),
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?}: expected shortest, fastest or foremost")]
pub struct InvalidMode(String);

/// Optimization criterion of a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fewest departures ridden
    Shortest,
    /// Least time from the query start to arrival
    Fastest,
    /// Earliest arrival without leaving earlier than needed
    Foremost,
}

impl Mode {
    /// All modes.
    pub const ALL: [Mode; 3] = [Mode::Shortest, Mode::Fastest, Mode::Foremost];

    /// Returns the wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Shortest => "shortest",
            Mode::Fastest => "fastest",
            Mode::Foremost => "foremost",
        }
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortest" => Ok(Mode::Shortest),
            "fastest" => Ok(Mode::Fastest),
            "foremost" => Ok(Mode::Foremost),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    /// Origin stop name (any spelling)
    pub origin: String,

    /// Destination stop name (any spelling)
    pub destination: String,

    /// Earliest instant the traveller can leave the origin
    pub start: ClockTime,

    /// Optimization criterion
    pub mode: Mode,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        start: ClockTime,
        mode: Mode,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            start,
            mode,
        }
    }
}

/// Result of a route query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The journey found, or `None` when no route exists.
    pub journey: Option<Journey>,

    /// Number of labels settled across all search passes.
    pub labels_settled: usize,
}

impl SearchResult {
    /// A result with no route.
    pub fn no_route(labels_settled: usize) -> Self {
        Self {
            journey: None,
            labels_settled,
        }
    }

    /// Returns true if no route was found.
    pub fn is_no_route(&self) -> bool {
        self.journey.is_none()
    }
}

/// Answers route queries against one network snapshot.
///
/// The engine only borrows the network; each query allocates its own
/// search state, so engines over the same snapshot can run concurrently.
pub struct RouteEngine<'a> {
    network: &'a TransitNetwork,
    config: &'a SearchConfig,
}

impl<'a> RouteEngine<'a> {
    /// Create a new engine.
    pub fn new(network: &'a TransitNetwork, config: &'a SearchConfig) -> Self {
        Self { network, config }
    }

    /// Answer a route query.
    ///
    /// # Errors
    ///
    /// - `UnknownStop` if either stop is not in the network
    /// - `InvalidRequest` if origin and destination are the same stop
    /// - `Timeout` if the configured time budget runs out
    ///
    /// "No route" is not an error: it is a result with no journey.
    pub fn route(&self, request: &SearchRequest) -> Result<SearchResult, RouteError> {
        let origin = self.resolve(&request.origin)?;
        let destination = self.resolve(&request.destination)?;
        if origin == destination {
            return Err(RouteError::InvalidRequest(
                "origin and destination are the same stop".to_string(),
            ));
        }

        let deadline = self.config.time_budget().map(|budget| Instant::now() + budget);
        let query = Query {
            origin,
            target: destination,
            start: request.start,
            deadline,
        };

        let (path, labels_settled) = match request.mode {
            Mode::Shortest => {
                let outcome = label_setting(&ForwardView(self.network), &Shortest, query)?;
                (outcome.path, outcome.settled)
            }
            Mode::Fastest => {
                let outcome = label_setting(&ForwardView(self.network), &Fastest, query)?;
                (outcome.path, outcome.settled)
            }
            Mode::Foremost => self.foremost_path(query)?,
        };

        let journey = path.map(|path| self.materialize(&path)).transpose()?;

        debug!(
            mode = %request.mode,
            origin = %self.network.stop(origin),
            destination = %self.network.stop(destination),
            start = %request.start,
            labels_settled,
            found = journey.is_some(),
            "route query"
        );

        Ok(SearchResult {
            journey,
            labels_settled,
        })
    }

    /// Fewest departures from `origin` to `destination`.
    pub fn shortest(
        &self,
        origin: &str,
        destination: &str,
        start: ClockTime,
    ) -> Result<SearchResult, RouteError> {
        self.route(&SearchRequest::new(origin, destination, start, Mode::Shortest))
    }

    /// Least elapsed time from `start` to arrival.
    pub fn fastest(
        &self,
        origin: &str,
        destination: &str,
        start: ClockTime,
    ) -> Result<SearchResult, RouteError> {
        self.route(&SearchRequest::new(origin, destination, start, Mode::Fastest))
    }

    /// Earliest arrival, leaving no earlier than needed.
    pub fn foremost(
        &self,
        origin: &str,
        destination: &str,
        start: ClockTime,
    ) -> Result<SearchResult, RouteError> {
        self.route(&SearchRequest::new(origin, destination, start, Mode::Foremost))
    }

    /// Earliest arrival via a backwards search from the destination.
    ///
    /// A forward pass finds the earliest arrival instant. The reversed pass
    /// then starts at the destination at that instant and finds, among the
    /// plans that make it, the one leaving the origin latest, and of those
    /// the one with the least waiting at transfer stops. The forward plan
    /// makes that arrival too, so it stands if the reversed pass comes back
    /// empty.
    fn foremost_path(
        &self,
        query: Query,
    ) -> Result<(Option<Vec<DepartureId>>, usize), RouteError> {
        let forward = label_setting(&ForwardView(self.network), &Fastest, query)?;
        let Some(forward_path) = forward.path else {
            return Ok((None, forward.settled));
        };
        let Some(&last) = forward_path.last() else {
            return Ok((None, forward.settled));
        };
        let earliest_arrival = self.network.departure(last).arrives;

        let reversed_query = Query {
            origin: query.target,
            target: query.origin,
            start: earliest_arrival,
            deadline: query.deadline,
        };
        let SearchOutcome { path, settled } = label_setting(
            &ReversedView(self.network),
            &Foremost::new(query.start),
            reversed_query,
        )?;

        let path = match path {
            Some(mut path) => {
                // Collected from the destination backwards
                path.reverse();
                path
            }
            None => forward_path,
        };

        Ok((Some(path), forward.settled + settled))
    }

    fn resolve(&self, name: &str) -> Result<StopIdx, RouteError> {
        self.network
            .stop_idx(name)
            .ok_or_else(|| RouteError::UnknownStop {
                name: name.to_string(),
            })
    }

    fn materialize(&self, path: &[DepartureId]) -> Result<Journey, RouteError> {
        let departures = path
            .iter()
            .map(|id| self.network.departure(*id).clone())
            .collect();
        Ok(Journey::new(departures)?)
    }
}

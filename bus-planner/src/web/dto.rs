//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Calendar, Departure, Journey, Stop};
use crate::planner::{Mode, SearchResult};
use crate::timetable::LineRoute;

/// Query parameters of a journey request.
///
/// Every field is optional here so that missing parameters produce a JSON
/// error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct JourneyRequest {
    /// Origin stop name
    pub from: Option<String>,

    /// Destination stop name
    pub to: Option<String>,

    /// Earliest departure in HH:MM format
    pub at: Option<String>,

    /// `shortest`, `fastest` (default) or `foremost`
    pub mode: Option<String>,

    /// `regular` (default) or `we_holidays`
    pub calendar: Option<String>,
}

/// A stop in the stop list.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StopResult {
    pub name: String,
}

impl StopResult {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            name: stop.name().to_string(),
        }
    }
}

/// Stop sequences of one line under one calendar.
#[derive(Debug, Serialize)]
pub struct LineResult {
    pub line: String,
    pub calendar: Calendar,
    /// Stops as listed in the path section
    pub path: Vec<String>,
    /// Outbound stops in travel order
    pub outbound: Vec<String>,
    /// Return stops in travel order
    pub inbound: Vec<String>,
}

impl LineResult {
    pub fn from_route(route: &LineRoute) -> Self {
        let names = |stops: &[Stop]| -> Vec<String> {
            stops.iter().map(|s| s.name().to_string()).collect()
        };
        Self {
            line: route.line.to_string(),
            calendar: route.calendar,
            path: names(&route.path),
            outbound: names(&route.outbound),
            inbound: names(&route.inbound),
        }
    }
}

/// One departure of a planned journey.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DepartureResult {
    /// Stop the bus leaves from
    pub src: String,
    /// Stop the bus arrives at
    pub dest: String,
    /// Departure time (HH:MM)
    pub start: String,
    /// Arrival time (HH:MM)
    pub end: String,
    /// Line identifier
    pub line: String,
}

impl DepartureResult {
    pub fn from_departure(departure: &Departure) -> Self {
        Self {
            src: departure.source.name().to_string(),
            dest: departure.destination.name().to_string(),
            start: departure.departs.to_string(),
            end: departure.arrives.to_string(),
            line: departure.line.to_string(),
        }
    }
}

/// Response to a journey request.
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub mode: Mode,
    pub calendar: Calendar,

    /// Whether a route was found
    pub found: bool,

    /// Departures in travel order; empty when nothing was found
    pub departures: Vec<DepartureResult>,

    /// Minutes from the first departure to the final arrival
    pub duration_mins: Option<i64>,

    /// Number of line changes
    pub transfers: Option<usize>,
}

impl JourneyResponse {
    pub fn from_result(mode: Mode, calendar: Calendar, result: &SearchResult) -> Self {
        match &result.journey {
            Some(journey) => Self::from_journey(mode, calendar, journey),
            None => Self {
                mode,
                calendar,
                found: false,
                departures: Vec::new(),
                duration_mins: None,
                transfers: None,
            },
        }
    }

    fn from_journey(mode: Mode, calendar: Calendar, journey: &Journey) -> Self {
        Self {
            mode,
            calendar,
            found: true,
            departures: journey
                .departures()
                .iter()
                .map(DepartureResult::from_departure)
                .collect(),
            duration_mins: Some(journey.total_duration().num_minutes()),
            transfers: Some(journey.line_changes()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

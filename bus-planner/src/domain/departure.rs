//! Scheduled departures: the edges of a transit network.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use super::{ClockTime, Stop};

/// Identifier of a bus line (e.g. "1", "4").
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(Arc<str>);

impl LineId {
    /// Create a line identifier. Surrounding whitespace is trimmed.
    pub fn new(id: &str) -> Self {
        LineId(id.trim().into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.as_str())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled trip segment between two consecutive served stops.
///
/// The derived ordering (source, destination, departure, arrival, line)
/// is the canonical edge order of a network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Departure {
    /// Stop the bus leaves from
    pub source: Stop,
    /// Next stop the bus serves
    pub destination: Stop,
    /// Scheduled departure from `source`
    pub departs: ClockTime,
    /// Scheduled arrival at `destination`
    pub arrives: ClockTime,
    /// Line operating the trip
    pub line: LineId,
}

impl Departure {
    /// Creates a departure. No validation happens here; networks check
    /// causality when they are built.
    pub fn new(
        source: Stop,
        destination: Stop,
        departs: ClockTime,
        arrives: ClockTime,
        line: LineId,
    ) -> Self {
        Self {
            source,
            destination,
            departs,
            arrives,
            line,
        }
    }

    /// Returns true if the bus does not arrive before it leaves.
    pub fn is_causal(&self) -> bool {
        self.departs <= self.arrives
    }

    /// Scheduled ride time. Negative for non-causal departures.
    pub fn duration(&self) -> Duration {
        self.arrives.signed_duration_since(self.departs)
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {} (line {})",
            self.source, self.departs, self.destination, self.arrives, self.line
        )
    }
}

//! Journey types.
//!
//! A `Journey` is the answer to a route query: the ordered scheduled
//! departures a traveller rides from origin to destination.

use chrono::Duration;

use super::{ClockTime, Departure, DomainError, LineId, Stop};

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one departure
/// - Consecutive departures connect (destination of one = source of next)
/// - No time travel (arrival of one <= departure of next)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    departures: Vec<Departure>,
}

impl Journey {
    /// Constructs a journey from departures in travel order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - The list is empty
    /// - Departures don't connect
    /// - A departure leaves before the previous one arrives
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_planner::domain::{ClockTime, Departure, Journey, LineId, Stop};
    ///
    /// let t = |s| ClockTime::parse_hhmm(s).unwrap();
    /// let a = Stop::parse("A").unwrap();
    /// let b = Stop::parse("B").unwrap();
    /// let c = Stop::parse("C").unwrap();
    ///
    /// let journey = Journey::new(vec![
    ///     Departure::new(a.clone(), b.clone(), t("08:00"), t("08:10"), LineId::new("1")),
    ///     Departure::new(b, c.clone(), t("08:15"), t("08:25"), LineId::new("1")),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(journey.origin(), &a);
    /// assert_eq!(journey.destination(), &c);
    /// assert_eq!(journey.hop_count(), 2);
    /// ```
    pub fn new(departures: Vec<Departure>) -> Result<Self, DomainError> {
        if departures.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for window in departures.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            if prev.destination != next.source {
                return Err(DomainError::Disconnected(
                    prev.destination.clone(),
                    next.source.clone(),
                ));
            }
            if prev.arrives > next.departs {
                return Err(DomainError::TimeTravel {
                    arrived: prev.arrives,
                    departs: next.departs,
                });
            }
        }

        Ok(Journey { departures })
    }

    /// Returns all departures in travel order.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Consumes the journey, returning its departures.
    pub fn into_departures(self) -> Vec<Departure> {
        self.departures
    }

    /// Returns the number of departures ridden.
    pub fn hop_count(&self) -> usize {
        self.departures.len()
    }

    /// Returns the number of line changes along the journey.
    ///
    /// Staying on the same line between consecutive stops is not a change.
    pub fn line_changes(&self) -> usize {
        self.departures
            .windows(2)
            .filter(|w| w[0].line != w[1].line)
            .count()
    }

    /// Returns the lines used, in order, without consecutive repeats.
    pub fn lines(&self) -> Vec<&LineId> {
        let mut lines: Vec<&LineId> = Vec::new();
        for departure in &self.departures {
            if lines.last() != Some(&&departure.line) {
                lines.push(&departure.line);
            }
        }
        lines
    }

    /// Returns the origin stop.
    pub fn origin(&self) -> &Stop {
        // Non-empty by construction
        &self.departures[0].source
    }

    /// Returns the destination stop.
    pub fn destination(&self) -> &Stop {
        &self.departures[self.departures.len() - 1].destination
    }

    /// Returns the departure time from the origin.
    pub fn departure_time(&self) -> ClockTime {
        self.departures[0].departs
    }

    /// Returns the arrival time at the destination.
    pub fn arrival_time(&self) -> ClockTime {
        self.departures[self.departures.len() - 1].arrives
    }

    /// Returns the time from first departure to final arrival.
    pub fn total_duration(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Returns the time spent waiting at intermediate stops.
    pub fn total_wait(&self) -> Duration {
        self.departures
            .windows(2)
            .map(|w| w[1].departs.signed_duration_since(w[0].arrives))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn dep(from: &str, to: &str, departs: &str, arrives: &str, line: &str) -> Departure {
        Departure::new(
            Stop::parse(from).unwrap(),
            Stop::parse(to).unwrap(),
            t(departs),
            t(arrives),
            LineId::new(line),
        )
    }

    #[test]
    fn empty_journey_rejected() {
        assert_eq!(Journey::new(vec![]), Err(DomainError::EmptyJourney));
    }

    #[test]
    fn disconnected_rejected() {
        let result = Journey::new(vec![
            dep("A", "B", "08:00", "08:10", "1"),
            dep("C", "D", "08:15", "08:25", "1"),
        ]);
        assert!(matches!(result, Err(DomainError::Disconnected(_, _))));
    }

    #[test]
    fn time_travel_rejected() {
        let result = Journey::new(vec![
            dep("A", "B", "08:00", "08:10", "1"),
            dep("B", "C", "08:05", "08:25", "1"),
        ]);
        assert_eq!(
            result,
            Err(DomainError::TimeTravel {
                arrived: t("08:10"),
                departs: t("08:05"),
            })
        );
    }

    #[test]
    fn zero_minute_connection_allowed() {
        let journey = Journey::new(vec![
            dep("A", "B", "08:00", "08:10", "1"),
            dep("B", "C", "08:10", "08:25", "2"),
        ]);
        assert!(journey.is_ok());
    }

    #[test]
    fn accessors() {
        let journey = Journey::new(vec![
            dep("A", "B", "08:00", "08:10", "1"),
            dep("B", "C", "08:15", "08:25", "1"),
            dep("C", "D", "08:40", "08:50", "2"),
        ])
        .unwrap();

        assert_eq!(journey.origin(), &Stop::parse("A").unwrap());
        assert_eq!(journey.destination(), &Stop::parse("D").unwrap());
        assert_eq!(journey.departure_time(), t("08:00"));
        assert_eq!(journey.arrival_time(), t("08:50"));
        assert_eq!(journey.total_duration(), Duration::minutes(50));
        assert_eq!(journey.total_wait(), Duration::minutes(20));
        assert_eq!(journey.hop_count(), 3);
        assert_eq!(journey.line_changes(), 1);
        assert_eq!(
            journey.lines(),
            vec![&LineId::new("1"), &LineId::new("2")]
        );
    }

    #[test]
    fn single_departure() {
        let journey = Journey::new(vec![dep("A", "C", "08:05", "08:40", "2")]).unwrap();
        assert_eq!(journey.line_changes(), 0);
        assert_eq!(journey.total_wait(), Duration::zero());
        assert_eq!(journey.into_departures().len(), 1);
    }
}

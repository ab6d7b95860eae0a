//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from network integrity and query errors.

use super::{ClockTime, Stop};

/// Domain-level errors for journey validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Journey has no departures
    #[error("journey must have at least one departure")]
    EmptyJourney,

    /// Consecutive departures don't share a stop
    #[error("departures do not connect: arrived at {0}, next leaves from {1}")]
    Disconnected(Stop, Stop),

    /// Next departure leaves before the previous one arrives
    #[error("departure at {departs} leaves before arrival at {arrived}")]
    TimeTravel {
        arrived: ClockTime,
        departs: ClockTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyJourney;
        assert_eq!(err.to_string(), "journey must have at least one departure");

        let a = Stop::parse("Poisy").unwrap();
        let b = Stop::parse("Campus").unwrap();
        let err = DomainError::Disconnected(a, b);
        assert_eq!(
            err.to_string(),
            "departures do not connect: arrived at poisy, next leaves from campus"
        );

        let err = DomainError::TimeTravel {
            arrived: ClockTime::parse_hhmm("08:10").unwrap(),
            departs: ClockTime::parse_hhmm("08:05").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "departure at 08:05 leaves before arrival at 08:10"
        );
    }
}

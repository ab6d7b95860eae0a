//! Time-of-day handling for bus timetables.
//!
//! Timetables give times as "HH:MM" strings. Journeys never span more than
//! one service day, so a time is just a wall-clock instant with no date.

use chrono::{Duration, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day within one service day.
///
/// Ordering is chronological, so the earliest departure sorts first.
///
/// # Examples
///
/// ```
/// use bus_planner::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("08:15").unwrap();
/// assert_eq!(time.to_string(), "08:15");
/// assert_eq!(time.seconds_from_midnight(), 8 * 3600 + 15 * 60);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ClockTime = ClockTime(NaiveTime::MIN);

    /// Wrap a chrono time of day.
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Build a time from hours, minutes and seconds.
    ///
    /// Returns `None` when any component is out of range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    /// Parse a time in "HH:MM" format.
    ///
    /// A single-digit hour ("7:05") is accepted, as timetable files written
    /// by hand often drop the leading zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    /// assert!(ClockTime::parse_hhmm("7:05").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0705").is_err());
    /// assert!(ClockTime::parse_hhmm("07:5").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hour.is_empty() || hour.len() > 2 {
            return Err(TimeError::new("hour must have one or two digits"));
        }
        if minute.len() != 2 {
            return Err(TimeError::new("minute must have two digits"));
        }

        let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute =
            parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        Self::from_hms(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Returns the underlying chrono time.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Returns the hour component (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute component (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    /// Signed duration from `other` to `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Absolute distance between two times, in seconds.
    pub fn abs_diff_secs(&self, other: Self) -> u64 {
        u64::from(
            self.seconds_from_midnight()
                .abs_diff(other.seconds_from_midnight()),
        )
    }
}

/// Parse one or two ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({})", self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{:02}:{:02}", self.hour(), self.minute())
        } else {
            write!(
                f,
                "{:02}:{:02}:{:02}",
                self.hour(),
                self.minute(),
                self.0.second()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(t("00:00"), ClockTime::MIDNIGHT);
        assert_eq!(t("08:15").hour(), 8);
        assert_eq!(t("08:15").minute(), 15);
        assert_eq!(t("23:59").seconds_from_midnight(), 86_340);
    }

    #[test]
    fn parse_single_digit_hour() {
        assert_eq!(t("7:05"), t("07:05"));
    }

    #[test]
    fn reject_malformed() {
        assert!(ClockTime::parse_hhmm("").is_err());
        assert!(ClockTime::parse_hhmm("-").is_err());
        assert!(ClockTime::parse_hhmm("0815").is_err());
        assert!(ClockTime::parse_hhmm("08:1").is_err());
        assert!(ClockTime::parse_hhmm("008:15").is_err());
        assert!(ClockTime::parse_hhmm("a8:15").is_err());
        assert!(ClockTime::parse_hhmm("08:1a").is_err());
        assert!(ClockTime::parse_hhmm("+8:15").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(ClockTime::parse_hhmm("24:00").is_err());
        assert!(ClockTime::parse_hhmm("12:60").is_err());
    }

    #[test]
    fn error_display() {
        let err = ClockTime::parse_hhmm("25:00").unwrap_err();
        assert_eq!(err.to_string(), "invalid time: hour must be 0-23");
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(t("08:00") < t("08:01"));
        assert!(t("23:59") > t("00:00"));
    }

    #[test]
    fn durations() {
        assert_eq!(t("08:25").signed_duration_since(t("08:00")), Duration::minutes(25));
        assert_eq!(t("08:00").signed_duration_since(t("08:25")), Duration::minutes(-25));
        assert_eq!(t("08:00").abs_diff_secs(t("08:25")), 1500);
        assert_eq!(t("08:25").abs_diff_secs(t("08:00")), 1500);
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(t("09:05").to_string(), "09:05");
        assert_eq!(ClockTime::from_hms(9, 5, 30).unwrap().to_string(), "09:05:30");
        assert_eq!(format!("{:?}", t("09:05")), "ClockTime(09:05)");
    }

    #[test]
    fn from_str() {
        let parsed: ClockTime = "10:30".parse().unwrap();
        assert_eq!(parsed, t("10:30"));
    }
}

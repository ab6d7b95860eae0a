//! Calendar variants of the timetable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown calendar name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown calendar {0:?}: expected \"regular\" or \"we_holidays\"")]
pub struct InvalidCalendar(String);

/// Which timetable applies on the travel day.
///
/// Each variant has its own, independent network. Deciding which one a
/// given date uses is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Calendar {
    /// Weekday service
    #[serde(rename = "regular")]
    Regular,
    /// Weekend and public holiday service
    #[serde(rename = "we_holidays")]
    WeekendHolidays,
}

impl Calendar {
    /// Both variants, in file order.
    pub const ALL: [Calendar; 2] = [Calendar::Regular, Calendar::WeekendHolidays];

    /// Returns the wire name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Calendar::Regular => "regular",
            Calendar::WeekendHolidays => "we_holidays",
        }
    }
}

impl FromStr for Calendar {
    type Err = InvalidCalendar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Calendar::Regular),
            "we_holidays" | "weekend" | "holidays" => Ok(Calendar::WeekendHolidays),
            _ => Err(InvalidCalendar(s.to_string())),
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Bus stop identity.

use std::fmt;
use std::sync::Arc;

/// Error returned when a stop name is empty after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop name {raw:?}: {reason}")]
pub struct InvalidStopName {
    raw: String,
    reason: &'static str,
}

/// A bus stop, identified by its normalized name.
///
/// Timetables spell the same stop in several ways ("Parc_Des-Glaisins",
/// "parc des glaisins"). Normalization maps underscores and hyphens to
/// spaces, collapses whitespace runs, trims and lowercases, so every
/// spelling yields the same `Stop`.
///
/// Cloning is cheap: the name is reference counted.
///
/// # Examples
///
/// ```
/// use bus_planner::domain::Stop;
///
/// let stop = Stop::parse("Parc_Des-Glaisins").unwrap();
/// assert_eq!(stop.name(), "parc des glaisins");
/// assert_eq!(stop, Stop::parse("  parc des   glaisins ").unwrap());
///
/// assert!(Stop::parse(" _-_ ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stop(Arc<str>);

impl Stop {
    /// Parse and normalize a stop name.
    pub fn parse(raw: &str) -> Result<Self, InvalidStopName> {
        let name = normalize(raw);
        if name.is_empty() {
            return Err(InvalidStopName {
                raw: raw.to_string(),
                reason: "name is empty",
            });
        }
        Ok(Stop(name.into()))
    }

    /// Returns the normalized name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw stop name.
///
/// Returns an empty string for names made only of separators.
fn normalize(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Debug for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stop({})", self.name())
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Normalizing twice changes nothing
        #[test]
        fn normalize_idempotent(s in "[A-Za-z _-]{0,20}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Parsed names never carry separators at the edges or doubled spaces
        #[test]
        fn parsed_names_are_clean(s in "[A-Za-z][A-Za-z _-]{0,20}") {
            let stop = Stop::parse(&s).unwrap();
            prop_assert!(!stop.name().starts_with(' '));
            prop_assert!(!stop.name().ends_with(' '));
            prop_assert!(!stop.name().contains("  "));
            prop_assert!(!stop.name().contains('_'));
            prop_assert!(!stop.name().contains('-'));
        }
    }
}

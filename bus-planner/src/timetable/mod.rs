//! Timetable ingestion.
//!
//! Reads the text timetable files (one per line) and turns them into the
//! stops and departures each calendar's network is built from.

mod error;
mod loader;
mod parse;

pub use error::TimetableError;
pub use loader::{Schedule, Timetable, load_dir};
pub use parse::{LineRoute, LineSchedule, LineTimetable, line_from_file_name, parse_file};

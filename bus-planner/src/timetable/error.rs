//! Timetable ingestion error types.

use std::path::PathBuf;

use crate::domain::{InvalidStopName, TimeError};

/// Errors that can occur while reading timetable files.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// Reading the directory or a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file name does not start with a line identifier
    #[error("cannot derive a line from file name {0:?}")]
    BadFileName(PathBuf),

    /// The file does not have the six expected sections
    #[error("line {line}: expected 6 sections, found {found}")]
    SectionCount { line: String, found: usize },

    /// A time cell is neither `HH:MM` nor `-`
    #[error("line {line}: bad time {cell:?} for stop {stop:?}: {source}")]
    BadTime {
        line: String,
        stop: String,
        cell: String,
        #[source]
        source: TimeError,
    },

    /// A stop name normalizes to nothing
    #[error("line {line}: {source}")]
    BadStop {
        line: String,
        #[source]
        source: InvalidStopName,
    },

    /// A file failed to parse
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<TimetableError>,
    },
}

impl TimetableError {
    /// Attach the offending file to an error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        TimetableError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

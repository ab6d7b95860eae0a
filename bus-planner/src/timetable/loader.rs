//! Loading a directory of timetable files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::debug;

use crate::domain::{Calendar, Departure, Stop};
use crate::network::{IntegrityError, TransitNetwork};

use super::error::TimetableError;
use super::parse::{LineRoute, LineTimetable, line_from_file_name, parse_file};

/// Stops and departures of every line under one calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    /// All stops
    pub stops: BTreeSet<Stop>,
    /// All departures, deduplicated across lines
    pub departures: BTreeSet<Departure>,
}

impl Schedule {
    /// Build the network for this schedule.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a departure is inconsistent with the stop set.
    pub fn to_network(&self) -> Result<TransitNetwork, IntegrityError> {
        TransitNetwork::build(self.stops.iter().cloned(), self.departures.iter().cloned())
    }
}

/// Every line's timetable, merged per calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    schedules: BTreeMap<Calendar, Schedule>,
    routes: Vec<LineRoute>,
}

impl Timetable {
    /// Merge parsed line timetables.
    pub fn from_lines(lines: impl IntoIterator<Item = LineTimetable>) -> Self {
        let mut timetable = Timetable::default();
        for calendar in Calendar::ALL {
            timetable.schedules.insert(calendar, Schedule::default());
        }

        for line in lines {
            for schedule in line.schedules {
                let merged = timetable
                    .schedules
                    .entry(schedule.route.calendar)
                    .or_default();
                merged.stops.extend(schedule.stops);
                merged.departures.extend(schedule.departures);
                timetable.routes.push(schedule.route);
            }
        }

        timetable
            .routes
            .sort_by(|a, b| (&a.line, a.calendar).cmp(&(&b.line, b.calendar)));
        timetable
    }

    /// The merged schedule for a calendar.
    pub fn schedule(&self, calendar: Calendar) -> Option<&Schedule> {
        self.schedules.get(&calendar)
    }

    /// Per-line stop sequences, ordered by line then calendar.
    pub fn routes(&self) -> &[LineRoute] {
        &self.routes
    }

    /// Split into the per-calendar schedules and the line routes.
    pub fn into_parts(self) -> (BTreeMap<Calendar, Schedule>, Vec<LineRoute>) {
        (self.schedules, self.routes)
    }
}

/// Read and parse every regular file in `dir`.
///
/// Files are processed in name order, so the result does not depend on
/// directory iteration order.
///
/// # Errors
///
/// Returns `Err` if the directory cannot be read, or any file cannot be
/// read or parsed. Parse errors name the offending file.
pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Timetable, TimetableError> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let reads = paths.iter().map(|path| async move {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TimetableError::from(e).in_file(path))?;
        Ok::<_, TimetableError>((path, content))
    });
    let files = try_join_all(reads).await?;

    let mut lines = Vec::with_capacity(files.len());
    for (path, content) in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let line = line_from_file_name(&file_name)
            .ok_or_else(|| TimetableError::BadFileName(PathBuf::from(&file_name)).in_file(path))?;
        let parsed = parse_file(&line, &content).map_err(|e| e.in_file(path))?;

        debug!(
            path = %path.display(),
            line = %line,
            departures = parsed.schedules.iter().map(|s| s.departures.len()).sum::<usize>(),
            "parsed timetable file"
        );
        lines.push(parsed);
    }

    Ok(Timetable::from_lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClockTime;

    const LINE_1: &str = "\
A N B

A 07:00 08:00
B 07:10 08:10

B 07:30
A 07:40

A N B

A 10:00
B 10:10

B 11:00
A 11:10
";

    const LINE_2: &str = "\
B N C

B 07:15
C 07:30

C 09:00
B 09:15

B N C

B -
C -

C -
B -
";

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn loads_and_merges_lines() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1_A-B.txt", LINE_1);
        write(dir.path(), "2_B-C.txt", LINE_2);

        let timetable = load_dir(dir.path()).await.unwrap();
        let regular = timetable.schedule(Calendar::Regular).unwrap();
        assert_eq!(regular.stops.len(), 3);
        assert_eq!(regular.departures.len(), 5);

        let weekend = timetable.schedule(Calendar::WeekendHolidays).unwrap();
        assert_eq!(weekend.stops.len(), 3);
        assert_eq!(weekend.departures.len(), 2);

        let routes: Vec<_> = timetable
            .routes()
            .iter()
            .map(|r| (r.line.as_str(), r.calendar))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("1", Calendar::Regular),
                ("1", Calendar::WeekendHolidays),
                ("2", Calendar::Regular),
                ("2", Calendar::WeekendHolidays),
            ]
        );

        let network = regular.to_network().unwrap();
        assert!(network.validate());
        let b = Stop::parse("B").unwrap();
        let from_b: Vec<_> = network
            .departures_from(&b)
            .iter()
            .map(|d| d.departs)
            .collect();
        assert_eq!(
            from_b,
            vec![
                ClockTime::parse_hhmm("07:30").unwrap(),
                ClockTime::parse_hhmm("07:15").unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_directory_gives_empty_schedules() {
        let dir = tempfile::tempdir().unwrap();
        let timetable = load_dir(dir.path()).await.unwrap();
        for calendar in Calendar::ALL {
            let schedule = timetable.schedule(calendar).unwrap();
            assert!(schedule.stops.is_empty());
            assert!(schedule.to_network().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1_A-B.txt", LINE_1);
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let timetable = load_dir(dir.path()).await.unwrap();
        assert_eq!(timetable.routes().len(), 2);
    }

    #[tokio::test]
    async fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "1_A-B.txt", LINE_1);
        write(dir.path(), "9_broken.txt", "A N B\n");

        let err = load_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, TimetableError::File { .. }));
        assert!(err.to_string().contains("9_broken.txt"));
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dir(dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, TimetableError::Io(_)));
    }
}

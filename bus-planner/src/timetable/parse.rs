//! Parser for one line's timetable file.
//!
//! A file holds six sections separated by blank lines: for the regular
//! calendar, then for weekends and holidays, a stop path followed by the
//! outbound and return time grids. A grid has one row per stop, in travel
//! order, and one column per trip:
//!
//! ```text
//! Gare N Mairie N Lycee
//!
//! Gare 07:00 08:00 -
//! Mairie 07:05 - 09:05
//! Lycee 07:12 08:10 09:12
//! ```
//!
//! `-` means the trip does not serve that stop. A trip's departure from a
//! row goes to the next row that has a time in the same column.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::{Calendar, ClockTime, Departure, LineId, Stop};

use super::error::TimetableError;

/// Separator between stop names in a path section.
const PATH_SEPARATOR: &str = " N ";

/// Number of sections in a timetable file.
const SECTION_COUNT: usize = 6;

/// One row of a time grid: a stop and its time per trip.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GridRow {
    stop: Stop,
    times: Vec<Option<ClockTime>>,
}

/// Stop sequences a line serves under one calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRoute {
    /// The line
    pub line: LineId,
    /// Calendar the route belongs to
    pub calendar: Calendar,
    /// Stops as listed in the path section
    pub path: Vec<Stop>,
    /// Stops of the outbound grid, in travel order
    pub outbound: Vec<Stop>,
    /// Stops of the return grid, in travel order
    pub inbound: Vec<Stop>,
}

/// What one calendar section of a file contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSchedule {
    /// Stop sequences of the line
    pub route: LineRoute,
    /// Every stop named in the path or the grids
    pub stops: BTreeSet<Stop>,
    /// Generated departures, without duplicates or non-causal entries
    pub departures: BTreeSet<Departure>,
}

/// A fully parsed timetable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTimetable {
    /// The line the file describes
    pub line: LineId,
    /// One schedule per calendar, in `Calendar::ALL` order
    pub schedules: Vec<LineSchedule>,
}

/// Derive the line identifier from a timetable file name.
///
/// The identifier is the part before the first `_`; without an
/// underscore the whole stem is used.
///
/// # Examples
///
/// ```
/// use bus_planner::timetable::line_from_file_name;
///
/// assert_eq!(line_from_file_name("1_Poisy-ParcDesGlaisins.txt").unwrap().as_str(), "1");
/// assert_eq!(line_from_file_name("sibra.txt").unwrap().as_str(), "sibra");
/// assert!(line_from_file_name("_x.txt").is_none());
/// ```
pub fn line_from_file_name(file_name: &str) -> Option<LineId> {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _ext)| stem);
    let prefix = stem.split('_').next().unwrap_or(stem).trim();
    if prefix.is_empty() {
        None
    } else {
        Some(LineId::new(prefix))
    }
}

/// Parse the contents of one timetable file.
///
/// # Errors
///
/// Returns `Err` if the file does not have six sections, or a stop name
/// or time cell is malformed. Non-causal and duplicate departures are not
/// errors: they are dropped with a warning.
pub fn parse_file(line: &LineId, content: &str) -> Result<LineTimetable, TimetableError> {
    let sections = split_sections(content);
    if sections.len() != SECTION_COUNT {
        return Err(TimetableError::SectionCount {
            line: line.to_string(),
            found: sections.len(),
        });
    }

    let schedules = Calendar::ALL
        .iter()
        .zip(sections.chunks_exact(3))
        .map(|(&calendar, chunk)| parse_schedule(line, calendar, chunk))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineTimetable {
        line: line.clone(),
        schedules,
    })
}

/// Split content into runs of non-blank lines.
fn split_sections(content: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();
    for row in content.lines() {
        if row.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push(row);
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

fn parse_schedule(
    line: &LineId,
    calendar: Calendar,
    sections: &[Vec<&str>],
) -> Result<LineSchedule, TimetableError> {
    let path = parse_path(line, &sections[0])?;
    let outbound = parse_grid(line, &sections[1])?;
    let inbound = parse_grid(line, &sections[2])?;

    let mut stops: BTreeSet<Stop> = path.iter().cloned().collect();
    stops.extend(outbound.iter().map(|row| row.stop.clone()));
    stops.extend(inbound.iter().map(|row| row.stop.clone()));

    let mut departures = BTreeSet::new();
    for grid in [&outbound, &inbound] {
        for departure in grid_departures(line, grid) {
            if !departure.is_causal() {
                warn!(%calendar, %departure, "dropping departure that arrives before it leaves");
                continue;
            }
            if departures.contains(&departure) {
                warn!(%calendar, %departure, "dropping duplicate departure");
                continue;
            }
            departures.insert(departure);
        }
    }

    let route = LineRoute {
        line: line.clone(),
        calendar,
        path,
        outbound: outbound.into_iter().map(|row| row.stop).collect(),
        inbound: inbound.into_iter().map(|row| row.stop).collect(),
    };

    Ok(LineSchedule {
        route,
        stops,
        departures,
    })
}

fn parse_path(line: &LineId, rows: &[&str]) -> Result<Vec<Stop>, TimetableError> {
    rows.join(" ")
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| parse_stop(line, name))
        .collect()
}

fn parse_grid(line: &LineId, rows: &[&str]) -> Result<Vec<GridRow>, TimetableError> {
    rows.iter()
        .map(|row| {
            let mut cells = row.split_whitespace();
            // Sections only hold non-blank rows
            let name = cells.next().unwrap_or_default();
            let stop = parse_stop(line, name)?;
            let times = cells
                .map(|cell| parse_cell(cell).map_err(|source| TimetableError::BadTime {
                    line: line.to_string(),
                    stop: name.to_string(),
                    cell: cell.to_string(),
                    source,
                }))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(GridRow { stop, times })
        })
        .collect()
}

fn parse_stop(line: &LineId, name: &str) -> Result<Stop, TimetableError> {
    Stop::parse(name).map_err(|source| TimetableError::BadStop {
        line: line.to_string(),
        source,
    })
}

fn parse_cell(cell: &str) -> Result<Option<ClockTime>, crate::domain::TimeError> {
    if cell == "-" {
        Ok(None)
    } else {
        ClockTime::parse_hhmm(cell).map(Some)
    }
}

/// Departures of a grid: for each served cell, a hop to the next row
/// serving the same trip.
fn grid_departures(line: &LineId, grid: &[GridRow]) -> Vec<Departure> {
    let mut departures = Vec::new();
    for (i, row) in grid.iter().enumerate() {
        for (trip, departs) in row.times.iter().enumerate() {
            let Some(departs) = *departs else {
                continue;
            };
            let next = grid[i + 1..].iter().find_map(|later| {
                later
                    .times
                    .get(trip)
                    .copied()
                    .flatten()
                    .map(|arrives| (&later.stop, arrives))
            });
            if let Some((destination, arrives)) = next {
                departures.push(Departure::new(
                    row.stop.clone(),
                    destination.clone(),
                    departs,
                    arrives,
                    line.clone(),
                ));
            }
        }
    }
    departures
}

//! Network snapshots and their periodic replacement.
//!
//! Queries run against an immutable `NetworkSet`. When the timetable
//! changes, a whole new set is built and swapped in; queries already
//! holding the old set finish against it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{Calendar, Stop};
use crate::network::{IntegrityError, TransitNetwork};
use crate::timetable::{self, LineRoute, Timetable, TimetableError};

/// Errors from building or refreshing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The timetable directory could not be loaded
    #[error("failed to load timetable: {0}")]
    Timetable(#[from] TimetableError),

    /// The loaded timetable does not form a consistent network
    #[error("inconsistent network: {0}")]
    Integrity(#[from] IntegrityError),
}

/// One network per calendar, plus the line routes they came from.
#[derive(Debug)]
pub struct NetworkSet {
    generation: u64,
    regular: Arc<TransitNetwork>,
    weekend: Arc<TransitNetwork>,
    routes: Vec<LineRoute>,
}

impl NetworkSet {
    /// Build the networks of a timetable.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a calendar's departures are inconsistent with its
    /// stops.
    pub fn from_timetable(timetable: Timetable, generation: u64) -> Result<Self, IntegrityError> {
        let regular = build_network(&timetable, Calendar::Regular)?;
        let weekend = build_network(&timetable, Calendar::WeekendHolidays)?;
        let (_, routes) = timetable.into_parts();

        Ok(Self {
            generation,
            regular: Arc::new(regular),
            weekend: Arc::new(weekend),
            routes,
        })
    }

    /// Sequence number of this snapshot; each refresh increments it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The network for a calendar.
    pub fn network(&self, calendar: Calendar) -> &Arc<TransitNetwork> {
        match calendar {
            Calendar::Regular => &self.regular,
            Calendar::WeekendHolidays => &self.weekend,
        }
    }

    /// Per-line stop sequences.
    pub fn routes(&self) -> &[LineRoute] {
        &self.routes
    }

    /// Stops served under any calendar, in name order.
    pub fn all_stops(&self) -> Vec<Stop> {
        Calendar::ALL
            .iter()
            .flat_map(|&calendar| self.network(calendar).stops().iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Total departures across calendars.
    pub fn departure_count(&self) -> usize {
        self.regular.departure_count() + self.weekend.departure_count()
    }
}

fn build_network(timetable: &Timetable, calendar: Calendar) -> Result<TransitNetwork, IntegrityError> {
    match timetable.schedule(calendar) {
        Some(schedule) => schedule.to_network(),
        None => Ok(TransitNetwork::default()),
    }
}

/// Shared holder of the current snapshot.
///
/// Cloning is cheap; clones see the same snapshot.
#[derive(Clone)]
pub struct NetworkStore {
    inner: Arc<RwLock<Arc<NetworkSet>>>,
    data_dir: PathBuf,
}

impl NetworkStore {
    /// Load the timetable directory and build the first snapshot.
    ///
    /// This fails if the directory cannot be loaded.
    pub async fn load(data_dir: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let data_dir = data_dir.into();
        let set = build_set(&data_dir, 1).await?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(set))),
            data_dir,
        })
    }

    /// Wrap an already-built snapshot.
    pub fn from_set(set: NetworkSet, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(set))),
            data_dir: data_dir.into(),
        }
    }

    /// The current snapshot.
    pub async fn current(&self) -> Arc<NetworkSet> {
        let guard = self.inner.read().await;
        Arc::clone(&guard)
    }

    /// Directory the timetable is loaded from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Reload the timetable directory and swap in a new snapshot.
    ///
    /// On success, returns the new snapshot. On failure, the current
    /// snapshot is kept and the error is returned.
    pub async fn refresh(&self) -> Result<Arc<NetworkSet>, SnapshotError> {
        let mut set = match build_set(&self.data_dir, 0).await {
            Ok(set) => set,
            Err(e) => {
                warn!(dir = %self.data_dir.display(), error = %e, "keeping previous network snapshot");
                return Err(e);
            }
        };

        let mut guard = self.inner.write().await;
        set.generation = guard.generation + 1;
        let set = Arc::new(set);
        *guard = Arc::clone(&set);
        drop(guard);

        info!(
            generation = set.generation,
            stops = set.all_stops().len(),
            departures = set.departure_count(),
            lines = set.routes.len(),
            "network snapshot refreshed"
        );
        Ok(set)
    }
}

async fn build_set(data_dir: &Path, generation: u64) -> Result<NetworkSet, SnapshotError> {
    let timetable = timetable::load_dir(data_dir).await?;
    Ok(NetworkSet::from_timetable(timetable, generation)?)
}

use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bus_planner::cache::CacheConfig;
use bus_planner::config::ServerConfig;
use bus_planner::planner::SearchConfig;
use bus_planner::snapshot::NetworkStore;
use bus_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Fail fast if the timetable cannot be loaded
    info!(dir = %config.data_dir.display(), "loading timetables");
    let store = match NetworkStore::load(&config.data_dir).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to load timetables");
            return ExitCode::FAILURE;
        }
    };
    let set = store.current().await;
    info!(
        stops = set.all_stops().len(),
        departures = set.departure_count(),
        lines = set.routes().len(),
        "timetables loaded"
    );

    // Periodically pick up timetable changes
    let refresh_store = store.clone();
    let refresh_interval = config.refresh_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if let Err(e) = refresh_store.refresh().await {
                warn!(error = %e, "timetable refresh failed");
            }
        }
    });

    let state = AppState::new(store, &CacheConfig::default(), SearchConfig::default());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.addr, "bus planner listening");
    info!("endpoints: GET /health, /stops, /lines, /journey?from=&to=&at=HH:MM&mode=&calendar=");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::cache::JourneyKey;
use crate::domain::{Calendar, ClockTime};
use crate::planner::{Mode, RouteEngine, RouteError, SearchRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/lines", get(list_lines))
        .route("/journey", get(plan_journey))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stops served under any calendar, sorted by name.
async fn list_stops(State(state): State<AppState>) -> Json<Vec<StopResult>> {
    let set = state.store.current().await;
    Json(set.all_stops().iter().map(StopResult::from_stop).collect())
}

/// Stop sequences of every line.
async fn list_lines(State(state): State<AppState>) -> Json<Vec<LineResult>> {
    let set = state.store.current().await;
    Json(set.routes().iter().map(LineResult::from_route).collect())
}

/// Plan a journey between two stops.
async fn plan_journey(
    State(state): State<AppState>,
    Query(req): Query<JourneyRequest>,
) -> Result<Json<JourneyResponse>, AppError> {
    let from = required(req.from, "from")?;
    let to = required(req.to, "to")?;
    let at = required(req.at, "at")?;

    let start = ClockTime::parse_hhmm(&at).map_err(|e| AppError::BadRequest {
        message: format!("invalid at {at:?}: {e}"),
    })?;
    let mode = match req.mode.as_deref() {
        Some(mode) => mode.parse::<Mode>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => Mode::Fastest,
    };
    let calendar = match req.calendar.as_deref() {
        Some(calendar) => calendar.parse::<Calendar>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => Calendar::Regular,
    };

    let set = state.store.current().await;
    let network = Arc::clone(set.network(calendar));
    let unknown = |name: &str| AppError::from(RouteError::UnknownStop {
        name: name.to_string(),
    });
    let origin = network.lookup_stop(&from).ok_or_else(|| unknown(&from))?;
    let destination = network.lookup_stop(&to).ok_or_else(|| unknown(&to))?;

    let key = JourneyKey {
        generation: set.generation(),
        calendar,
        origin: origin.clone(),
        destination: destination.clone(),
        start,
        mode,
    };

    let result = match state.cache.get(&key).await {
        Some(cached) => cached,
        None => {
            let config = Arc::clone(&state.config);
            let request = SearchRequest::new(origin.name(), destination.name(), start, mode);
            let result = tokio::task::spawn_blocking(move || {
                RouteEngine::new(&network, &config).route(&request)
            })
            .await
            .map_err(|e| AppError::Internal {
                message: format!("route search failed: {e}"),
            })??;

            let result = Arc::new(result);
            state.cache.insert(key, Arc::clone(&result)).await;
            result
        }
    };

    Ok(Json(JourneyResponse::from_result(mode, calendar, &result)))
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: format!("missing query parameter {name:?}"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::UnknownStop { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            RouteError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            RouteError::Timeout | RouteError::InvalidJourney(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

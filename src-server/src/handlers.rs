//! HTTP route handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use visitdesk::dashboard::{dashboard_cards, DashboardAction, DashboardCard};
use visitdesk::error::{DashboardError, RegistrationError, StoreError};
use visitdesk::kiosk::register_visit;
use visitdesk::locale;
use visitdesk::mode::AppMode;
use visitdesk::model::{NewVisit, VisitId};
use visitdesk::queue::{QueueBoard, QueueFeed};
use visitdesk::tracker::StatusDisplay;

use super::state::AppState;

/// Response wrapper for API calls.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

fn store_unavailable(e: StoreError) -> Response {
    log::error!("{}: {}", locale::LOAD_FAILED, e);
    json_error(StatusCode::SERVICE_UNAVAILABLE, locale::LOAD_FAILED)
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, locale::INVALID_ACCESS)
}

/// GET /health
pub(crate) async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.snapshot().await {
        Ok(visits) => ok(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "visits": visits.len(),
            "assistant": state.assistant.is_configured(),
        })),
        Err(e) => {
            log::error!("{}: {}", locale::STORE_CONNECTION_FAILED, e);
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                locale::STORE_CONNECTION_FAILED,
            )
        }
    }
}

#[derive(Debug, Serialize)]
struct ModeInfo {
    mode: AppMode,
    endpoints: &'static [&'static str],
}

const KIOSK_ENDPOINTS: &[&str] = &[
    "GET /api/catalog",
    "POST /api/visits",
    "GET /api/visits/{id}/status",
    "GET /api/queue/stream",
    "POST /api/assistant",
];

const TEACHER_ENDPOINTS: &[&str] = &[
    "GET /api/dashboard",
    "GET /api/queue",
    "GET /api/queue/stream",
    "POST /api/visits/{id}/approve",
    "POST /api/visits/{id}/call",
    "POST /api/visits/{id}/complete",
    "POST /api/visits/{id}/delete",
];

/// GET /?mode=teacher|kiosk
pub(crate) async fn handle_mode(RawQuery(query): RawQuery) -> Response {
    let mode = AppMode::from_query(query.as_deref().unwrap_or_default());
    let endpoints = match mode {
        AppMode::Kiosk => KIOSK_ENDPOINTS,
        AppMode::Teacher => TEACHER_ENDPOINTS,
    };
    ok(ModeInfo { mode, endpoints })
}

/// GET /api/catalog
pub(crate) async fn handle_catalog(State(state): State<Arc<AppState>>) -> Response {
    ok(&state.catalog)
}

/// GET /api/queue
pub(crate) async fn handle_queue(State(state): State<Arc<AppState>>) -> Response {
    match state.store.snapshot().await {
        Ok(visits) => ok(QueueBoard::from_visits(&visits)),
        Err(e) => store_unavailable(e),
    }
}

#[derive(Debug, Serialize)]
struct DashboardView {
    cards: Vec<DashboardCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /api/dashboard
pub(crate) async fn handle_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match state.store.snapshot().await {
        Ok(visits) => ok(DashboardView {
            cards: dashboard_cards(&visits),
            error: state.dashboard.last_error(),
        }),
        Err(e) => store_unavailable(e),
    }
}

fn board_event(board: &QueueBoard) -> Event {
    Event::default()
        .event("queue")
        .json_data(board)
        .unwrap_or_else(|e| {
            log::error!("Failed to encode queue board: {}", e);
            Event::default().event("error").data(locale::LOAD_FAILED)
        })
}

/// Resolves once the shutdown flag is set. A dropped sender never resolves.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stopping = *shutdown.borrow_and_update();
        if stopping {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// GET /api/queue/stream
///
/// Sends the current board, then a new board on every store change. The
/// stream ends when the server shuts down.
pub(crate) async fn handle_queue_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let feed = QueueFeed::new(state.store.as_ref());
    let initial = board_event(&feed.board());
    let shutdown = state.shutdown.clone();

    let updates = stream::unfold((feed, shutdown), |(mut feed, mut shutdown)| async move {
        let next = tokio::select! {
            changed = feed.changed() => changed.ok(),
            _ = stopped(&mut shutdown) => None,
        };
        next.map(|board| (board_event(&board), (feed, shutdown)))
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .map(Ok::<_, Infallible>);
    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Debug, Serialize)]
struct Registered {
    id: VisitId,
}

/// POST /api/visits
///
/// Absent or blank fields are answered with a 400 naming them.
pub(crate) async fn handle_register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request: NewVisit = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid registration: {}", e),
            )
        }
    };

    match register_visit(state.store.as_ref(), request, &state.catalog).await {
        Ok(id) => (StatusCode::CREATED, Json(ApiResponse::ok(Registered { id }))).into_response(),
        Err(e @ RegistrationError::MissingFields { .. })
        | Err(e @ RegistrationError::UnknownTeacher { .. }) => {
            json_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            log::error!("{}: {}", locale::REGISTRATION_FAILED, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, locale::SUBMISSION_RETRY)
        }
    }
}

/// GET /api/visits/{id}/status
///
/// An unknown id is a normal "not found" display, not an HTTP error.
pub(crate) async fn handle_visit_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get(&VisitId::from(id)).await {
        Ok(visit) => ok(StatusDisplay::for_visit(visit.as_ref())),
        Err(e) => store_unavailable(e),
    }
}

async fn run_action(state: &AppState, id: String, action: DashboardAction) -> Response {
    let id = VisitId::from(id);
    match state.dashboard.perform(action, &id).await {
        Ok(visit) => ok(visit),
        Err(e) => {
            let DashboardError::UpdateFailed { source, .. } = &e;
            let status = match source {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidTransition { .. } | StoreError::ServingSlotTaken { .. } => {
                    StatusCode::CONFLICT
                }
                StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            json_error(status, e.to_string())
        }
    }
}

/// POST /api/visits/{id}/approve
pub(crate) async fn handle_approve(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    run_action(&state, id, DashboardAction::Approve).await
}

/// POST /api/visits/{id}/call
pub(crate) async fn handle_call(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    run_action(&state, id, DashboardAction::Call).await
}

/// POST /api/visits/{id}/complete
pub(crate) async fn handle_complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    run_action(&state, id, DashboardAction::Complete).await
}

/// POST /api/visits/{id}/delete
pub(crate) async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    run_action(&state, id, DashboardAction::Delete).await
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct AssistantReply {
    answer: String,
}

/// POST /api/assistant
pub(crate) async fn handle_assistant(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssistantRequest>,
) -> Response {
    let query = request.query.trim();
    if query.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "query is empty");
    }
    let answer = state.assistant.answer(query).await;
    ok(AssistantReply { answer })
}

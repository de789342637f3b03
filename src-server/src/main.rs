//! `visitdesk-server`: HTTP JSON API for the school office visitor queue.
//!
//! Endpoints:
//! - GET  /health                      - Server status
//! - GET  /?mode=teacher|kiosk         - Selected flow and its endpoints
//! - GET  /api/catalog                 - Purposes, teachers, grades, classes
//! - GET  /api/queue                   - Current queue board
//! - GET  /api/queue/stream            - Queue board as server-sent events
//! - GET  /api/dashboard               - Active visits with their actions
//! - POST /api/visits                  - Register a visit
//! - GET  /api/visits/{id}/status      - Student-facing status display
//! - POST /api/visits/{id}/approve     - PENDING -> APPROVED
//! - POST /api/visits/{id}/call        - APPROVED -> SERVING
//! - POST /api/visits/{id}/complete    - -> DONE
//! - POST /api/visits/{id}/delete      - -> DONE
//! - POST /api/assistant               - Ask the chat assistant
//!
//! Configuration is read from the file named by `VISITDESK_CONFIG`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use visitdesk::assistant::ChatAssistant;
use visitdesk::config::{load_config, Config};
use visitdesk::locale;
use visitdesk::store::{LocalVisitStore, VisitStore};

use self::handlers::{
    handle_approve, handle_assistant, handle_call, handle_catalog, handle_complete,
    handle_dashboard, handle_delete, handle_health, handle_mode, handle_not_found, handle_queue,
    handle_queue_stream, handle_register, handle_visit_status,
};
use self::state::AppState;

const CONFIG_ENV: &str = "VISITDESK_CONFIG";
const LOG_FORMAT_ENV: &str = "VISITDESK_LOG_FORMAT";

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if log_json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json());
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer());
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn load_server_config() -> Result<Config, Box<dyn std::error::Error>> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => {
            log::info!("Loading configuration from {}", path);
            Ok(load_config(&path)?)
        }
        _ => {
            log::info!("{} not set, using default configuration", CONFIG_ENV);
            Ok(Config::default())
        }
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn VisitStore>, Box<dyn std::error::Error>> {
    let capacity = config.queue.event_capacity;
    let db = config.database.open().map_err(|e| {
        log::error!("{}: {}", locale::STORE_CONFIG_FAILED, e);
        e
    })?;

    if config.database.in_memory {
        log::warn!("Using in-memory visit store; visits are lost on restart");
    }

    let store = LocalVisitStore::with_database(db, capacity).map_err(|e| {
        log::error!("{}: {}", locale::STORE_CONNECTION_FAILED, e);
        e
    })?;
    let store: Arc<dyn VisitStore> = Arc::new(store);
    Ok(store)
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_mode))
        .route("/health", get(handle_health))
        .route("/api/catalog", get(handle_catalog))
        .route("/api/queue", get(handle_queue))
        .route("/api/queue/stream", get(handle_queue_stream))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/visits", post(handle_register))
        .route("/api/visits/{id}/status", get(handle_visit_status))
        .route("/api/visits/{id}/approve", post(handle_approve))
        .route("/api/visits/{id}/call", post(handle_call))
        .route("/api/visits/{id}/complete", post(handle_complete))
        .route("/api/visits/{id}/delete", post(handle_delete))
        .route("/api/assistant", post(handle_assistant))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                log::warn!("Failed to register SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    log::info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;
    log::info!("Starting visitdesk server v{}", env!("CARGO_PKG_VERSION"));

    let config = load_server_config()?;
    let store = open_store(&config)?;
    let assistant = ChatAssistant::from_config(&config.assistant)?;
    if assistant.is_configured() {
        log::info!("AI assistant enabled ({})", config.assistant.model);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = Arc::new(AppState::new(
        store,
        assistant,
        config.catalog.clone(),
        shutdown_rx,
    ));
    let app = build_router(state);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    log::info!("Visitdesk listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    log::info!("Server shut down");
    Ok(())
}

//! Axum web server: the ring drawing, the log, and the start button.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use psar_ring::{event_channel, EventFeed, RingConfig, RingCoordinator, RingTask};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};

use crate::config::VisConfig;
use crate::error::{Error, Result};
use crate::monitor::{RingMonitor, RingSnapshot};

/// Shared application state.
pub struct AppState {
    ring: RingConfig,
    vis: VisConfig,
    monitor: RwLock<RingMonitor>,
    running: AtomicBool,
}

impl AppState {
    /// Launch a new ring unless one is still running.
    ///
    /// The monitor is reset and a background task drains the feed every
    /// poll interval. `running` clears only after that task has seen the ring
    /// finish, so a second start is refused until then.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        let (sink, feed) = event_channel();
        let coordinator = match RingCoordinator::new(self.ring.clone(), sink) {
            Ok(coordinator) => coordinator,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        *self.monitor.write().await = RingMonitor::new(self.ring.participants, self.vis.layout);
        let task = coordinator.start();
        tokio::spawn(drain_feed(Arc::clone(self), feed, task));

        info!(participants = self.ring.participants, "ring started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> RingSnapshot {
        self.monitor.read().await.snapshot()
    }

    /// Log lines from index `since` onwards.
    pub async fn log_since(&self, since: usize) -> Vec<String> {
        let monitor = self.monitor.read().await;
        monitor.log().iter().skip(since).cloned().collect()
    }
}

async fn drain_feed(state: Arc<AppState>, mut feed: EventFeed, task: RingTask) {
    let mut ticker = tokio::time::interval(state.vis.poll_interval);
    loop {
        ticker.tick().await;
        let finished = task.is_finished();

        let events = feed.drain();
        if !events.is_empty() {
            debug!(count = events.len(), "drained events");
            state.monitor.write().await.apply_all(events);
        }

        if finished {
            break;
        }
    }

    match task.wait().await {
        Ok(outcome) => info!(accumulators = ?outcome.accumulators(), "ring completed"),
        Err(e) => error!(error = %e, "ring failed"),
    }
    state.running.store(false, Ordering::SeqCst);
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server that starts rings with `ring` on demand.
    pub fn new(ring: RingConfig, vis: VisConfig) -> Result<Self> {
        ring.validate()?;
        let monitor = RingMonitor::new(ring.participants, vis.layout);
        Ok(Self {
            state: Arc::new(AppState {
                ring,
                vis,
                monitor: RwLock::new(monitor),
                running: AtomicBool::new(false),
            }),
        })
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/status", get(status_handler))
            .route("/api/snapshot", get(snapshot_handler))
            .route("/api/log", get(log_handler))
            .route("/api/start", post(start_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> std::result::Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    running: bool,
    participants: usize,
    rounds: usize,
    event_count: usize,
    completed: bool,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let monitor = state.monitor.read().await;
    Json(StatusResponse {
        status: "ok",
        running: state.is_running(),
        participants: state.ring.participants,
        rounds: state.ring.rounds(),
        event_count: monitor.event_count(),
        completed: monitor.is_completed(),
    })
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<RingSnapshot> {
    Json(state.snapshot().await)
}

#[derive(Deserialize)]
struct LogQuery {
    #[serde(default)]
    since: usize,
}

async fn log_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
) -> Json<Vec<String>> {
    Json(state.log_since(query.since).await)
}

#[derive(Serialize)]
struct StartResponse {
    started: bool,
    message: String,
}

async fn start_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.start().await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(StartResponse {
                started: true,
                message: "ring started".to_string(),
            }),
        ),
        Err(e @ Error::AlreadyRunning) => (
            StatusCode::CONFLICT,
            Json(StartResponse {
                started: false,
                message: e.to_string(),
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StartResponse {
                started: false,
                message: e.to_string(),
            }),
        ),
    }
}

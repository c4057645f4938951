use crate::chat::chat_handler;
use crate::config::StreamConfig;
use crate::events::events_handler;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use parley_agent::TurnPipeline;
use parley_session::StreamRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shared application state.
pub struct AppState {
    pub pipeline: Arc<TurnPipeline>,
    pub streams: StreamRegistry,
    pub stream: StreamConfig,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the router. Sessions live in the pipeline's registry, so turns
    /// and subscribers always see the same store.
    ///
    /// Also starts the session sweep, so this must be called from within a
    /// Tokio runtime.
    pub fn build(pipeline: Arc<TurnPipeline>, stream: StreamConfig) -> Router {
        if let Some(interval) = stream.sweep_interval() {
            start_sweep_loop(pipeline.streams().clone(), interval, stream.session_ttl());
        }

        let state = Arc::new(AppState {
            streams: pipeline.streams().clone(),
            pipeline,
            stream,
        });

        Router::new()
            .route("/chat", post(chat_handler))
            .route("/events/{id}", get(events_handler))
            .route("/health", get(health_handler))
            .with_state(state)
    }
}

/// Periodically drop sessions that were submitted but never subscribed to.
fn start_sweep_loop(streams: StreamRegistry, interval: Duration, ttl: Duration) {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut timer = tokio::time::interval_at(start, interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            let swept = streams.sweep(ttl);
            debug!(swept, live = streams.len(), "Session sweep ran");
        }
    });
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "parley",
        "sessions": state.streams.len(),
    }))
}

use crate::config::{DeliveryStrategy, StreamConfig};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use parley_session::StreamRegistry;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Stream a session's events as server-sent events.
///
/// Unknown ids get an empty session, so a client may subscribe before or
/// after submitting. Each event is one `data:` line holding its JSON
/// envelope.
///
/// Session ids are UUIDs. Any other path segment is answered with
/// `400 Bad Request` by the `Path<Uuid>` extractor before this runs.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    if state.streams.subscribe(id) {
        debug!(session_id = %id, "Subscribed to a session not yet submitted");
    }
    info!(session_id = %id, "Client subscribed");

    let (tx, rx) = mpsc::channel::<Event>(64);
    tokio::spawn(forward(state.streams.clone(), state.stream.clone(), id, tx));

    Sse::new(ReceiverStream::new(rx).map(Ok)).keep_alive(KeepAlive::default())
}

/// Move events from the session buffer to the client until a terminal
/// event has been sent or the client disconnects. Either way the session is
/// disposed; the turn feeding it keeps running.
async fn forward(streams: StreamRegistry, config: StreamConfig, id: Uuid, tx: mpsc::Sender<Event>) {
    let waker = match config.delivery {
        DeliveryStrategy::Poll => None,
        DeliveryStrategy::Notify => streams.waker(id),
    };
    let interval = config.poll_interval();

    'deliver: loop {
        for event in streams.drain(id) {
            let payload = match event.to_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    error!(session_id = %id, error = %e, "Failed to encode event");
                    continue;
                }
            };
            if tx.send(Event::default().data(payload)).await.is_err() {
                info!(session_id = %id, "Client disconnected");
                break 'deliver;
            }
            if event.is_terminal() {
                debug!(session_id = %id, "Stream finished");
                break 'deliver;
            }
        }

        tokio::select! {
            _ = tx.closed() => {
                info!(session_id = %id, "Client disconnected");
                break 'deliver;
            }
            _ = wait(waker.as_deref(), interval) => {}
        }
    }

    streams.dispose(id);
}

async fn wait(waker: Option<&Notify>, interval: Duration) {
    match waker {
        Some(notify) => {
            // Timing out is fine: the interval only bounds latency.
            let _ = tokio::time::timeout(interval, notify.notified()).await;
        }
        None => tokio::time::sleep(interval).await,
    }
}

use crate::event::SseEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::AbortHandle;
use uuid::Uuid;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Created, nothing appended yet.
    Pending,
    /// At least one event appended, no terminal event yet.
    Streaming,
    /// A terminal event has been appended; further appends are refused.
    Done,
}

/// One chat turn's pending output.
///
/// The buffer is append-only for the producer and pop-front-only for the
/// consumer.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    buffer: VecDeque<SseEvent>,
    state: SessionState,
    task: Option<AbortHandle>,
    waker: Arc<Notify>,
    subscribed: bool,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            buffer: VecDeque::new(),
            state: SessionState::Pending,
            task: None,
            waker: Arc::new(Notify::new()),
            subscribed: false,
        }
    }

    /// Queue an event. Returns `false` (and drops the event) once a terminal
    /// event has already been queued.
    pub fn push(&mut self, event: SseEvent) -> bool {
        if self.state == SessionState::Done {
            return false;
        }
        self.state = if event.is_terminal() {
            SessionState::Done
        } else {
            SessionState::Streaming
        };
        self.buffer.push_back(event);
        true
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<SseEvent> {
        self.buffer.drain(..).collect()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Whether a client has opened the event stream for this session.
    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    pub(crate) fn set_subscribed(&mut self) {
        self.subscribed = true;
    }

    pub(crate) fn set_task(&mut self, handle: AbortHandle) {
        self.task = Some(handle);
    }

    pub(crate) fn task(&self) -> Option<&AbortHandle> {
        self.task.as_ref()
    }

    pub(crate) fn waker(&self) -> Arc<Notify> {
        self.waker.clone()
    }
}

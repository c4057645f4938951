use crate::event::SseEvent;
use crate::session::{Session, SessionState};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::AbortHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Process-wide map from session id to pending output.
///
/// Cloning is cheap and every clone sees the same sessions. Each operation
/// is a single short critical section; the lock is never held across an
/// `.await`, so producers and consumers interleave without blocking.
///
/// Operations on an id that was never created, or was already disposed, are
/// no-ops: a pipeline may still be writing after its client went away.
#[derive(Clone, Default)]
pub struct StreamRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().insert(id, Session::new(id));
        info!(session_id = %id, "Session created");
        id
    }

    /// Mark `id` as having a subscriber, creating an empty session first if
    /// none exists. Returns `true` when a session was created. Subscribed
    /// sessions are left to their subscriber to dispose and are never
    /// swept.
    pub fn subscribe(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.lock();
        let created = !sessions.contains_key(&id);
        sessions
            .entry(id)
            .or_insert_with(|| Session::new(id))
            .set_subscribed();
        if created {
            debug!(session_id = %id, "Session created on subscribe");
        }
        created
    }

    /// Queue an event for the session. Returns `false` when the event was
    /// dropped, either because the session is gone or because it already
    /// ended.
    pub fn append(&self, id: Uuid, event: SseEvent) -> bool {
        let waker = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(&id) else {
                debug!(session_id = %id, "Append to unknown session dropped");
                return false;
            };
            if !session.push(event) {
                debug!(session_id = %id, "Append after terminal event dropped");
                return false;
            }
            session.waker()
        };
        waker.notify_one();
        true
    }

    /// Remove and return all queued events, oldest first. Unknown ids yield
    /// nothing.
    pub fn drain(&self, id: Uuid) -> Vec<SseEvent> {
        self.sessions
            .lock()
            .get_mut(&id)
            .map(Session::drain)
            .unwrap_or_default()
    }

    /// Forget the session. Does not cancel a turn still producing into it.
    /// Returns `true` if the session existed.
    pub fn dispose(&self, id: Uuid) -> bool {
        let removed = self.sessions.lock().remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session disposed");
        }
        removed
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.lock().contains_key(&id)
    }

    pub fn state(&self, id: Uuid) -> Option<SessionState> {
        self.sessions.lock().get(&id).map(Session::state)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Record the task producing into this session, so it can be cancelled
    /// explicitly with [`StreamRegistry::abort`].
    pub fn attach_task(&self, id: Uuid, handle: AbortHandle) -> bool {
        match self.sessions.lock().get_mut(&id) {
            Some(session) => {
                session.set_task(handle);
                true
            }
            None => false,
        }
    }

    /// Cancel the session's producing task, if one was attached. The session
    /// itself stays registered.
    pub fn abort(&self, id: Uuid) -> bool {
        let sessions = self.sessions.lock();
        match sessions.get(&id).and_then(Session::task) {
            Some(handle) => {
                handle.abort();
                info!(session_id = %id, "Session task aborted");
                true
            }
            None => false,
        }
    }

    /// Remove sessions nobody subscribed to that were created more than
    /// `ttl` ago, finished or not. Returns how many were removed.
    pub fn sweep(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let now = Utc::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| s.subscribed() || now - s.created_at < ttl);
        let swept = before - sessions.len();
        if swept > 0 {
            info!(swept, remaining = sessions.len(), "Swept unsubscribed sessions");
        }
        swept
    }

    /// Handle that is notified whenever an event is appended to the session.
    pub fn waker(&self, id: Uuid) -> Option<Arc<Notify>> {
        self.sessions.lock().get(&id).map(Session::waker)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_yields_unique_ids() {
        let registry = StreamRegistry::new();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.state(a), Some(SessionState::Pending));
    }

    #[test]
    fn test_append_and_drain_in_order() {
        let registry = StreamRegistry::new();
        let id = registry.create();
        assert!(registry.append(id, SseEvent::tool("42")));
        assert!(registry.append(id, SseEvent::token("The answer")));
        assert!(registry.append(id, SseEvent::Done));

        assert_eq!(
            registry.drain(id),
            vec![
                SseEvent::tool("42"),
                SseEvent::token("The answer"),
                SseEvent::Done
            ]
        );
        assert!(registry.drain(id).is_empty());
        assert_eq!(registry.state(id), Some(SessionState::Done));
    }

    #[tokio::test]
    async fn test_unknown_session_is_noop() {
        let registry = StreamRegistry::new();
        let ghost = Uuid::new_v4();
        assert!(!registry.append(ghost, SseEvent::token("x")));
        assert!(registry.drain(ghost).is_empty());
        assert!(!registry.dispose(ghost));
        assert!(!registry.attach_task(ghost, tokio::spawn(async {}).abort_handle()));
        assert!(registry.waker(ghost).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_append_after_dispose_is_dropped() {
        let registry = StreamRegistry::new();
        let id = registry.create();
        assert!(registry.dispose(id));
        assert!(!registry.append(id, SseEvent::Done));
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_subscribe_only_creates_once() {
        let registry = StreamRegistry::new();
        let id = Uuid::new_v4();
        assert!(registry.subscribe(id));
        registry.append(id, SseEvent::token("kept"));
        assert!(!registry.subscribe(id));
        assert_eq!(registry.drain(id), vec![SseEvent::token("kept")]);
    }

    #[test]
    fn test_subscribe_marks_existing_and_new_sessions() {
        let registry = StreamRegistry::new();
        let submitted = registry.create();
        assert!(!registry.subscribe(submitted));
        assert!(registry.subscribe(Uuid::new_v4()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.sweep(Duration::ZERO), 0);
    }

    #[test]
    fn test_sweep_removes_unsubscribed_sessions_past_ttl() {
        let registry = StreamRegistry::new();
        let ids: Vec<Uuid> = (0..50).map(|_| registry.create()).collect();
        registry.append(ids[0], SseEvent::Done);
        registry.subscribe(ids[1]);

        assert_eq!(registry.sweep(Duration::from_secs(300)), 0);
        assert_eq!(registry.len(), 50);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(registry.sweep(Duration::from_millis(1)), 49);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(ids[1]));
        assert!(!registry.contains(ids[0]));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = StreamRegistry::new();
        let other = registry.clone();
        let id = registry.create();
        other.append(id, SseEvent::Done);
        assert_eq!(registry.drain(id), vec![SseEvent::Done]);
    }
}

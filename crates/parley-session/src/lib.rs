//! Session stream registry for Parley.
//!
//! Each accepted chat turn owns a [`Session`]: a FIFO buffer of [`SseEvent`]s
//! that the turn pipeline appends to and the streaming endpoint drains. The
//! [`StreamRegistry`] maps session ids to sessions and is passed explicitly to
//! both sides.

/// Events streamed to clients.
pub mod event;
/// The in-process registry of live sessions.
pub mod registry;
/// One session's buffer and lifecycle state.
pub mod session;

pub use event::SseEvent;
pub use registry::StreamRegistry;
pub use session::{Session, SessionState};

//! HTTP surface for Parley.
//!
//! `POST /chat` accepts a message and returns a session id at once; the turn
//! runs in the background. `GET /events/{id}` streams that session's events
//! as server-sent events until the turn ends or the client goes away.

/// `POST /chat`.
pub mod chat;
/// Event delivery settings.
pub mod config;
/// `GET /events/{id}` and the forwarding task behind it.
pub mod events;
/// Router assembly and shared state.
pub mod server;

pub use config::{DeliveryStrategy, StreamConfig};
pub use server::{AppState, GatewayServer};

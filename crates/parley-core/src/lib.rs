//! Core types and error definitions for Parley.
//!
//! This crate provides the foundational types shared across all Parley crates:
//! the error taxonomy, conversation messages, and tool call abstractions.
//!
//! # Main types
//!
//! - [`ParleyError`] — Unified error enum for all Parley subsystems.
//! - [`ParleyResult`] — Convenience alias for `Result<T, ParleyError>`.
//! - [`Role`] — Message role (system, user, assistant, tool).
//! - [`Message`] — A single message within a conversation.
//! - [`ToolCall`] — A model-initiated tool invocation request.
//! - [`ToolResult`] — The serialized outcome of executing a tool call.

/// Error taxonomy.
pub mod error;
/// Conversation messages.
pub mod message;
/// Tool call request and result types.
pub mod tool;

pub use error::{ParleyError, ParleyResult};
pub use message::{Message, Role};
pub use tool::{render_output, ToolCall, ToolResult};

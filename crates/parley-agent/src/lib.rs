//! Model access and the chat turn pipeline for Parley.
//!
//! A turn calls the model once with the available tools, runs whatever tool
//! calls it asked for, calls the model again with the results, and streams
//! the final answer into the session as token events.
//!
//! # Main types
//!
//! - [`TurnPipeline`] — Drives one turn and writes its events to the session.
//! - [`ModelGateway`] — Stateless model client with retries and deadlines.
//! - [`LlmBackend`] — Trait implemented by provider backends.
//! - [`ModelConfig`] / [`PipelineConfig`] — Configuration.

/// Provider backend implementations.
pub mod backends;
/// Model and pipeline configuration.
pub mod config;
/// The message list replayed to the model.
pub mod context;
/// Model gateway and response type.
pub mod llm;
/// Turn state machine.
pub mod pipeline;
/// Retry policy and the retrying backend wrapper.
pub mod retry;

pub use backends::LlmBackend;
pub use config::{LlmProvider, ModelConfig, PipelineConfig};
pub use context::Conversation;
pub use llm::{ModelGateway, ModelResponse};
pub use pipeline::{chunk_text, TurnPipeline, TurnState, ERROR_MARKER};
pub use retry::{RetryPolicy, RetryingBackend};

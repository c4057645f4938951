use crate::config::PipelineConfig;
use crate::context::Conversation;
use crate::llm::ModelGateway;
use futures_util::future::join_all;
use futures_util::FutureExt;
use parley_core::ParleyResult;
use parley_session::{SseEvent, StreamRegistry};
use parley_skills::{SkillDescriptor, SkillRegistry};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Token content sent to the client when a turn fails. Details stay in the
/// log.
pub const ERROR_MARKER: &str = "\n[Error from server]";

/// Phases of a single chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Received,
    AwaitingFirstResponse,
    ExecutingTools,
    AwaitingFinalResponse,
    Streaming,
    Done,
    Failed,
}

/// Runs chat turns: model, tools, model again, then the answer as tokens.
///
/// Exactly one round of tool calls is supported. Every turn ends its session
/// with a single terminal event, whether it succeeds or fails.
pub struct TurnPipeline {
    gateway: ModelGateway,
    skills: Arc<SkillRegistry>,
    streams: StreamRegistry,
    config: PipelineConfig,
}

impl TurnPipeline {
    pub fn new(
        gateway: ModelGateway,
        skills: Arc<SkillRegistry>,
        streams: StreamRegistry,
        config: PipelineConfig,
    ) -> Self {
        Self {
            gateway,
            skills,
            streams,
            config,
        }
    }

    pub fn streams(&self) -> &StreamRegistry {
        &self.streams
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    /// Launch the turn for `session_id` as a detached task.
    ///
    /// The task's abort handle is recorded on the session. A panic inside
    /// the turn is caught here and ends the stream the same way as any other
    /// failure: [`ERROR_MARKER`] as a token, then `done`.
    pub fn spawn(self: &Arc<Self>, session_id: Uuid, message: String) -> JoinHandle<TurnState> {
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(pipeline.run(session_id, &message))
                .catch_unwind()
                .await
            {
                Ok(state) => state,
                Err(_) => {
                    error!(session_id = %session_id, "Turn panicked");
                    pipeline.fail(session_id);
                    TurnState::Failed
                }
            }
        });
        self.streams.attach_task(session_id, handle.abort_handle());
        handle
    }

    /// Run one turn to completion and return the state it ended in.
    ///
    /// Errors never escape: a failed turn appends [`ERROR_MARKER`] as a
    /// token followed by `done`.
    pub async fn run(&self, session_id: Uuid, message: &str) -> TurnState {
        let mut state = TurnState::Received;
        info!(session_id = %session_id, "Turn received");

        match self.drive(session_id, message, &mut state).await {
            Ok(()) => state,
            Err(e) => {
                error!(session_id = %session_id, phase = ?state, error = %e, "Turn failed");
                self.fail(session_id);
                TurnState::Failed
            }
        }
    }

    /// Close the session with the client-facing failure marker. If tokens
    /// were already streamed the marker follows them; if `done` was already
    /// appended both writes are dropped by the registry.
    fn fail(&self, session_id: Uuid) {
        self.streams
            .append(session_id, SseEvent::token(ERROR_MARKER));
        self.streams.append(session_id, SseEvent::Done);
    }

    async fn drive(
        &self,
        session_id: Uuid,
        message: &str,
        state: &mut TurnState,
    ) -> ParleyResult<()> {
        let tools: Vec<SkillDescriptor> = self
            .skills
            .list_descriptors()
            .into_iter()
            .cloned()
            .collect();
        let mut conversation = Conversation::new(self.config.system_prompt.clone(), message);

        advance(session_id, state, TurnState::AwaitingFirstResponse);
        let first = self.gateway.invoke(conversation.messages(), &tools).await?;

        if first.has_tool_calls() {
            advance(session_id, state, TurnState::ExecutingTools);
            conversation.push_tool_calls(first.text.clone(), &first.tool_calls);
            let results = join_all(first.tool_calls.iter().map(|call| {
                info!(session_id = %session_id, tool = %call.name, call_id = %call.id, "Executing tool call");
                self.skills.dispatch(call)
            }))
            .await;

            for result in &results {
                self.streams
                    .append(session_id, SseEvent::tool(result.content.clone()));
                conversation.push_tool_result(result);
            }
        }

        advance(session_id, state, TurnState::AwaitingFinalResponse);
        let last = self.gateway.invoke(conversation.messages(), &tools).await?;
        if last.has_tool_calls() {
            warn!(
                session_id = %session_id,
                ignored = last.tool_calls.len(),
                "Model requested another tool round, ignoring"
            );
        }

        advance(session_id, state, TurnState::Streaming);
        self.stream_text(session_id, &last.text).await;
        self.streams.append(session_id, SseEvent::Done);

        advance(session_id, state, TurnState::Done);
        info!(
            session_id = %session_id,
            messages = conversation.len(),
            estimated_tokens = conversation.estimated_tokens(),
            "Turn completed"
        );
        Ok(())
    }

    async fn stream_text(&self, session_id: Uuid, text: &str) {
        let delay = self.config.chunk_delay();
        let chunks = chunk_text(text, self.config.chunk_size);
        let count = chunks.len();

        for (i, chunk) in chunks.into_iter().enumerate() {
            self.streams.append(session_id, SseEvent::token(chunk));
            if i + 1 < count && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn advance(session_id: Uuid, state: &mut TurnState, next: TurnState) {
    debug!(session_id = %session_id, from = ?state, to = ?next, "Turn transition");
    *state = next;
}

/// Split `text` into pieces of at most `size` characters.
///
/// Counts Unicode scalar values, so multi-byte characters are never cut.
/// A `size` of zero is treated as one. Empty text yields no chunks.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

use uuid::Uuid;

/// Top-level error type for Parley.
///
/// The first four variants are the kinds a chat turn can observe. The rest
/// are infrastructure failures that the model gateway folds into
/// [`ParleyError::ModelUnavailable`] before they reach the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ParleyError {
    /// Tool input did not match the tool's declared schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A tool executor failed while running.
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// The model could not produce a usable response (retries exhausted or
    /// unparsable output).
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// A session id that was never created, or was already disposed.
    #[error("Unknown session: {0}")]
    UnknownSession(Uuid),

    /// Network-level failure talking to the model provider, including
    /// rate limiting and server-side (5xx) errors.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A model call exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The provider answered, but the body could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The provider refused the request (4xx other than 429).
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience `Result` alias using [`ParleyError`].
pub type ParleyResult<T> = Result<T, ParleyError>;

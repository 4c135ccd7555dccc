use thiserror::Error;

/// Failures talking to the local `git` binary.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("git was not found; make sure it is installed and on your PATH")]
    NotInstalled(#[source] std::io::Error),

    #[error("not inside a git repository: {0}")]
    NoRepository(String),

    #[error("git {args} exited with status {code:?}: {stderr}")]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run git {args}: {source}")]
    Io {
        args: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures from a single chat-completion attempt.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request to the model timed out")]
    Timeout,

    #[error("network error while contacting the model: {0}")]
    Network(String),

    #[error("rate limited by the inference provider (HTTP 429): {0}")]
    RateLimited(String),

    #[error("inference provider error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    #[error("authentication rejected (HTTP {status}); check HF_TOKEN: {body}")]
    Unauthorized { status: u16, body: String },

    #[error("model '{model}' was not found by the inference provider")]
    ModelNotFound { model: String },

    #[error("request rejected (HTTP {status}): {body}")]
    BadRequest { status: u16, body: String },

    #[error("malformed response from the model: {0}")]
    MalformedResponse(String),

    #[error("the model returned an empty message")]
    EmptyResponse,
}

impl InferenceError {
    /// Whether trying the same request again could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            InferenceError::Timeout
                | InferenceError::Network(_)
                | InferenceError::RateLimited(_)
                | InferenceError::Server { .. }
        )
    }

    /// Errors a regenerate attempt can shrug off while keeping the previous message.
    pub fn is_recoverable(&self) -> bool {
        self.is_transient() || matches!(self, InferenceError::EmptyResponse)
    }

    /// Classify a non-success HTTP status into an error.
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 | 403 => InferenceError::Unauthorized { status, body },
            404 => InferenceError::ModelNotFound {
                model: model.to_string(),
            },
            408 => InferenceError::Timeout,
            429 => InferenceError::RateLimited(body),
            500..=599 => InferenceError::Server { status, body },
            _ => InferenceError::BadRequest { status, body },
        }
    }
}

/// Failures of the final `git commit`.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("failed to run git commit: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git commit failed:\n{output}")]
    Rejected { output: String },
}

/// Reasons a session ends without committing, other than the user saying no.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("failed to generate a commit message: {0}")]
    Inference(#[source] InferenceError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

use thiserror::Error;

/// Which of the two uploaded inputs a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Conversation,
    Context,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Conversation => write!(f, "conversation"),
            InputKind::Context => write!(f, "context"),
        }
    }
}

/// Failure taxonomy for a single evaluation run.
///
/// The first three variants are user-correctable input problems, detected
/// before any network call. The rest are backend or transport failures from
/// the remote service. No variant is retried.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("{0} file is missing - provide both conversation and context JSON files")]
    MissingFile(InputKind),

    #[error("{0} file is empty - provide a file containing valid JSON data")]
    EmptyFile(InputKind),

    #[error("{kind} file is not valid JSON: {message}\nTip: make sure the file is valid JSON (not binary or corrupted)")]
    MalformedJson { kind: InputKind, message: String },

    #[error("API error [{status}]: {body}")]
    ApiError { status: u16, body: String },

    #[error("error connecting to evaluation service: {0}")]
    TransportError(String),

    #[error("malformed service response: {0}")]
    MalformedResponse(String),
}

impl EvalError {
    /// True for input problems the operator can fix by correcting the
    /// uploaded files, false for backend/transport failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EvalError::MissingFile(_) | EvalError::EmptyFile(_) | EvalError::MalformedJson { .. }
        )
    }
}

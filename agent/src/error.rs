use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The reply carried no moves or could not be decoded into moves.
    #[error("AI returned no usable move: {0}")]
    NoAiMove(String),
    /// Network, auth or service failure.
    #[error("AI service unavailable: {0}")]
    CollaboratorUnavailable(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        Self::CollaboratorUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

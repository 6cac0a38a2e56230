use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl DomainError {
    /// Transport-class failures abort one fetch; everything else is a local fault.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::Transport(_)
                | DomainError::UnexpectedStatus { .. }
                | DomainError::Decode(_)
                | DomainError::Timeout(_)
        )
    }
}

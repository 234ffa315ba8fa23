use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A remote store call was rejected. Carries the backend's message.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoardError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(format!("{} {}", kind, id))
    }

    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Persistence(_) | Self::Io(_)
        )
    }
}

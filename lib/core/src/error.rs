use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Story not found: {0}")]
    StoryNotFound(u64),

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Cannot recommend against an empty collection")]
    EmptyCollection,

    #[error("top_k must be at least 1, got {0}")]
    InvalidTopK(usize),

    #[error("Story {0} has no embedding")]
    MissingEmbedding(u64),

    #[error("{service} collaborator failed: {message}")]
    Collaborator { service: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Collaborator errors are transient by contract and safe to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Collaborator { .. })
    }

    pub fn collaborator(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Collaborator {
            service: service.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

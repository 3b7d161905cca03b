use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Search execution failed: {0}")]
    SearchExecutionFailed(#[source] anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violated: {0}")]
    InvariantViolated(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(#[source] anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

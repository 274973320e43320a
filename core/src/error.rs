use crate::DocId;

/// Errors returned by index operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Rejected input: bad id, control characters, malformed query syntax.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation requires a live document with this id.
    #[error("document not found: {0}")]
    NotFound(DocId),
}

impl SearchError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SearchError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

//! Error types / 错误类型

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Backend failure: connectivity or a query the live backend rejects
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Pagination key unknown or expired; the query must be resubmitted
    #[error("Search session not found: {0}")]
    SessionNotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

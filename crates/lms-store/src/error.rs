//! Error types for LMS storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// HTTP request to a remote backend failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The table is not part of the schema known to the backend.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// An update addressed a row that is the header or does not exist.
    #[error("row {row_position} is out of range for table {table}")]
    RowOutOfRange {
        /// Table addressed.
        table: String,
        /// 1-based row position, counting the header as row 1.
        row_position: usize,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

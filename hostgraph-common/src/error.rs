//! Shared error type for the hostgraph workspace.
//!
//! Library crates convert into this type with `#[from]`/`#[error(transparent)]`;
//! binary crates (the HTTP façade, the offline indexer) wrap it in `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty domain")]
    EmptyDomain,

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("malformed line in {file}: {line:?}")]
    MalformedLine { file: String, line: String },

    #[error("invalid numeric field in {file}: {value:?}")]
    InvalidNumericField { file: String, value: String },

    #[error("index validation failed: {0}")]
    IndexValidation(String),

    #[error("fetch failed for {file}: {source}")]
    Fetch {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("short read from {file}: expected {expected} bytes, got {actual}")]
    ShortRead {
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error("content-length mismatch for {file}: expected {expected}, got {actual}")]
    ContentLengthMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    #[error("http error fetching {file}: {message}")]
    Http { file: String, message: String },

    #[error("query cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

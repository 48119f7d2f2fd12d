use thiserror::Error;

/// paddock error types
#[derive(Error, Debug)]
pub enum PaddockError {
    /// Transport-level HTTP failure (connect, timeout, ...)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status
    #[error("unexpected status {status} from {path}")]
    Status { path: String, status: u16 },

    /// Response body did not match the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for paddock
pub type Result<T> = std::result::Result<T, PaddockError>;

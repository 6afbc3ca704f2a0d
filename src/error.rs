use thiserror::Error;

/// Why a token payload could not be read.
///
/// Callers treat every variant as "no claims available"; it never means the
/// session itself is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected 3 dot-separated segments, found {0}")]
    Segments(usize),
    #[error("payload segment is not valid base64: {0}")]
    Base64(String),
    #[error("payload is not valid JSON: {0}")]
    Json(String),
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Body(String),
}

impl ClientError {
    /// The server answered, but not with what a success looks like; as
    /// opposed to a request that never completed.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Status(_) | ClientError::Body(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

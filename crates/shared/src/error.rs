use thiserror::Error;

/// Failure of a call against the map REST endpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("request rejected ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("response carried no result")]
    MissingResult,
}

//! Errors raised by the external capabilities the pipeline calls.

use std::time::Duration;

use thiserror::Error;

/// Failure of the language detection or translation service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// No answer within the call deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::RequestFailed(e.to_string())
    }
}

/// The chat platform refused to deliver a message.
#[derive(Error, Debug)]
#[error("delivery rejected: {0}")]
pub struct DeliveryError(pub String);

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

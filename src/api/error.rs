//! API client error types

use thiserror::Error;

/// Transport-level failures talking to the StudyTrack backend
///
/// Application-level refusals (`success: false`) are not errors here; they come
/// back as decoded responses and the calling flow decides what to show.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Request could not be sent or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status with a body that was not a JSON envelope
    #[error("Unexpected status {status}")]
    Status { status: u16 },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// Request could not be built (bad URL, unserializable body)
    #[error("Request build error: {0}")]
    Build(String),
}

/// Result type for API calls
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Builds the error for an undecodable body, preferring the status when it explains why
    pub fn undecodable(status: u16, detail: impl Into<String>) -> Self {
        if (200..300).contains(&status) {
            ClientError::Decode(detail.into())
        } else {
            ClientError::Status { status }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undecodable_prefers_status() {
        assert_eq!(
            ClientError::undecodable(502, "expected value"),
            ClientError::Status { status: 502 }
        );
        assert!(matches!(
            ClientError::undecodable(200, "expected value"),
            ClientError::Decode(_)
        ));
    }
}

//! Step error taxonomy.
//!
//! Every error raised inside the protocol core is recovered locally into an
//! [`Outcome`](crate::Outcome) plus a context error message before it
//! reaches the pipeline; nothing crosses the step boundary as an error
//! under normal operation.

use thiserror::Error;

/// Result type alias for protocol-core operations.
pub type StepResult<T> = std::result::Result<T, StepError>;

/// Errors raised while building requests, contacting the backend, or
/// classifying its replies.
#[derive(Debug, Clone, Error)]
pub enum StepError {
    /// A required context or input field is missing.
    ///
    /// Raised locally before any network contact.
    #[error("missing required field: {0}")]
    Validation(String),

    /// The challenge or session deadline has passed.
    #[error("challenge expired")]
    Expired,

    /// The backend was unreachable or returned a non-2xx status with no
    /// decodable failure body.
    #[error("remote transport error: {0}")]
    Transport(String),

    /// The backend reply could not be decoded into the expected shape.
    #[error("malformed remote response: {0}")]
    Decode(String),

    /// The backend returned a recognized failure business code.
    #[error("request rejected by backend ({retcode}): {message}")]
    Rejected {
        /// Business status code from the backend.
        retcode: String,
        /// Human-readable backend message.
        message: String,
    },

    /// The backend returned a status token outside the known set.
    #[error("unrecognized backend status: {0}")]
    UnrecognizedStatus(String),
}

impl StepError {
    /// Returns whether this error was raised without contacting the backend.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_the_field() {
        let err = StepError::Validation("username".to_string());
        assert_eq!(err.to_string(), "missing required field: username");
        assert!(err.is_local());
    }

    #[test]
    fn rejection_carries_retcode_and_message() {
        let err = StepError::Rejected {
            retcode: "1010".to_string(),
            message: "user suspended".to_string(),
        };
        assert!(err.to_string().contains("1010"));
        assert!(!err.is_local());
    }
}

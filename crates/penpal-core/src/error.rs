//! Error taxonomy for the letter pipeline.
//!
//! Body-binding failures are not represented here; they never reach the core
//! and are reported by the gateway as validation errors.

/// Failure of one provider round-trip or of interpreting its output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The model provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider could not be reached, or its reply was not a chat completion.
    #[error("transport error: {0}")]
    Transport(String),

    /// The completion text is not valid JSON.
    #[error("Invalid JSON response from API")]
    MalformedResponse,

    /// The completion is JSON but carries none of the expected keys.
    #[error("Unexpected response format")]
    UnexpectedShape,
}

pub type Result<T> = std::result::Result<T, Error>;

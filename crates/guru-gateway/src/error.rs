//! Error types for the model gateway.
//!
//! All gateway failures fall into a three-variant taxonomy: the service
//! returned nothing usable, the service returned text that does not satisfy
//! the required output shape, or the underlying call itself failed. The
//! gateway never retries; recovery is the caller's decision.

/// A specialized `Result` type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur at the model gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service returned no usable text.
    #[error("model returned an empty response during {operation}")]
    EmptyResponse {
        /// The gateway operation that was in flight.
        operation: &'static str,
    },

    /// Text was returned but does not satisfy the required output shape:
    /// missing field, wrong type, bad enum value, wrong option count, or
    /// an out-of-range index.
    #[error("model response for {operation} does not match the expected shape: {detail}")]
    MalformedResponse {
        /// The gateway operation that was in flight.
        operation: &'static str,
        /// Description of the first shape violation found.
        detail: String,
    },

    /// The underlying call could not complete (network, auth, quota).
    #[error("transport failure during {operation}: {message}")]
    Transport {
        /// The gateway operation that was in flight.
        operation: &'static str,
        /// Message from the transport layer.
        message: String,
    },
}

impl GatewayError {
    /// Creates a new `EmptyResponse` error.
    #[must_use]
    pub const fn empty(operation: &'static str) -> Self {
        Self::EmptyResponse { operation }
    }

    /// Creates a new `MalformedResponse` error.
    #[must_use]
    pub fn malformed(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            detail: detail.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Returns the name of the operation that produced this error.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::EmptyResponse { operation }
            | Self::MalformedResponse { operation, .. }
            | Self::Transport { operation, .. } => operation,
        }
    }

    /// Returns `true` if repeating the same call might succeed.
    ///
    /// Transport failures and empty responses are transient; a malformed
    /// response usually indicates a prompt/contract mismatch.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::EmptyResponse { .. })
    }
}

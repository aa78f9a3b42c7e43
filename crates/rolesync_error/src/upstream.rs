//! Errors from the identity-link and points services.

/// Upstream service failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// Request could not be sent or the connection dropped.
    #[display("Request to {} failed: {}", service, reason)]
    Transport {
        /// Service name ("bloxlink", "roblox")
        service: &'static str,
        /// Underlying transport message
        reason: String,
    },

    /// Request exceeded the client timeout.
    #[display("Request to {} timed out", _0)]
    Timeout(&'static str),

    /// Service answered with a non-success status.
    #[display("{} returned HTTP {}", service, status)]
    Status {
        /// Service name
        service: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be decoded.
    #[display("Failed to parse {} response: {}", service, reason)]
    Parse {
        /// Service name
        service: &'static str,
        /// Decoder message
        reason: String,
    },
}

/// Upstream error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolesync_error::{UpstreamError, UpstreamErrorKind};
    ///
    /// let err = UpstreamError::new(UpstreamErrorKind::Timeout("roblox"));
    /// assert!(format!("{}", err).contains("timed out"));
    /// ```
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Discord-specific error types.
//!
//! Covers the serenity gateway client, the interactions webhook and its
//! signature checks. Failures of individual role mutations are not
//! reported here; they become [`RoleStoreError`](rolesync_error::RoleStoreError)s.

use derive_getters::Getters;

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (HTTP error, gateway error, rate limit).
    #[display("Serenity API error: {_0}")]
    SerenityError(String),

    /// Connection to the Discord gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Slash command registration or response failed.
    #[display("Interaction failed: {_0}")]
    InteractionFailed(String),

    /// Application public key is not a valid ed25519 key.
    #[display("Invalid public key: {_0}")]
    InvalidPublicKey(String),

    /// Interaction request signature did not verify.
    #[display("Invalid request signature: {_0}")]
    InvalidSignature(String),

    /// Interaction payload could not be decoded.
    #[display("Malformed interaction: {_0}")]
    MalformedInteraction(String),

    /// Editing the original interaction response failed.
    #[display("Follow-up failed: {_0}")]
    FollowupFailed(String),

    /// Webhook listener could not bind or serve.
    #[display("Webhook server error: {_0}")]
    ServerFailed(String),
}

/// Discord error with source location tracking.
///
/// Captures the error kind along with the file and line where the error occurred.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    kind: DiscordErrorKind,
    line: u32,
    file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use rolesync_discord::{DiscordError, DiscordErrorKind};
    ///
    /// let err = DiscordError::new(DiscordErrorKind::InvalidSignature("bad hex".into()));
    /// assert!(err.to_string().contains("bad hex"));
    /// ```
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;

impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        DiscordError::new(DiscordErrorKind::SerenityError(err.to_string()))
    }
}

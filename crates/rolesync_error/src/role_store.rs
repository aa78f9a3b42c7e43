//! Role-membership store error types.

use serde::{Deserialize, Serialize};

/// Reasons a single role mutation can fail.
///
/// Every variant is recoverable: the reconciler records the failure for the
/// affected role and moves on to the next one.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RoleStoreErrorKind {
    /// Store could not be reached (network error or timeout).
    #[display("Role store unreachable: {}", _0)]
    Unreachable(String),

    /// Bot lacks permission to manage the role.
    #[display("Missing permission: {}", _0)]
    PermissionDenied(String),

    /// Role no longer exists in the guild.
    #[display("Unknown role")]
    UnknownRole,

    /// Member is no longer in the guild.
    #[display("Unknown member")]
    UnknownMember,

    /// Store rejected the request for rate limiting.
    #[display("Rate limited: {}", _0)]
    RateLimited(String),

    /// Any other rejection reported by the store.
    #[display("{}", _0)]
    Other(String),
}

/// Role store error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Role Store Error: {} at line {} in {}", kind, line, file)]
pub struct RoleStoreError {
    /// The kind of error that occurred
    pub kind: RoleStoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RoleStoreError {
    /// Create a new RoleStoreError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolesync_error::{RoleStoreError, RoleStoreErrorKind};
    ///
    /// let err = RoleStoreError::new(RoleStoreErrorKind::UnknownRole);
    /// assert_eq!(err.kind.to_string(), "Unknown role");
    /// ```
    #[track_caller]
    pub fn new(kind: RoleStoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

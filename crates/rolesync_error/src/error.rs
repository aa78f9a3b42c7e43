//! Top-level error wrapper types.

use crate::{CacheError, ConfigError, RoleStoreError, UpstreamError};

/// Every error rolesync can surface.
///
/// # Examples
///
/// ```
/// use rolesync_error::{RolesyncError, ConfigError};
///
/// let err: RolesyncError = ConfigError::new("ROBLOX_API_KEY is not set").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RolesyncErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Identity-link or points service error
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Identity cache error
    #[from(CacheError)]
    Cache(CacheError),
    /// Role-membership store error
    #[from(RoleStoreError)]
    RoleStore(RoleStoreError),
}

/// Rolesync error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Rolesync Error: {}", _0)]
pub struct RolesyncError(Box<RolesyncErrorKind>);

impl RolesyncError {
    /// Create a new error from a kind.
    pub fn new(kind: RolesyncErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RolesyncErrorKind {
        &self.0
    }
}

impl<T> From<T> for RolesyncError
where
    T: Into<RolesyncErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for rolesync operations.
pub type RolesyncResult<T> = std::result::Result<T, RolesyncError>;

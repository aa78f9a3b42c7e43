//! Error types for rolesync.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Per-request failures (upstream lookups, role mutations) are values the
//! engine recovers from. Only [`ConfigError`] is meant to stop the process.
//!
//! # Examples
//!
//! ```
//! use rolesync_error::{ConfigError, RolesyncResult};
//!
//! fn load() -> RolesyncResult<()> {
//!     Err(ConfigError::new("GUILD_ID is not set"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod role_store;
mod upstream;

pub use cache::{CacheError, CacheErrorKind};
pub use config::ConfigError;
pub use error::{RolesyncError, RolesyncErrorKind, RolesyncResult};
pub use role_store::{RoleStoreError, RoleStoreErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind};

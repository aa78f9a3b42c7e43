//! Discord role synchronization from Roblox point totals.
//!
//! This crate ties the workspace together: it loads [`Settings`], builds the
//! collaborators and the [`RoleSync`](rolesync_core::RoleSync) engine, and
//! installs logging. The `rolesync` binary runs it as a gateway bot or as an
//! HTTP interactions endpoint.
//!
//! # Configuration
//!
//! ```bash
//! export DISCORD_TOKEN="..."
//! export GUILD_ID="123456789012345678"
//! export BLOXLINK_API_KEY="..."
//! export ROBLOX_API_KEY="..."
//! export ROBLOX_UNIVERSE_ID="1234567"
//! rolesync gateway
//! ```

#![warn(missing_docs)]

mod app;
mod logging;
mod settings;

pub use app::{Services, build_fetcher, build_resolver, build_services, load_catalog};
pub use logging::init_tracing;
pub use settings::{CacheBackend, Settings};

pub use rolesync_core;
pub use rolesync_error;

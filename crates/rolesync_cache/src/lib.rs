//! Identity cache for rolesync.
//!
//! Looking up a user's linked Roblox account costs a Bloxlink request, and
//! links rarely change, so lookups can be cached per Discord id.
//!
//! - [`IdentityCache`] - read/upsert contract for a cache backend
//! - [`MemoryIdentityCache`] - in-process cache with TTL expiry and LRU eviction
//! - [`SqliteIdentityCache`] - persistent cache in a SQLite file
//! - [`CachedResolver`] - puts any cache in front of an `IdentityResolver`
//!
//! The cache is purely an optimization: a resolver behaves the same whether
//! or not it is wrapped.

#![warn(missing_docs)]

mod entry;
mod memory;
mod resolver;
mod schema;
mod sqlite;

pub use entry::{CachedIdentity, IdentityCache};
pub use memory::{MemoryCacheConfig, MemoryCacheConfigBuilder, MemoryIdentityCache};
pub use resolver::CachedResolver;
pub use sqlite::SqliteIdentityCache;

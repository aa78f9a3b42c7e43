//! In-process identity cache with TTL expiry and LRU eviction.

use crate::{CachedIdentity, IdentityCache};
use async_trait::async_trait;
use derive_getters::Getters;
use parking_lot::Mutex;
use rolesync_core::{DiscordUserId, ExternalAccountId};
use rolesync_error::CacheError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Configuration for the in-memory cache.
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct MemoryCacheConfig {
    /// How long an entry stays valid (seconds)
    #[serde(default = "default_ttl")]
    ttl_secs: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    86_400 // links rarely change; one day
}

fn default_max_size() -> usize {
    10_000
}

fn default_enabled() -> bool {
    true
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    identity: CachedIdentity,
    created_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<DiscordUserId, Entry>,
    access_order: Vec<DiscordUserId>,
}

impl Inner {
    fn touch(&mut self, key: DiscordUserId) {
        if let Some(pos) = self.access_order.iter().position(|k| *k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key);
    }

    fn forget(&mut self, key: DiscordUserId) {
        self.entries.remove(&key);
        if let Some(pos) = self.access_order.iter().position(|k| *k == key) {
            self.access_order.remove(pos);
        }
    }

    fn evict_lru(&mut self) {
        if !self.access_order.is_empty() {
            let key = self.access_order.remove(0);
            tracing::debug!(discord_id = %key, "Evicting LRU identity");
            self.entries.remove(&key);
        }
    }
}

/// Identity cache kept in process memory.
///
/// Entries expire after the configured TTL; when full, the least recently
/// used entry is evicted. Contents are lost on restart.
///
/// # Example
///
/// ```
/// use rolesync_cache::{IdentityCache, MemoryCacheConfig, MemoryIdentityCache};
/// use rolesync_core::{DiscordUserId, ExternalAccountId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = MemoryIdentityCache::new(MemoryCacheConfig::default());
/// let user = DiscordUserId::new(42);
///
/// cache.put(user, ExternalAccountId::new(7)).await.unwrap();
/// let entry = cache.get(user).await.unwrap().unwrap();
/// assert_eq!(*entry.roblox_id(), ExternalAccountId::new(7));
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryIdentityCache {
    config: MemoryCacheConfig,
    inner: Mutex<Inner>,
}

impl MemoryIdentityCache {
    /// Create a cache with the given configuration.
    pub fn new(config: MemoryCacheConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating in-memory identity cache"
        );
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let expired: Vec<DiscordUserId> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            inner.forget(*key);
        }

        if !expired.is_empty() {
            tracing::info!(
                removed = expired.len(),
                remaining = inner.entries.len(),
                "Cleaned up expired identities"
            );
        }
        expired.len()
    }

    /// Number of cached entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl Default for MemoryIdentityCache {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

#[async_trait]
impl IdentityCache for MemoryIdentityCache {
    #[tracing::instrument(skip(self), fields(discord_id = %discord_id))]
    async fn get(&self, discord_id: DiscordUserId) -> Result<Option<CachedIdentity>, CacheError> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return Ok(None);
        }

        let mut inner = self.inner.lock();
        let Some(entry) = inner.entries.get(&discord_id) else {
            return Ok(None);
        };

        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            inner.forget(discord_id);
            return Ok(None);
        }

        let identity = entry.identity.clone();
        inner.touch(discord_id);
        Ok(Some(identity))
    }

    #[tracing::instrument(skip(self), fields(discord_id = %discord_id, roblox_id = %roblox_id))]
    async fn put(
        &self,
        discord_id: DiscordUserId,
        roblox_id: ExternalAccountId,
    ) -> Result<(), CacheError> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return Ok(());
        }

        let mut inner = self.inner.lock();
        if inner.entries.len() >= self.config.max_size && !inner.entries.contains_key(&discord_id)
        {
            inner.evict_lru();
        }

        let entry = Entry {
            identity: CachedIdentity::new(discord_id, roblox_id, chrono::Utc::now().naive_utc()),
            created_at: Instant::now(),
            ttl: Duration::from_secs(self.config.ttl_secs),
        };
        inner.touch(discord_id);
        inner.entries.insert(discord_id, entry);
        Ok(())
    }
}

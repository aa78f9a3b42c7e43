//! Tests for the in-memory identity cache.

use rolesync_cache::{IdentityCache, MemoryCacheConfig, MemoryCacheConfigBuilder, MemoryIdentityCache};
use rolesync_core::{DiscordUserId, ExternalAccountId};
use std::time::Duration;

fn user(id: u64) -> DiscordUserId {
    DiscordUserId::new(id)
}

fn account(id: u64) -> ExternalAccountId {
    ExternalAccountId::new(id)
}

#[tokio::test]
async fn test_insert_and_get() {
    let cache = MemoryIdentityCache::default();
    cache.put(user(1), account(100)).await.unwrap();

    let entry = cache.get(user(1)).await.unwrap().unwrap();
    assert_eq!(*entry.discord_id(), user(1));
    assert_eq!(*entry.roblox_id(), account(100));
}

#[tokio::test]
async fn test_miss() {
    let cache = MemoryIdentityCache::default();
    assert!(cache.get(user(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_replaces_existing_link() {
    let cache = MemoryIdentityCache::default();
    cache.put(user(1), account(100)).await.unwrap();
    cache.put(user(1), account(200)).await.unwrap();

    assert_eq!(cache.len(), 1);
    let entry = cache.get(user(1)).await.unwrap().unwrap();
    assert_eq!(*entry.roblox_id(), account(200));
}

#[tokio::test]
async fn test_expiration() {
    let config = MemoryCacheConfig::default().with_ttl_secs(0);
    let cache = MemoryIdentityCache::new(config);
    cache.put(user(1), account(100)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(cache.get(user(1)).await.unwrap().is_none());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_cleanup_expired() {
    let cache = MemoryIdentityCache::new(MemoryCacheConfig::default().with_ttl_secs(0));
    cache.put(user(1), account(100)).await.unwrap();
    cache.put(user(2), account(200)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(cache.cleanup_expired(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_lru_eviction() {
    let config = MemoryCacheConfigBuilder::default()
        .ttl_secs(3_600)
        .max_size(2)
        .enabled(true)
        .build()
        .unwrap();
    let cache = MemoryIdentityCache::new(config);

    cache.put(user(1), account(100)).await.unwrap();
    cache.put(user(2), account(200)).await.unwrap();
    // reading user 1 makes user 2 the least recently used
    cache.get(user(1)).await.unwrap();
    cache.put(user(3), account(300)).await.unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.get(user(1)).await.unwrap().is_some());
    assert!(cache.get(user(2)).await.unwrap().is_none());
    assert!(cache.get(user(3)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_disabled_cache_stores_nothing() {
    let cache = MemoryIdentityCache::new(MemoryCacheConfig::default().with_enabled(false));
    cache.put(user(1), account(100)).await.unwrap();

    assert!(cache.is_empty());
    assert!(cache.get(user(1)).await.unwrap().is_none());
}

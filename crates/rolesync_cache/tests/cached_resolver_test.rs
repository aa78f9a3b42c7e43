//! Tests for the cache-then-fetch resolver.

use async_trait::async_trait;
use rolesync_cache::{CachedResolver, IdentityCache, MemoryIdentityCache};
use rolesync_core::{DiscordUserId, ExternalAccountId, IdentityResolver};
use rolesync_error::{CacheError, CacheErrorKind, UpstreamError, UpstreamErrorKind};
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingResolver {
    answer: Result<Option<u64>, ()>,
    calls: AtomicUsize,
}

impl CountingResolver {
    fn new(answer: Result<Option<u64>, ()>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityResolver for CountingResolver {
    async fn resolve(
        &self,
        _discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Ok(id) => Ok(id.map(ExternalAccountId::new)),
            Err(()) => Err(UpstreamError::new(UpstreamErrorKind::Timeout("bloxlink"))),
        }
    }
}

struct BrokenCache;

#[async_trait]
impl IdentityCache for BrokenCache {
    async fn get(
        &self,
        _discord_id: DiscordUserId,
    ) -> Result<Option<rolesync_cache::CachedIdentity>, CacheError> {
        Err(CacheError::new(CacheErrorKind::Connection("locked".into())))
    }

    async fn put(
        &self,
        _discord_id: DiscordUserId,
        _roblox_id: ExternalAccountId,
    ) -> Result<(), CacheError> {
        Err(CacheError::new(CacheErrorKind::Query("read-only".into())))
    }
}

const USER: DiscordUserId = DiscordUserId::new(42);

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let resolver = CachedResolver::new(
        CountingResolver::new(Ok(Some(7))),
        MemoryIdentityCache::default(),
    );

    let first = resolver.resolve(USER).await.unwrap();
    let second = resolver.resolve(USER).await.unwrap();

    assert_eq!(first, Some(ExternalAccountId::new(7)));
    assert_eq!(first, second);
    assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unlinked_answers_are_not_cached() {
    let resolver = CachedResolver::new(
        CountingResolver::new(Ok(None)),
        MemoryIdentityCache::default(),
    );

    assert_eq!(resolver.resolve(USER).await.unwrap(), None);
    assert_eq!(resolver.resolve(USER).await.unwrap(), None);
    assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 2);
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn test_lookup_errors_pass_through_uncached() {
    let resolver = CachedResolver::new(
        CountingResolver::new(Err(())),
        MemoryIdentityCache::default(),
    );

    assert!(resolver.resolve(USER).await.is_err());
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn test_prefilled_cache_skips_lookup() {
    let cache = MemoryIdentityCache::default();
    cache.put(USER, ExternalAccountId::new(99)).await.unwrap();
    let resolver = CachedResolver::new(CountingResolver::new(Ok(Some(7))), cache);

    assert_eq!(
        resolver.resolve(USER).await.unwrap(),
        Some(ExternalAccountId::new(99))
    );
    assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_broken_cache_behaves_like_no_cache() {
    let resolver = CachedResolver::new(CountingResolver::new(Ok(Some(7))), BrokenCache);

    assert_eq!(
        resolver.resolve(USER).await.unwrap(),
        Some(ExternalAccountId::new(7))
    );
    assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
}

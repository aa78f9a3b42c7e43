//! Cache-then-fetch identity resolution.

use crate::IdentityCache;
use async_trait::async_trait;
use rolesync_core::{DiscordUserId, ExternalAccountId, IdentityResolver};
use rolesync_error::UpstreamError;
use tracing::{debug, instrument, warn};

/// Wraps an [`IdentityResolver`] with an [`IdentityCache`].
///
/// Reads hit the cache first. On a miss the inner resolver is asked, and a
/// found link is written back. Unlinked answers and lookup errors are never
/// cached. Cache failures are logged and treated as a miss, so a broken
/// cache only costs an extra lookup.
pub struct CachedResolver<R, C> {
    inner: R,
    cache: C,
}

impl<R, C> CachedResolver<R, C> {
    /// Put `cache` in front of `inner`.
    pub fn new(inner: R, cache: C) -> Self {
        Self { inner, cache }
    }

    /// The wrapped resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// The cache backend.
    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<R, C> IdentityResolver for CachedResolver<R, C>
where
    R: IdentityResolver,
    C: IdentityCache,
{
    #[instrument(skip(self), fields(discord_id = %discord_id))]
    async fn resolve(
        &self,
        discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError> {
        match self.cache.get(discord_id).await {
            Ok(Some(entry)) => {
                debug!(roblox_id = %entry.roblox_id(), "Cache hit");
                return Ok(Some(*entry.roblox_id()));
            }
            Ok(None) => debug!("Cache miss"),
            Err(e) => warn!(error = %e, "Cache read failed, resolving directly"),
        }

        let resolved = self.inner.resolve(discord_id).await?;

        if let Some(account) = resolved {
            match self.cache.put(discord_id, account).await {
                Ok(()) => debug!(roblox_id = %account, "Cache set"),
                Err(e) => warn!(error = %e, "Cache write failed"),
            }
        }

        Ok(resolved)
    }
}

//! Cache entry and backend contract.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use derive_getters::Getters;
use rolesync_core::{DiscordUserId, ExternalAccountId};
use rolesync_error::CacheError;

/// A cached Discord → Roblox link.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CachedIdentity {
    discord_id: DiscordUserId,
    roblox_id: ExternalAccountId,
    updated_at: NaiveDateTime,
}

impl CachedIdentity {
    /// Create an entry.
    pub fn new(
        discord_id: DiscordUserId,
        roblox_id: ExternalAccountId,
        updated_at: NaiveDateTime,
    ) -> Self {
        Self {
            discord_id,
            roblox_id,
            updated_at,
        }
    }
}

/// Storage for identity links. At most one entry per Discord id.
#[async_trait]
pub trait IdentityCache: Send + Sync {
    /// Read the entry for a user, if any.
    async fn get(&self, discord_id: DiscordUserId) -> Result<Option<CachedIdentity>, CacheError>;

    /// Insert or replace the entry for a user, stamping it with the current time.
    async fn put(
        &self,
        discord_id: DiscordUserId,
        roblox_id: ExternalAccountId,
    ) -> Result<(), CacheError>;
}

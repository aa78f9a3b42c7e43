//! Collaborator interfaces the engine is driven through.
//!
//! Implementations live in the plumbing crates: the HTTP clients in
//! `rolesync_upstream`, the cache decorator in `rolesync_cache`, and the
//! Discord-backed role store in `rolesync_discord`.

use crate::{CurrentRoleSet, DiscordUserId, ExternalAccountId, MutationOutcome, PointTotals, RoleId};
use async_trait::async_trait;
use rolesync_error::{RoleStoreError, UpstreamError};

/// Maps a Discord user to their linked Roblox account.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up the linked account.
    ///
    /// `Ok(None)` means the user has not linked an account. That is an
    /// ordinary answer, not a failure.
    async fn resolve(
        &self,
        discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError>;
}

/// Retrieves point totals for an account.
#[async_trait]
pub trait PointsFetcher: Send + Sync {
    /// Fetch current totals for every tracked category.
    async fn fetch(&self, account: ExternalAccountId) -> Result<PointTotals, UpstreamError>;
}

/// The system of record for role membership.
///
/// Both mutations must be idempotent: adding a held role or removing an
/// absent one succeeds with the matching `Already*` outcome (or `Applied`
/// when the backend cannot tell the difference).
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Roles the member holds right now.
    async fn current_roles(&self, user: DiscordUserId) -> Result<CurrentRoleSet, RoleStoreError>;

    /// Grant a role to a member.
    async fn add_role(
        &self,
        user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError>;

    /// Revoke a role from a member.
    async fn remove_role(
        &self,
        user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError>;
}

//! One reconciliation request, end to end.

use crate::{
    CurrentRoleSet, DiscordUserId, IdentityResolver, PointTotals, PointsFetcher, RoleCatalog,
    RoleStore, SyncOutcome, SyncReport, apply, decide, plan,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Runs resolve → fetch → decide → plan → apply for a member.
///
/// Holds no per-request state, so one instance serves every request.
/// Requests for the same user are not serialized here; transports that can
/// receive overlapping requests should hold a per-user lock around
/// [`sync`](Self::sync).
pub struct RoleSync {
    catalog: Arc<RoleCatalog>,
    resolver: Arc<dyn IdentityResolver>,
    fetcher: Arc<dyn PointsFetcher>,
    store: Arc<dyn RoleStore>,
}

impl RoleSync {
    /// Wire the engine to its collaborators.
    pub fn new(
        catalog: Arc<RoleCatalog>,
        resolver: Arc<dyn IdentityResolver>,
        fetcher: Arc<dyn PointsFetcher>,
        store: Arc<dyn RoleStore>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            fetcher,
            store,
        }
    }

    /// The catalog this engine reconciles against.
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Reconcile one member's roles.
    ///
    /// The resolver is called exactly once. An unlinked user (or a failed
    /// lookup) ends the request with [`SyncOutcome::NotLinked`] before any
    /// points are fetched. A failed points fetch falls back to zero in every
    /// category, which strips all held managed roles; the report flags it.
    ///
    /// Membership is read from the role store right before planning, so a
    /// request that waited behind another one for the same user sees that
    /// run's changes. `snapshot` (the roles the transport saw when the
    /// request arrived) is only used when the store cannot be read.
    #[instrument(
        skip(self, snapshot),
        fields(discord_id = %discord_id, roblox_id, held)
    )]
    pub async fn sync(&self, discord_id: DiscordUserId, snapshot: &CurrentRoleSet) -> SyncOutcome {
        let account = match self.resolver.resolve(discord_id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                warn!("No linked Roblox account");
                return SyncOutcome::NotLinked { discord_id };
            }
            Err(e) => {
                error!(error = %e, "Identity lookup failed, treating user as not linked");
                return SyncOutcome::NotLinked { discord_id };
            }
        };
        tracing::Span::current().record("roblox_id", account.get());

        let (points, points_fallback) = match self.fetcher.fetch(account).await {
            Ok(points) => (points, false),
            Err(e) => {
                warn!(error = %e, "Points fetch failed, using zero totals");
                (PointTotals::zeroed(), true)
            }
        };
        debug!(?points, "Fetched points");

        let current_roles = match self.store.current_roles(discord_id).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(error = %e, "Could not read membership, planning from request snapshot");
                snapshot.clone()
            }
        };
        tracing::Span::current().record("held", current_roles.len());

        let desired = decide(&points, &self.catalog);
        let changes = plan(&desired, &current_roles, &self.catalog);
        debug!(?desired, ?changes, "Computed reconciliation plan");

        let applied = apply(&changes, discord_id, self.store.as_ref()).await;
        let report = SyncReport::new(points, desired, &applied, points_fallback);

        info!(
            added = report.added().len(),
            removed = report.removed().len(),
            failed = report.failures().len(),
            "Reconciliation complete"
        );
        SyncOutcome::Synced(report)
    }
}

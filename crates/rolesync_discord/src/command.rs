//! The `/update` command, shared by the gateway and webhook transports.

use crate::UserLocks;
use rolesync_core::{CurrentRoleSet, DiscordUserId, RoleCatalog, RoleSync, SyncOutcome};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Slash command name.
pub const UPDATE_COMMAND: &str = "update";

/// Slash command description shown in the Discord client.
pub const UPDATE_DESCRIPTION: &str = "Update your roles based on your Roblox points";

/// Runs the reconciliation engine for one member at a time.
pub struct UpdateCommand {
    engine: Arc<RoleSync>,
    locks: UserLocks,
}

impl UpdateCommand {
    /// Wrap an engine.
    pub fn new(engine: Arc<RoleSync>) -> Self {
        Self {
            engine,
            locks: UserLocks::new(),
        }
    }

    /// Catalog the engine reconciles against.
    pub fn catalog(&self) -> &RoleCatalog {
        self.engine.catalog()
    }

    /// Per-user lock table.
    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    /// Reconcile `user`, waiting for any in-flight request of theirs first.
    #[instrument(skip(self, current_roles), fields(discord_id = %user))]
    pub async fn run(&self, user: DiscordUserId, current_roles: &CurrentRoleSet) -> SyncOutcome {
        let _guard = self.locks.lock(user).await;
        debug!("Acquired user lock");
        self.engine.sync(user, current_roles).await
    }
}

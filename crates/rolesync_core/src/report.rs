//! Structured outcome handed back to the transport.

use crate::{AppliedResult, DesiredRoleSet, DiscordUserId, PointTotals, RoleId, RoleOperation};
use derive_getters::Getters;
use rolesync_error::RoleStoreErrorKind;
use serde::{Deserialize, Serialize};

/// A role mutation that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoleMutationFailure {
    role_id: RoleId,
    operation: RoleOperation,
    reason: String,
    kind: RoleStoreErrorKind,
}

impl RoleMutationFailure {
    /// Describe a failed mutation.
    pub fn new(role_id: RoleId, operation: RoleOperation, kind: RoleStoreErrorKind) -> Self {
        Self {
            role_id,
            operation,
            reason: kind.to_string(),
            kind,
        }
    }
}

/// Result of a completed reconciliation.
///
/// Serializes as
/// `{ points, desired_roles, added, removed, failures, points_fallback }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SyncReport {
    points: PointTotals,
    desired_roles: DesiredRoleSet,
    added: Vec<RoleId>,
    removed: Vec<RoleId>,
    failures: Vec<RoleMutationFailure>,
    /// Points store was unreachable and zero totals were used instead.
    points_fallback: bool,
}

impl SyncReport {
    /// Assemble a report from the pieces of a reconciliation.
    pub fn new(
        points: PointTotals,
        desired_roles: DesiredRoleSet,
        applied: &AppliedResult,
        points_fallback: bool,
    ) -> Self {
        Self {
            points,
            desired_roles,
            added: applied.added(),
            removed: applied.removed(),
            failures: applied.failures(),
            points_fallback,
        }
    }

    /// Whether no role changed and nothing failed.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.failures.is_empty()
    }
}

/// What a reconciliation request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No Roblox account is linked; nothing was fetched or changed.
    NotLinked {
        /// User the request was for.
        discord_id: DiscordUserId,
    },
    /// Reconciliation ran to completion (possibly with per-role failures).
    Synced(SyncReport),
}

impl SyncOutcome {
    /// The report, if reconciliation ran.
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Synced(report) => Some(report),
            Self::NotLinked { .. } => None,
        }
    }
}

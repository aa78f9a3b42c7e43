//! Diffing desired roles against held roles, and applying the difference.

use crate::{DesiredRoleSet, DiscordUserId, RoleCatalog, RoleId, RoleMutationFailure, RoleStore};
use derive_getters::Getters;
use rolesync_error::RoleStoreErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Roles a member holds when reconciliation starts.
pub type CurrentRoleSet = BTreeSet<RoleId>;

/// Roles to grant and revoke. Fixed once computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ReconciliationPlan {
    add: BTreeSet<RoleId>,
    remove: BTreeSet<RoleId>,
}

impl ReconciliationPlan {
    /// Whether the member is already in the desired state.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Total number of mutations planned.
    pub fn len(&self) -> usize {
        self.add.len() + self.remove.len()
    }
}

/// Compute the minimal change that brings `current` in line with `desired`.
///
/// Only catalog-managed roles are considered: a managed role is added when it
/// is desired and missing, and removed when it is held but not desired.
/// Roles outside the catalog are never touched.
///
/// # Examples
///
/// ```
/// use rolesync_core::{decide, plan, PointTotals, RoleCatalog, RoleId, RoleTier};
/// use std::collections::BTreeSet;
///
/// let a = RoleId::new(1);
/// let b = RoleId::new(2);
/// let catalog = RoleCatalog::default()
///     .with_category("siteop", vec![RoleTier::new(a, 0), RoleTier::new(b, 100)]);
///
/// let desired = decide(&PointTotals::siteop_security(150, 0), &catalog);
/// let current = BTreeSet::from([a, RoleId::new(999)]);
/// let changes = plan(&desired, &current, &catalog);
///
/// assert_eq!(changes.add(), &BTreeSet::from([b]));
/// assert_eq!(changes.remove(), &BTreeSet::from([a]));
/// ```
pub fn plan(
    desired: &DesiredRoleSet,
    current: &CurrentRoleSet,
    catalog: &RoleCatalog,
) -> ReconciliationPlan {
    let keep = desired.keep_set();
    let mut changes = ReconciliationPlan::default();

    for role in catalog.managed_roles() {
        let held = current.contains(&role);
        let wanted = keep.contains(&role);
        if wanted && !held {
            changes.add.insert(role);
        } else if held && !wanted {
            changes.remove.insert(role);
        }
    }

    changes
}

/// Direction of a role mutation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum RoleOperation {
    /// Grant the role.
    #[display("add")]
    Add,
    /// Revoke the role.
    #[display("remove")]
    Remove,
}

/// Successful result of a single role mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The store changed membership.
    Applied,
    /// The member already held the role.
    AlreadyPresent,
    /// The member already lacked the role.
    AlreadyAbsent,
}

/// What happened to one planned mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MutationRecord {
    role_id: RoleId,
    operation: RoleOperation,
    result: Result<MutationOutcome, RoleStoreErrorKind>,
}

impl MutationRecord {
    /// Record the result of a mutation.
    pub fn new(
        role_id: RoleId,
        operation: RoleOperation,
        result: Result<MutationOutcome, RoleStoreErrorKind>,
    ) -> Self {
        Self {
            role_id,
            operation,
            result,
        }
    }

    /// Whether the mutation ended in the intended state.
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-role results of applying a plan, in the order they were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AppliedResult {
    records: Vec<MutationRecord>,
}

impl AppliedResult {
    /// Wrap a list of records.
    pub fn new(records: Vec<MutationRecord>) -> Self {
        Self { records }
    }

    fn succeeded_for(&self, operation: RoleOperation) -> Vec<RoleId> {
        self.records
            .iter()
            .filter(|r| r.operation == operation && r.succeeded())
            .map(|r| r.role_id)
            .collect()
    }

    /// Roles that are now held because of an add.
    pub fn added(&self) -> Vec<RoleId> {
        self.succeeded_for(RoleOperation::Add)
    }

    /// Roles that are now gone because of a remove.
    pub fn removed(&self) -> Vec<RoleId> {
        self.succeeded_for(RoleOperation::Remove)
    }

    /// Mutations that failed.
    pub fn failures(&self) -> Vec<RoleMutationFailure> {
        self.records
            .iter()
            .filter_map(|r| match &r.result {
                Ok(_) => None,
                Err(kind) => Some(RoleMutationFailure::new(r.role_id, r.operation, kind.clone())),
            })
            .collect()
    }

    /// Whether every mutation succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.records.iter().all(MutationRecord::succeeded)
    }
}

/// Push a plan through the role store.
///
/// Every planned mutation is attempted: adds first, then removes, each in
/// ascending role id order. A failure is recorded against its role and never
/// stops the remaining mutations.
#[instrument(
    skip(changes, store),
    fields(user = %user, adds = changes.add.len(), removes = changes.remove.len())
)]
pub async fn apply(
    changes: &ReconciliationPlan,
    user: DiscordUserId,
    store: &dyn RoleStore,
) -> AppliedResult {
    let mut records = Vec::with_capacity(changes.len());

    for &role in &changes.add {
        let result = store.add_role(user, role).await.map_err(|e| e.kind);
        log_mutation(role, RoleOperation::Add, &result);
        records.push(MutationRecord::new(role, RoleOperation::Add, result));
    }

    for &role in &changes.remove {
        let result = store.remove_role(user, role).await.map_err(|e| e.kind);
        log_mutation(role, RoleOperation::Remove, &result);
        records.push(MutationRecord::new(role, RoleOperation::Remove, result));
    }

    let applied = AppliedResult::new(records);
    if !applied.all_succeeded() {
        warn!(
            failed = applied.failures().len(),
            "Some role mutations failed"
        );
    }
    applied
}

fn log_mutation(
    role: RoleId,
    operation: RoleOperation,
    result: &Result<MutationOutcome, RoleStoreErrorKind>,
) {
    match result {
        Ok(MutationOutcome::Applied) => info!(role = %role, %operation, "Role mutation applied"),
        Ok(outcome) => debug!(role = %role, %operation, ?outcome, "Role already in desired state"),
        Err(kind) => warn!(role = %role, %operation, error = %kind, "Role mutation failed"),
    }
}

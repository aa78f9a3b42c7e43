//! Tier selection.

use crate::{Category, PointTotals, RoleCatalog, RoleId, RoleTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Role each catalog category should grant, `None` when no tier is reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesiredRoleSet(BTreeMap<Category, Option<RoleId>>);

impl DesiredRoleSet {
    /// Desired role for a category. `None` for unknown categories too.
    pub fn get(&self, category: &str) -> Option<RoleId> {
        self.0.get(category).copied().flatten()
    }

    /// Every role that should be held.
    pub fn keep_set(&self) -> BTreeSet<RoleId> {
        self.0.values().flatten().copied().collect()
    }

    /// Iterate categories with their desired role.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, Option<RoleId>)> {
        self.0.iter().map(|(category, role)| (category, *role))
    }
}

impl FromIterator<(Category, Option<RoleId>)> for DesiredRoleSet {
    fn from_iter<I: IntoIterator<Item = (Category, Option<RoleId>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Highest tier whose threshold is at or below `points`.
///
/// Selection is by threshold, never by list position or role id. If two
/// tiers share the winning threshold the one listed last wins; loaded
/// catalogs reject duplicate thresholds, so this only matters for catalogs
/// assembled in code.
pub fn highest_tier(tiers: &[RoleTier], points: u64) -> Option<&RoleTier> {
    tiers
        .iter()
        .filter(|tier| tier.points <= points)
        .max_by_key(|tier| tier.points)
}

/// Compute the role each catalog category should grant.
///
/// Pure and deterministic: the same points and catalog always give the same
/// answer. Categories missing from `points` count as zero.
///
/// # Examples
///
/// ```
/// use rolesync_core::{decide, PointTotals, RoleCatalog, RoleId, RoleTier};
///
/// let catalog = RoleCatalog::default()
///     .with_category("siteop", vec![
///         RoleTier::new(RoleId::new(1), 0),
///         RoleTier::new(RoleId::new(2), 100),
///     ])
///     .with_category("security", vec![]);
///
/// let desired = decide(&PointTotals::siteop_security(150, 5), &catalog);
/// assert_eq!(desired.get("siteop"), Some(RoleId::new(2)));
/// assert_eq!(desired.get("security"), None);
/// ```
pub fn decide(points: &PointTotals, catalog: &RoleCatalog) -> DesiredRoleSet {
    catalog
        .categories()
        .map(|(category, tiers)| {
            let earned = points.get(category.as_str());
            let role = highest_tier(tiers, earned).map(|tier| tier.role_id);
            (category.clone(), role)
        })
        .collect()
}

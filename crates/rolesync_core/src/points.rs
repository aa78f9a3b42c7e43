//! Per-category point totals.

use crate::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category name for site-operator points.
pub const SITEOP: &str = "siteop";

/// Category name for security points.
pub const SECURITY: &str = "security";

/// Points a player holds in each category.
///
/// A category with no entry counts as zero points.
///
/// # Examples
///
/// ```
/// use rolesync_core::{PointTotals, SECURITY, SITEOP};
///
/// let points = PointTotals::siteop_security(150, 5);
/// assert_eq!(points.get(SITEOP), 150);
/// assert_eq!(points.get(SECURITY), 5);
/// assert_eq!(points.get("unknown"), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointTotals(BTreeMap<Category, u64>);

impl PointTotals {
    /// Empty totals (every category reads as zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for the two categories the points store tracks.
    pub fn siteop_security(siteop: u64, security: u64) -> Self {
        Self::new().with(SITEOP, siteop).with(SECURITY, security)
    }

    /// Both tracked categories at zero. Used when the points store is unreachable.
    pub fn zeroed() -> Self {
        Self::siteop_security(0, 0)
    }

    /// Set a category's points, builder style.
    pub fn with(mut self, category: impl Into<Category>, points: u64) -> Self {
        self.0.insert(category.into(), points);
        self
    }

    /// Points for a category, zero if absent.
    pub fn get(&self, category: &str) -> u64 {
        self.0.get(category).copied().unwrap_or(0)
    }

    /// Iterate recorded categories.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.0.iter().map(|(category, points)| (category, *points))
    }
}

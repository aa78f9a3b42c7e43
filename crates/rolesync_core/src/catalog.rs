//! Role catalog: which role each point threshold earns.

use crate::RoleId;
use rolesync_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, instrument};

/// Name of an independent point axis, such as `siteop` or `security`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Category name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One rung of a category's ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleTier {
    /// Role granted at this tier.
    pub role_id: RoleId,
    /// Minimum points required.
    pub points: u64,
}

impl RoleTier {
    /// Create a tier.
    pub const fn new(role_id: RoleId, points: u64) -> Self {
        Self { role_id, points }
    }
}

/// Mapping of category to its role tiers.
///
/// Tiers are kept in the order they were configured; nothing in the engine
/// depends on that order. Loaded once at startup and shared read-only.
///
/// The on-disk form is the JSON document the bot has always used:
///
/// ```json
/// {
///   "siteop":   [{ "role_id": 111, "points": 0 }, { "role_id": 222, "points": 100 }],
///   "security": [{ "role_id": "333", "points": 50 }]
/// }
/// ```
///
/// # Examples
///
/// ```
/// use rolesync_core::{RoleCatalog, RoleId};
///
/// let catalog = RoleCatalog::from_json_str(
///     r#"{"siteop": [{"role_id": 1, "points": 0}, {"role_id": 2, "points": 100}]}"#,
/// )
/// .unwrap();
///
/// assert!(catalog.is_managed(RoleId::new(2)));
/// assert!(!catalog.is_managed(RoleId::new(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    categories: BTreeMap<Category, Vec<RoleTier>>,
}

impl RoleCatalog {
    /// Build a catalog from already-parsed tiers without validating it.
    pub fn new(categories: BTreeMap<Category, Vec<RoleTier>>) -> Self {
        Self { categories }
    }

    /// Add or replace a category, builder style.
    pub fn with_category(mut self, category: impl Into<Category>, tiers: Vec<RoleTier>) -> Self {
        self.categories.insert(category.into(), tiers);
        self
    }

    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is not valid JSON of the
    /// expected shape or fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::new(format!("Failed to parse role catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the file if it cannot be read,
    /// parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let shown = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read role catalog: {}", e)).with_subject(&shown)
        })?;

        let catalog = Self::from_json_str(&content).map_err(|e| e.with_subject(&shown))?;
        debug!(
            categories = catalog.categories.len(),
            managed_roles = catalog.managed_roles().len(),
            "Loaded role catalog"
        );
        Ok(catalog)
    }

    /// Check the catalog invariants.
    ///
    /// - at least one category is defined
    /// - no role id is zero
    /// - no two tiers of one category share a threshold
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::new("Role catalog defines no categories"));
        }

        for (category, tiers) in &self.categories {
            let mut seen = BTreeSet::new();
            for tier in tiers {
                if tier.role_id.get() == 0 {
                    return Err(ConfigError::new(format!(
                        "Role id 0 is not valid (category '{}')",
                        category
                    )));
                }
                if !seen.insert(tier.points) {
                    return Err(ConfigError::new(format!(
                        "Duplicate threshold {} in category '{}'",
                        tier.points, category
                    )));
                }
            }
        }

        Ok(())
    }

    /// Iterate categories with their tiers.
    pub fn categories(&self) -> impl Iterator<Item = (&Category, &[RoleTier])> {
        self.categories
            .iter()
            .map(|(category, tiers)| (category, tiers.as_slice()))
    }

    /// Tiers for one category, empty if the category is unknown.
    pub fn tiers(&self, category: &str) -> &[RoleTier] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every role id the catalog manages, across all categories.
    pub fn managed_roles(&self) -> BTreeSet<RoleId> {
        self.categories
            .values()
            .flatten()
            .map(|tier| tier.role_id)
            .collect()
    }

    /// Whether a role appears anywhere in the catalog.
    pub fn is_managed(&self, role_id: RoleId) -> bool {
        self.categories
            .values()
            .flatten()
            .any(|tier| tier.role_id == role_id)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

//! Role decision and reconciliation engine.
//!
//! Converts per-category point totals into the Discord roles a member should
//! hold, and reconciles that against the roles they currently hold.
//!
//! # Pipeline
//!
//! - [`IdentityResolver`] maps a Discord user to their linked Roblox account
//! - [`PointsFetcher`] retrieves the account's point totals
//! - [`decide`] picks the highest eligible tier per category
//! - [`plan`] diffs the result against the member's current roles
//! - [`apply`] pushes each change through a [`RoleStore`], recording failures
//!
//! [`RoleSync`] runs the whole pipeline for one request and returns a
//! [`SyncOutcome`] for the transport to render.
//!
//! Only roles listed in the [`RoleCatalog`] are ever added or removed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod decision;
mod ids;
mod points;
mod reconcile;
mod report;
mod sync;
mod traits;

pub use catalog::{Category, RoleCatalog, RoleTier};
pub use decision::{DesiredRoleSet, decide, highest_tier};
pub use ids::{DiscordUserId, ExternalAccountId, RoleId};
pub use points::{PointTotals, SECURITY, SITEOP};
pub use reconcile::{
    AppliedResult, CurrentRoleSet, MutationOutcome, MutationRecord, ReconciliationPlan,
    RoleOperation, apply, plan,
};
pub use report::{RoleMutationFailure, SyncOutcome, SyncReport};
pub use sync::RoleSync;
pub use traits::{IdentityResolver, PointsFetcher, RoleStore};

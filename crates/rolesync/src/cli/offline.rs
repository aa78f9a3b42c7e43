//! Commands that only read the catalog.

use rolesync::Settings;
use rolesync_core::{CurrentRoleSet, PointTotals, RoleCatalog, RoleId, decide, plan};
use rolesync_error::RolesyncResult;
use serde_json::json;
use std::path::Path;
use tracing::instrument;

fn catalog_from(settings: &Settings, roles: Option<&Path>) -> RolesyncResult<RoleCatalog> {
    let path = roles.unwrap_or(settings.roles_file().as_path());
    Ok(RoleCatalog::from_file(path)?)
}

/// Validate the catalog and print each category's ladder.
#[instrument(skip(settings))]
pub fn check_catalog(settings: &Settings, roles: Option<&Path>) -> RolesyncResult<()> {
    let catalog = catalog_from(settings, roles)?;

    for (category, tiers) in catalog.categories() {
        println!("{}", category);
        let mut ladder = tiers.to_vec();
        ladder.sort_by_key(|tier| tier.points);
        for tier in ladder {
            println!("  {:>8} pts  role {}", tier.points, tier.role_id);
        }
    }
    println!(
        "\n{} categories, {} managed roles",
        catalog.len(),
        catalog.managed_roles().len()
    );
    Ok(())
}

/// Print the desired roles and the add/remove plan for the given points.
#[instrument(skip(settings))]
pub fn plan_offline(
    settings: &Settings,
    roles: Option<&Path>,
    siteop: u64,
    security: u64,
    current: &[u64],
) -> RolesyncResult<()> {
    let catalog = catalog_from(settings, roles)?;
    let points = PointTotals::siteop_security(siteop, security);
    let held: CurrentRoleSet = current.iter().copied().map(RoleId::new).collect();

    let desired = decide(&points, &catalog);
    let changes = plan(&desired, &held, &catalog);

    let output = json!({
        "points": points,
        "desired_roles": desired,
        "add": changes.add(),
        "remove": changes.remove(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
    );
    Ok(())
}

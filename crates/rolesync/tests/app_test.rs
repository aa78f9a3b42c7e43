//! Tests for assembling the engine from settings.

use rolesync::{Settings, build_resolver, build_services, load_catalog};
use rolesync_core::{CurrentRoleSet, DiscordUserId, MutationOutcome, RoleId, RoleStore};
use rolesync_error::{RoleStoreError, RolesyncErrorKind};
use std::sync::Arc;

struct NoopStore;

#[async_trait::async_trait]
impl RoleStore for NoopStore {
    async fn current_roles(&self, _user: DiscordUserId) -> Result<CurrentRoleSet, RoleStoreError> {
        Ok(CurrentRoleSet::new())
    }

    async fn add_role(
        &self,
        _user: DiscordUserId,
        _role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        Ok(MutationOutcome::Applied)
    }

    async fn remove_role(
        &self,
        _user: DiscordUserId,
        _role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        Ok(MutationOutcome::Applied)
    }
}

const CATALOG: &str = r#"{
    "siteop": [{ "role_id": "111", "points": 0 }, { "role_id": 222, "points": 100 }],
    "security": [{ "role_id": 333, "points": 50 }]
}"#;

fn settings_without(dir: &tempfile::TempDir, missing: &str) -> Settings {
    build_settings(dir, &[], Some(missing))
}

fn settings(dir: &tempfile::TempDir, extra: &[(&str, String)]) -> Settings {
    build_settings(dir, extra, None)
}

fn build_settings(
    dir: &tempfile::TempDir,
    extra: &[(&str, String)],
    missing: Option<&str>,
) -> Settings {
    let roles = dir.path().join("roles.json");
    std::fs::write(&roles, CATALOG).unwrap();

    let mut env: config::Map<String, String> = [
        ("ROLES_FILE", roles.display().to_string()),
        ("CACHE_DB_FILE", dir.path().join("cache.db").display().to_string()),
        ("GUILD_ID", "4242".to_string()),
        ("BLOXLINK_API_KEY", "bloxlink".to_string()),
        ("ROBLOX_API_KEY", "roblox".to_string()),
        ("ROBLOX_UNIVERSE_ID", "99".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    env.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));
    if let Some(key) = missing {
        env.remove(key);
    }

    Settings::load_isolated(None, env).unwrap()
}

#[test]
fn test_catalog_loads_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = load_catalog(&settings(&dir, &[])).unwrap();

    assert_eq!(catalog.len(), 2);
    assert!(catalog.is_managed(RoleId::new(111)));
}

#[tokio::test]
async fn test_services_build_with_sqlite_cache() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, &[("USE_CACHE", "true".to_string())]);

    let services = build_services(&settings, Arc::new(NoopStore)).unwrap();
    assert_eq!(services.engine.catalog().len(), 2);
    assert!(dir.path().join("cache.db").exists());
}

#[tokio::test]
async fn test_resolver_variants_build() {
    let dir = tempfile::tempdir().unwrap();
    let http = reqwest::Client::new();

    let memory = settings(
        &dir,
        &[
            ("USE_CACHE", "true".to_string()),
            ("CACHE_BACKEND", "memory".to_string()),
        ],
    );
    assert!(build_resolver(&memory, http.clone()).is_ok());

    let uncached = settings(&dir, &[]);
    assert!(build_resolver(&uncached, http).is_ok());
    assert!(!dir.path().join("cache.db").exists());
}

#[test]
fn test_missing_credential_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_without(&dir, "ROBLOX_UNIVERSE_ID");

    let err = match build_services(&settings, Arc::new(NoopStore)) {
        Ok(_) => panic!("expected a configuration error"),
        Err(err) => err,
    };
    assert!(matches!(err.kind(), RolesyncErrorKind::Config(_)));
}

#[test]
fn test_invalid_catalog_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, &[]);
    std::fs::write(
        settings.roles_file(),
        r#"{"siteop": [{"role_id": 1, "points": 5}, {"role_id": 2, "points": 5}]}"#,
    )
    .unwrap();

    let err = match build_services(&settings, Arc::new(NoopStore)) {
        Ok(_) => panic!("expected a configuration error"),
        Err(err) => err,
    };
    assert!(matches!(err.kind(), RolesyncErrorKind::Config(_)));
}

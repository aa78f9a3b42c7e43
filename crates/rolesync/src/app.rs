//! Wiring settings into a running engine.

use crate::{CacheBackend, Settings};
use rolesync_cache::{
    CachedResolver, MemoryCacheConfig, MemoryIdentityCache, SqliteIdentityCache,
};
use rolesync_core::{IdentityResolver, PointsFetcher, RoleCatalog, RoleStore, RoleSync};
use rolesync_error::RolesyncResult;
use rolesync_upstream::{BloxlinkResolver, RobloxPointsFetcher, build_http_client};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Engine plus the HTTP client its collaborators share.
pub struct Services {
    /// Reconciliation engine
    pub engine: Arc<RoleSync>,
    /// Client used for every upstream call
    pub http: reqwest::Client,
}

/// Load the role catalog named in the settings.
pub fn load_catalog(settings: &Settings) -> RolesyncResult<RoleCatalog> {
    Ok(RoleCatalog::from_file(settings.roles_file())?)
}

/// Identity resolver, cached according to the settings.
#[instrument(skip_all, fields(use_cache = settings.use_cache(), backend = %settings.cache_backend()))]
pub fn build_resolver(
    settings: &Settings,
    http: reqwest::Client,
) -> RolesyncResult<Arc<dyn IdentityResolver>> {
    let mut bloxlink = BloxlinkResolver::new(
        http,
        settings.require_guild_id()?,
        settings.require_bloxlink_api_key()?,
    );
    if let Some(url) = settings.bloxlink_url() {
        bloxlink = bloxlink.with_base_url(url.clone());
    }

    if !settings.use_cache() {
        info!("Identity cache disabled");
        return Ok(Arc::new(bloxlink));
    }

    let resolver: Arc<dyn IdentityResolver> = match settings.cache_backend() {
        CacheBackend::Sqlite => {
            let cache = SqliteIdentityCache::open(settings.cache_db_file())?
                .with_ttl(Duration::from_secs(*settings.cache_ttl_secs()));
            info!(
                path = %settings.cache_db_file(),
                ttl_secs = settings.cache_ttl_secs(),
                "Using SQLite identity cache"
            );
            Arc::new(CachedResolver::new(bloxlink, cache))
        }
        CacheBackend::Memory => {
            let config = MemoryCacheConfig::default().with_ttl_secs(*settings.cache_ttl_secs());
            info!(ttl_secs = settings.cache_ttl_secs(), "Using in-memory identity cache");
            Arc::new(CachedResolver::new(bloxlink, MemoryIdentityCache::new(config)))
        }
    };
    Ok(resolver)
}

/// Points fetcher for the configured universe.
pub fn build_fetcher(
    settings: &Settings,
    http: reqwest::Client,
) -> RolesyncResult<Arc<dyn PointsFetcher>> {
    let mut fetcher = RobloxPointsFetcher::new(
        http,
        settings.require_roblox_universe_id()?,
        settings.require_roblox_api_key()?,
    );
    if let Some(url) = settings.roblox_url() {
        fetcher = fetcher.with_base_url(url.clone());
    }
    Ok(Arc::new(fetcher))
}

/// Build the engine around `store`.
///
/// # Errors
///
/// Fails on a missing credential, an invalid catalog or an unopenable
/// cache database.
#[instrument(skip_all)]
pub fn build_services(settings: &Settings, store: Arc<dyn RoleStore>) -> RolesyncResult<Services> {
    let catalog = load_catalog(settings)?;
    info!(
        categories = catalog.len(),
        managed_roles = catalog.managed_roles().len(),
        "Loaded role catalog"
    );

    let http = build_http_client(Duration::from_secs(*settings.http_timeout_secs()))?;
    let resolver = build_resolver(settings, http.clone())?;
    let fetcher = build_fetcher(settings, http.clone())?;

    let engine = RoleSync::new(Arc::new(catalog), resolver, fetcher, store);
    Ok(Services {
        engine: Arc::new(engine),
        http,
    })
}

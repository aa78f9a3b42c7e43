//! Runtime settings.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use rolesync_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const DEFAULT_SETTINGS: &str = include_str!("../rolesync.toml");

/// Where resolved identities are cached.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CacheBackend {
    /// Persistent table in a SQLite file.
    #[default]
    Sqlite,
    /// Process memory, lost on restart.
    Memory,
}

/// Everything the binary reads from files and the environment.
///
/// Credentials are optional here so offline commands (`check`, `plan`) run
/// without them; the `require_*` accessors turn a missing value into a
/// [`ConfigError`] for the commands that need it.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Settings {
    /// Bot token (`DISCORD_TOKEN`)
    #[serde(default)]
    discord_token: Option<String>,
    /// Guild whose roles are managed (`GUILD_ID`)
    #[serde(default)]
    guild_id: Option<u64>,
    /// Bloxlink API key (`BLOXLINK_API_KEY`)
    #[serde(default)]
    bloxlink_api_key: Option<String>,
    /// Roblox Open Cloud key (`ROBLOX_API_KEY`)
    #[serde(default)]
    roblox_api_key: Option<String>,
    /// Universe holding the points data store (`ROBLOX_UNIVERSE_ID`)
    #[serde(default)]
    roblox_universe_id: Option<u64>,
    /// Override for the Bloxlink API root
    #[serde(default)]
    bloxlink_url: Option<String>,
    /// Override for the Roblox API root
    #[serde(default)]
    roblox_url: Option<String>,

    /// Role catalog JSON
    roles_file: PathBuf,
    /// Fallback log filter when `RUST_LOG` is unset
    log_level: String,

    /// Whether identity lookups are cached
    use_cache: bool,
    /// Cache storage
    #[serde(default)]
    cache_backend: CacheBackend,
    /// SQLite file for the sqlite backend
    cache_db_file: String,
    /// Age after which a cached link is looked up again (both backends)
    cache_ttl_secs: u64,

    /// Timeout for each upstream request
    http_timeout_secs: u64,

    /// Application public key, hex (`DISCORD_PUBLIC_KEY`)
    #[serde(default)]
    discord_public_key: Option<String>,
    /// Application id for editing responses (`DISCORD_APPLICATION_ID`)
    #[serde(default)]
    discord_application_id: Option<u64>,
    /// Listen address for the interactions webhook
    webhook_bind: SocketAddr,
}

impl Settings {
    /// Load settings from every source, process environment included.
    ///
    /// Sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults
    /// 2. `~/.config/rolesync/rolesync.toml`
    /// 3. `./rolesync.toml`
    /// 4. `path`, if given (must exist)
    /// 5. Environment variables
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a file cannot be read or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        Self::build(path, env, true)
    }

    /// Load from the bundled defaults, `path` and `env` only.
    ///
    /// Skips the per-user and working-directory files, so the result does
    /// not depend on the machine it runs on.
    pub fn load_isolated(
        path: Option<&Path>,
        env: config::Map<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::build(path, Some(env), false)
    }

    #[instrument(skip(env))]
    fn build(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
        search_files: bool,
    ) -> Result<Self, ConfigError> {
        debug!("Loading settings");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if search_files {
            if let Some(config_dir) = dirs::config_dir() {
                let user_config = config_dir.join("rolesync/rolesync.toml");
                builder = builder.add_source(File::from(user_config).required(false));
            }
            builder = builder.add_source(File::with_name("rolesync").required(false));
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::default().try_parsing(true).source(env));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Bot token, or an error naming the variable.
    pub fn require_discord_token(&self) -> Result<&str, ConfigError> {
        required(self.discord_token.as_deref(), "DISCORD_TOKEN")
    }

    /// Managed guild id, or an error naming the variable.
    pub fn require_guild_id(&self) -> Result<u64, ConfigError> {
        required(self.guild_id, "GUILD_ID")
    }

    /// Bloxlink key, or an error naming the variable.
    pub fn require_bloxlink_api_key(&self) -> Result<&str, ConfigError> {
        required(self.bloxlink_api_key.as_deref(), "BLOXLINK_API_KEY")
    }

    /// Roblox key, or an error naming the variable.
    pub fn require_roblox_api_key(&self) -> Result<&str, ConfigError> {
        required(self.roblox_api_key.as_deref(), "ROBLOX_API_KEY")
    }

    /// Universe id, or an error naming the variable.
    pub fn require_roblox_universe_id(&self) -> Result<u64, ConfigError> {
        required(self.roblox_universe_id, "ROBLOX_UNIVERSE_ID")
    }

    /// Application public key, or an error naming the variable.
    pub fn require_discord_public_key(&self) -> Result<&str, ConfigError> {
        required(self.discord_public_key.as_deref(), "DISCORD_PUBLIC_KEY")
    }

    /// Application id, or an error naming the variable.
    pub fn require_discord_application_id(&self) -> Result<u64, ConfigError> {
        required(self.discord_application_id, "DISCORD_APPLICATION_ID")
    }
}

#[track_caller]
fn required<T>(value: Option<T>, name: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::missing_variable(name))
}

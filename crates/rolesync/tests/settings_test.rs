//! Tests for settings loading.

use rolesync::{CacheBackend, Settings};
use std::io::Write;
use std::path::Path;

fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_bundled_defaults() {
    let settings = Settings::load_isolated(None, env(&[])).unwrap();

    assert!(!*settings.use_cache());
    assert_eq!(*settings.cache_backend(), CacheBackend::Sqlite);
    assert_eq!(*settings.cache_ttl_secs(), 86_400);
    assert_eq!(settings.cache_db_file(), "cache.db");
    assert_eq!(*settings.http_timeout_secs(), 5);
    assert_eq!(settings.roles_file(), Path::new("roles.json"));
    assert_eq!(settings.webhook_bind().port(), 8080);
    assert!(settings.discord_token().is_none());
}

#[test]
fn test_environment_names() {
    let settings = Settings::load_isolated(
        None,
        env(&[
            ("DISCORD_TOKEN", "bot-token"),
            ("GUILD_ID", "123456789012345678"),
            ("BLOXLINK_API_KEY", "bloxlink-key"),
            ("ROBLOX_API_KEY", "roblox-key"),
            ("ROBLOX_UNIVERSE_ID", "4242"),
            ("USE_CACHE", "true"),
            ("CACHE_BACKEND", "memory"),
            ("CACHE_DB_FILE", "/var/lib/rolesync/cache.db"),
            ("HTTP_TIMEOUT_SECS", "9"),
            ("LOG_LEVEL", "debug"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.require_discord_token().unwrap(), "bot-token");
    assert_eq!(settings.require_guild_id().unwrap(), 123_456_789_012_345_678);
    assert_eq!(settings.require_bloxlink_api_key().unwrap(), "bloxlink-key");
    assert_eq!(settings.require_roblox_api_key().unwrap(), "roblox-key");
    assert_eq!(settings.require_roblox_universe_id().unwrap(), 4242);
    assert!(*settings.use_cache());
    assert_eq!(*settings.cache_backend(), CacheBackend::Memory);
    assert_eq!(settings.cache_db_file(), "/var/lib/rolesync/cache.db");
    assert_eq!(*settings.http_timeout_secs(), 9);
    assert_eq!(settings.log_level(), "debug");
}

#[test]
fn test_missing_credentials_name_the_variable() {
    let settings = Settings::load_isolated(None, env(&[])).unwrap();

    let err = settings.require_roblox_api_key().unwrap_err();
    assert!(err.message.contains("ROBLOX_API_KEY"));
    assert_eq!(err.subject.as_deref(), Some("ROBLOX_API_KEY"));
    let err = settings.require_discord_application_id().unwrap_err();
    assert!(err.message.contains("DISCORD_APPLICATION_ID"));
}

#[test]
fn test_config_file_overrides_defaults_and_env_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
roles_file = "/etc/rolesync/roles.json"
cache_ttl_secs = 60
guild_id = 1
"#
    )
    .unwrap();

    let settings =
        Settings::load_isolated(Some(file.path()), env(&[("GUILD_ID", "2")])).unwrap();

    assert_eq!(settings.roles_file(), Path::new("/etc/rolesync/roles.json"));
    assert_eq!(*settings.cache_ttl_secs(), 60);
    assert_eq!(settings.require_guild_id().unwrap(), 2);
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let result = Settings::load_isolated(Some(Path::new("/nonexistent/rolesync.toml")), env(&[]));
    assert!(result.is_err());
}

#[test]
fn test_malformed_value_is_an_error() {
    let result = Settings::load_isolated(None, env(&[("GUILD_ID", "not-a-number")]));
    assert!(result.is_err());
}

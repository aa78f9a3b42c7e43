//! Persistent identity cache in SQLite.

use crate::schema::roblox_cache;
use crate::{CachedIdentity, IdentityCache};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rolesync_core::{DiscordUserId, ExternalAccountId};
use rolesync_error::{CacheError, CacheErrorKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = roblox_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct IdentityRow {
    discord_id: i64,
    roblox_id: i64,
    updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = roblox_cache)]
struct NewIdentityRow {
    discord_id: i64,
    roblox_id: i64,
}

/// Snowflakes are u64; SQLite integers are signed.
fn to_db_id(id: u64) -> i64 {
    id as i64
}

fn from_db_id(id: i64) -> u64 {
    id as u64
}

/// Identity cache stored in a SQLite database file.
///
/// Uses the `roblox_cache` table (`discord_id` primary key, `roblox_id`,
/// `updated_at`). Schema migrations run on open; an existing table of the
/// same shape is reused as-is.
///
/// With a TTL set, rows whose `updated_at` is older than the TTL read as a
/// miss, so the next successful lookup refreshes them. Diesel calls run on
/// tokio's blocking pool.
pub struct SqliteIdentityCache {
    conn: Arc<Mutex<SqliteConnection>>,
    ttl: Option<Duration>,
}

impl SqliteIdentityCache {
    /// Open (creating if needed) the database at `path` and run migrations.
    ///
    /// Entries never expire until [`with_ttl`](Self::with_ttl) is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrations fail.
    #[instrument]
    pub fn open(path: &str) -> Result<Self, CacheError> {
        let mut conn = SqliteConnection::establish(path)?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| CacheError::new(CacheErrorKind::Migration(e.to_string())))?;
        info!(migrations = applied.len(), "Opened identity cache");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            ttl: None,
        })
    }

    /// Open a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, CacheError> {
        Self::open(":memory:")
    }

    /// Treat rows older than `ttl` as missing.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Configured entry lifetime, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Number of cached links, stale ones included.
    pub async fn count(&self) -> Result<i64, CacheError> {
        self.with_conn(|conn| {
            roblox_cache::table
                .count()
                .get_result(conn)
                .map_err(CacheError::from)
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, CacheError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            f(&mut *conn)
        })
            .await
            .map_err(|e| {
                CacheError::new(CacheErrorKind::Connection(format!(
                    "Cache task failed: {}",
                    e
                )))
            })?
    }

    fn is_stale(&self, updated_at: NaiveDateTime) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        match (Utc::now().naive_utc() - updated_at).to_std() {
            Ok(age) => age > ttl,
            // stamped in the future; clock skew, keep it
            Err(_) => false,
        }
    }
}

#[async_trait]
impl IdentityCache for SqliteIdentityCache {
    #[instrument(skip(self), fields(discord_id = %discord_id))]
    async fn get(&self, discord_id: DiscordUserId) -> Result<Option<CachedIdentity>, CacheError> {
        let key = to_db_id(discord_id.get());
        let row = self
            .with_conn(move |conn| {
                roblox_cache::table
                    .find(key)
                    .select(IdentityRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(CacheError::from)
            })
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        if self.is_stale(row.updated_at) {
            debug!(updated_at = %row.updated_at, "Cached identity is stale");
            return Ok(None);
        }

        Ok(Some(CachedIdentity::new(
            DiscordUserId::new(from_db_id(row.discord_id)),
            ExternalAccountId::new(from_db_id(row.roblox_id)),
            row.updated_at,
        )))
    }

    #[instrument(skip(self), fields(discord_id = %discord_id, roblox_id = %roblox_id))]
    async fn put(
        &self,
        discord_id: DiscordUserId,
        roblox_id: ExternalAccountId,
    ) -> Result<(), CacheError> {
        let row = NewIdentityRow {
            discord_id: to_db_id(discord_id.get()),
            roblox_id: to_db_id(roblox_id.get()),
        };

        self.with_conn(move |conn| {
            diesel::insert_into(roblox_cache::table)
                .values(&row)
                .on_conflict(roblox_cache::discord_id)
                .do_update()
                .set((
                    roblox_cache::roblox_id.eq(row.roblox_id),
                    roblox_cache::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .map_err(CacheError::from)
        })
        .await?;

        debug!("Upserted identity");
        Ok(())
    }
}

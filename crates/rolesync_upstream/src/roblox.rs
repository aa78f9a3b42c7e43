//! Point totals from the Roblox Open Cloud data store API.

use crate::http::{body_error, send_error};
use async_trait::async_trait;
use reqwest::Client;
use rolesync_core::{ExternalAccountId, PointTotals, PointsFetcher};
use rolesync_error::{UpstreamError, UpstreamErrorKind};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Production Roblox API root.
pub const DEFAULT_ROBLOX_URL: &str = "https://apis.roblox.com";

/// Data store holding one entry per player.
pub const POINTS_DATASTORE: &str = "PlayerPoints";

/// Entry field read into the `siteop` category.
pub const SITEOP_FIELD: &str = "SiteopPoints";

/// Entry field read into the `security` category.
pub const SECURITY_FIELD: &str = "SecurityPoints";

const SERVICE: &str = "roblox";

/// Reads a player's points entry from a universe's data store.
#[derive(Debug, Clone)]
pub struct RobloxPointsFetcher {
    client: Client,
    base_url: String,
    universe_id: u64,
    api_key: String,
}

impl RobloxPointsFetcher {
    /// Create a fetcher for `universe_id` against the production API.
    pub fn new(client: Client, universe_id: u64, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_ROBLOX_URL.to_string(),
            universe_id,
            api_key: api_key.into(),
        }
    }

    /// Point the fetcher at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Universe whose data store is read.
    pub fn universe_id(&self) -> u64 {
        self.universe_id
    }

    fn entry_url(&self, account: ExternalAccountId) -> String {
        format!(
            "{}/cloud/v2/universes/{}/data-stores/{}/entries/{}",
            self.base_url, self.universe_id, POINTS_DATASTORE, account
        )
    }
}

#[async_trait]
impl PointsFetcher for RobloxPointsFetcher {
    #[instrument(skip(self), fields(roblox_id = %account, universe_id = self.universe_id))]
    async fn fetch(&self, account: ExternalAccountId) -> Result<PointTotals, UpstreamError> {
        let response = self
            .client
            .get(self.entry_url(account))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Points lookup failed");
            return Err(UpstreamError::new(UpstreamErrorKind::Status {
                service: SERVICE,
                status: status.as_u16(),
            }));
        }

        let body: Value = response.json().await.map_err(|e| body_error(SERVICE, e))?;
        let totals = points_from_entry(&body);
        debug!(?totals, "Fetched points");
        Ok(totals)
    }
}

/// Read the `siteop` and `security` totals out of a data store entry.
///
/// Fields live under `value`. Missing or non-numeric fields count as zero,
/// negative values clamp to zero and fractional values truncate.
///
/// # Examples
///
/// ```
/// use rolesync_core::{SECURITY, SITEOP};
/// use rolesync_upstream::points_from_entry;
///
/// let body = serde_json::json!({ "value": { "SiteopPoints": 120.9, "SecurityPoints": -4 } });
/// let totals = points_from_entry(&body);
/// assert_eq!(totals.get(SITEOP), 120);
/// assert_eq!(totals.get(SECURITY), 0);
/// ```
pub fn points_from_entry(body: &Value) -> PointTotals {
    let value = body.get("value");
    let field = |name: &str| value.and_then(|v| v.get(name)).map_or(0, coerce_points);
    PointTotals::siteop_security(field(SITEOP_FIELD), field(SECURITY_FIELD))
}

fn coerce_points(raw: &Value) -> u64 {
    let number = match raw {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                return n;
            }
            n.as_f64()
        }
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

//! Discord-to-Roblox identity lookups through the Bloxlink public API.

use crate::http::{body_error, send_error};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rolesync_core::{DiscordUserId, ExternalAccountId, IdentityResolver};
use rolesync_error::UpstreamError;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Production Bloxlink API root.
pub const DEFAULT_BLOXLINK_URL: &str = "https://api.blox.link";

const SERVICE: &str = "bloxlink";

/// Resolves Discord users to Roblox accounts via Bloxlink.
///
/// Lookups are scoped to one guild. Any non-200 answer, and a `robloxID` of
/// zero or missing, means the user has no link.
#[derive(Debug, Clone)]
pub struct BloxlinkResolver {
    client: Client,
    base_url: String,
    guild_id: u64,
    api_key: String,
}

impl BloxlinkResolver {
    /// Create a resolver for `guild_id` against the production API.
    pub fn new(client: Client, guild_id: u64, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BLOXLINK_URL.to_string(),
            guild_id,
            api_key: api_key.into(),
        }
    }

    /// Point the resolver at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Guild the lookups are scoped to.
    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    fn link_url(&self, discord_id: DiscordUserId) -> String {
        format!(
            "{}/v4/public/guilds/{}/discord-to-roblox/{}",
            self.base_url, self.guild_id, discord_id
        )
    }
}

#[async_trait]
impl IdentityResolver for BloxlinkResolver {
    #[instrument(skip(self), fields(discord_id = %discord_id, guild_id = self.guild_id))]
    async fn resolve(
        &self,
        discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError> {
        let response = self
            .client
            .get(self.link_url(discord_id))
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            if status == StatusCode::NOT_FOUND {
                debug!("No Bloxlink link for user");
            } else {
                warn!(status = status.as_u16(), "Bloxlink lookup failed");
            }
            return Ok(None);
        }

        let body: Value = response.json().await.map_err(|e| body_error(SERVICE, e))?;
        let linked = roblox_id_from_link(&body);
        debug!(roblox_id = ?linked.map(ExternalAccountId::get), "Bloxlink lookup complete");
        Ok(linked)
    }
}

/// Extract the linked account from a Bloxlink response body.
///
/// `robloxID` may be a JSON number or a numeric string. Zero, a missing
/// field, or anything that is not a positive integer yields `None`.
///
/// # Examples
///
/// ```
/// use rolesync_core::ExternalAccountId;
/// use rolesync_upstream::roblox_id_from_link;
///
/// let body = serde_json::json!({ "robloxID": "1234" });
/// assert_eq!(roblox_id_from_link(&body), Some(ExternalAccountId::new(1234)));
/// assert_eq!(roblox_id_from_link(&serde_json::json!({ "robloxID": 0 })), None);
/// ```
pub fn roblox_id_from_link(body: &Value) -> Option<ExternalAccountId> {
    let id = match body.get("robloxID")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match id {
        Some(0) | None => None,
        Some(id) => Some(ExternalAccountId::new(id)),
    }
}

//! JSON models for interactions delivered to the webhook endpoint.
//!
//! Only the fields `/update` needs are modelled; everything else Discord
//! sends is ignored.

use derive_getters::Getters;
use rolesync_core::{DiscordUserId, RoleId};
use serde::{Deserialize, Serialize};

/// Interaction type for Discord's endpoint health check.
pub const INTERACTION_PING: u8 = 1;
/// Interaction type for a slash command invocation.
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Response type acknowledging a ping.
pub const RESPONSE_PONG: u8 = 1;
/// Response type sending a message in reply.
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;

/// Message flag hiding a reply from everyone but the invoker.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

/// Incoming interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Getters)]
pub struct InteractionJson {
    /// Interaction type
    #[serde(rename = "type")]
    kind: u8,
    /// Continuation token for editing the response
    #[serde(default)]
    token: String,
    /// Guild the command was used in, absent in DMs
    #[serde(default)]
    guild_id: Option<String>,
    /// Invoking guild member, absent in DMs
    #[serde(default)]
    member: Option<InteractionMemberJson>,
    /// Invoking user, only present in DMs
    #[serde(default)]
    user: Option<InteractionUserJson>,
    /// Command payload for application commands
    #[serde(default)]
    data: Option<CommandDataJson>,
}

/// Guild member attached to an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Getters)]
pub struct InteractionMemberJson {
    /// The member's user
    user: InteractionUserJson,
    /// Role ids the member holds
    #[serde(default)]
    roles: Vec<RoleId>,
}

/// User attached to an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Getters)]
pub struct InteractionUserJson {
    /// Discord snowflake ID
    id: DiscordUserId,
    /// Account username
    username: String,
    /// Display name, if set
    #[serde(default)]
    global_name: Option<String>,
}

impl InteractionUserJson {
    /// Name shown in the report footer.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// Application command payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Getters)]
pub struct CommandDataJson {
    /// Command name
    name: String,
}

impl InteractionJson {
    /// Command name, if this is an application command.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.name.as_str())
    }
}

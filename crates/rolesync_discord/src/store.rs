//! Guild role membership through the Discord REST API.

use async_trait::async_trait;
use rolesync_core::{CurrentRoleSet, DiscordUserId, MutationOutcome, RoleId, RoleStore};
use rolesync_error::{RoleStoreError, RoleStoreErrorKind};
use serenity::all::{GuildId, RoleId as SerenityRoleId, UserId};
use serenity::http::{Http, HttpError};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Discord JSON error code for a role that does not exist.
pub const UNKNOWN_ROLE_CODE: isize = 10011;
/// Discord JSON error code for a user who is not a guild member.
pub const UNKNOWN_MEMBER_CODE: isize = 10007;

const AUDIT_REASON: &str = "Roblox points sync";

/// [`RoleStore`] backed by serenity's HTTP client, scoped to one guild.
///
/// Discord's add and remove endpoints are idempotent and do not report
/// whether anything changed, so every success is [`MutationOutcome::Applied`].
#[derive(Clone)]
pub struct SerenityRoleStore {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityRoleStore {
    /// Create a store for `guild_id`.
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }

    /// Guild whose roles are changed.
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }
}

#[async_trait]
impl RoleStore for SerenityRoleStore {
    #[instrument(skip(self), fields(guild_id = %self.guild_id, discord_id = %user))]
    async fn current_roles(&self, user: DiscordUserId) -> Result<CurrentRoleSet, RoleStoreError> {
        let member = self
            .http
            .get_member(self.guild_id, UserId::new(user.get()))
            .await
            .map_err(|e| RoleStoreError::new(role_error_kind(&e)))?;
        debug!(held = member.roles.len(), "Fetched member roles");
        Ok(member
            .roles
            .iter()
            .map(|role| RoleId::new(role.get()))
            .collect())
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id, discord_id = %user, role_id = %role))]
    async fn add_role(
        &self,
        user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        self.http
            .add_member_role(
                self.guild_id,
                UserId::new(user.get()),
                SerenityRoleId::new(role.get()),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| RoleStoreError::new(role_error_kind(&e)))?;
        debug!("Role added");
        Ok(MutationOutcome::Applied)
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id, discord_id = %user, role_id = %role))]
    async fn remove_role(
        &self,
        user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        self.http
            .remove_member_role(
                self.guild_id,
                UserId::new(user.get()),
                SerenityRoleId::new(role.get()),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| RoleStoreError::new(role_error_kind(&e)))?;
        debug!("Role removed");
        Ok(MutationOutcome::Applied)
    }
}

/// Classify a serenity failure from a membership read or role mutation.
pub fn role_error_kind(err: &serenity::Error) -> RoleStoreErrorKind {
    let kind = match err {
        serenity::Error::Http(http) => http_error_kind(http),
        other => RoleStoreErrorKind::Other(other.to_string()),
    };
    warn!(error = %err, kind = %kind, "Role store request failed");
    kind
}

fn http_error_kind(err: &HttpError) -> RoleStoreErrorKind {
    match err {
        HttpError::UnsuccessfulRequest(response) => role_error_from_response(
            response.status_code.as_u16(),
            response.error.code,
            &response.error.message,
        ),
        HttpError::Request(e) => RoleStoreErrorKind::Unreachable(e.to_string()),
        other => RoleStoreErrorKind::Other(other.to_string()),
    }
}

/// Classify a Discord error response by HTTP status and JSON error code.
///
/// # Examples
///
/// ```
/// use rolesync_discord::role_error_from_response;
/// use rolesync_error::RoleStoreErrorKind;
///
/// let kind = role_error_from_response(404, 10011, "Unknown Role");
/// assert_eq!(kind, RoleStoreErrorKind::UnknownRole);
/// ```
pub fn role_error_from_response(status: u16, code: isize, message: &str) -> RoleStoreErrorKind {
    match (status, code) {
        (_, UNKNOWN_ROLE_CODE) => RoleStoreErrorKind::UnknownRole,
        (_, UNKNOWN_MEMBER_CODE) => RoleStoreErrorKind::UnknownMember,
        (401 | 403, _) => RoleStoreErrorKind::PermissionDenied(message.to_string()),
        (429, _) => RoleStoreErrorKind::RateLimited(message.to_string()),
        (500..=599, _) => RoleStoreErrorKind::Unreachable(format!("HTTP {}: {}", status, message)),
        _ => RoleStoreErrorKind::Other(format!("HTTP {}: {}", status, message)),
    }
}

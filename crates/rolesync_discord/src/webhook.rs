//! HTTP interactions endpoint.
//!
//! An alternative to the gateway bot: Discord POSTs each interaction to
//! `/interactions`, signed with the application key. `/update` is answered
//! at once with an ephemeral "Updating Roles" embed; the sync then runs in
//! the background and the original response is edited with the report.

use crate::json_models::{
    EPHEMERAL_FLAG, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING, InteractionJson,
    RESPONSE_CHANNEL_MESSAGE, RESPONSE_PONG,
};
use crate::render::{ReportView, outcome_view, updating_view};
use crate::signature::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER};
use crate::{DiscordError, DiscordErrorKind, DiscordResult, UPDATE_COMMAND, UpdateCommand};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use rolesync_core::CurrentRoleSet;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Discord REST API root.
pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

const EDIT_ATTEMPTS: u32 = 3;
const EDIT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Edits interaction responses through the webhook API.
#[derive(Debug, Clone)]
pub struct FollowupClient {
    client: reqwest::Client,
    api_url: String,
    application_id: u64,
}

impl FollowupClient {
    /// Create a client for `application_id`.
    pub fn new(client: reqwest::Client, application_id: u64) -> Self {
        Self {
            client,
            api_url: DISCORD_API_URL.to_string(),
            application_id,
        }
    }

    /// Point the client at another API root.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the embed of the original response.
    ///
    /// The original response may not be registered yet when a sync finishes
    /// quickly, so a 404 is retried a few times.
    #[instrument(skip(self, token, view), fields(application_id = self.application_id))]
    pub async fn edit_original(&self, token: &str, view: &ReportView) -> DiscordResult<()> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_url, self.application_id, token
        );
        let body = json!({ "embeds": [view.to_json()] });

        let mut attempt = 1;
        loop {
            let response = self
                .client
                .patch(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| DiscordError::new(DiscordErrorKind::FollowupFailed(e.to_string())))?;

            let status = response.status();
            if status.is_success() {
                debug!(attempt, "Edited original response");
                return Ok(());
            }
            if status == reqwest::StatusCode::NOT_FOUND && attempt < EDIT_ATTEMPTS {
                debug!(attempt, "Original response not found yet, retrying");
                attempt += 1;
                tokio::time::sleep(EDIT_RETRY_DELAY).await;
                continue;
            }
            return Err(DiscordError::new(DiscordErrorKind::FollowupFailed(format!(
                "HTTP {}",
                status.as_u16()
            ))));
        }
    }
}

/// Shared state of the webhook router.
#[derive(Clone)]
pub struct WebhookState {
    command: Arc<UpdateCommand>,
    verifier: Arc<SignatureVerifier>,
    followup: FollowupClient,
    guild_id: u64,
}

impl WebhookState {
    /// Bundle everything the endpoint needs.
    pub fn new(
        command: Arc<UpdateCommand>,
        verifier: SignatureVerifier,
        followup: FollowupClient,
        guild_id: u64,
    ) -> Self {
        Self {
            command,
            verifier: Arc::new(verifier),
            followup,
            guild_id,
        }
    }
}

/// Creates the interactions router.
pub fn create_router(state: WebhookState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/interactions", post(handle_interaction))
        .with_state(state)
}

/// Bind `addr` and serve the interactions endpoint until the process exits.
#[instrument(skip(state))]
pub async fn serve(addr: SocketAddr, state: WebhookState) -> DiscordResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DiscordError::new(DiscordErrorKind::ServerFailed(e.to_string())))?;
    info!(%addr, "Interactions endpoint listening");

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| DiscordError::new(DiscordErrorKind::ServerFailed(e.to_string())))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

async fn handle_interaction(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (Some(signature), Some(timestamp)) = (
        header(&headers, SIGNATURE_HEADER),
        header(&headers, TIMESTAMP_HEADER),
    ) else {
        warn!("Interaction without signature headers");
        return (StatusCode::UNAUTHORIZED, "missing request signature").into_response();
    };

    if let Err(e) = state.verifier.verify(timestamp, &body, signature) {
        warn!(error = %e, "Rejected interaction");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: InteractionJson = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!(error = %e, "Undecodable interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction").into_response();
        }
    };

    match *interaction.kind() {
        INTERACTION_PING => {
            debug!("Answering ping");
            Json(json!({ "type": RESPONSE_PONG })).into_response()
        }
        INTERACTION_APPLICATION_COMMAND => handle_command(state, interaction),
        other => {
            debug!(kind = other, "Ignoring unsupported interaction type");
            (StatusCode::BAD_REQUEST, "unsupported interaction type").into_response()
        }
    }
}

fn handle_command(state: WebhookState, interaction: InteractionJson) -> Response {
    if interaction.command_name() != Some(UPDATE_COMMAND) {
        debug!(command = ?interaction.command_name(), "Unknown command");
        return ephemeral(json!({ "content": "Unknown command." }));
    }

    let in_guild = interaction
        .guild_id()
        .as_deref()
        .and_then(|id| id.parse::<u64>().ok())
        == Some(state.guild_id);
    let Some(member) = interaction.member().clone().filter(|_| in_guild) else {
        return ephemeral(json!({ "content": "This command only works in the configured server." }));
    };

    let user = *member.user().id();
    let requested_by = member.user().display_name().to_string();
    let current: CurrentRoleSet = member.roles().iter().copied().collect();
    let token = interaction.token().clone();
    let pending = updating_view(&requested_by);

    info!(discord_id = %user, "Received /update");
    tokio::spawn(async move {
        let outcome = state.command.run(user, &current).await;
        let view = outcome_view(&outcome, &requested_by);
        if let Err(e) = state.followup.edit_original(&token, &view).await {
            error!(discord_id = %user, error = %e, "Failed to deliver sync report");
        }
    });

    ephemeral(json!({ "embeds": [pending.to_json()] }))
}

fn ephemeral(mut data: Value) -> Response {
    data["flags"] = json!(EPHEMERAL_FLAG);
    Json(json!({ "type": RESPONSE_CHANNEL_MESSAGE, "data": data })).into_response()
}

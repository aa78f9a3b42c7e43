//! Long-running transports.

use rolesync::{Settings, build_services};
use rolesync_discord::webhook::serve;
use rolesync_discord::{
    FollowupClient, RolesyncBot, RolesyncHandler, SerenityRoleStore, SignatureVerifier,
    UpdateCommand, WebhookState,
};
use serenity::http::Http;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, instrument};

fn role_store(settings: &Settings) -> Result<Arc<SerenityRoleStore>, Box<dyn std::error::Error>> {
    let http = Arc::new(Http::new(settings.require_discord_token()?));
    Ok(Arc::new(SerenityRoleStore::new(
        http,
        settings.require_guild_id()?,
    )))
}

/// Run the gateway bot until it disconnects.
#[instrument(skip(settings))]
pub async fn run_gateway(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let guild_id = settings.require_guild_id()?;
    let services = build_services(settings, role_store(settings)?)?;
    let command = Arc::new(UpdateCommand::new(services.engine));

    let handler = RolesyncHandler::new(command, guild_id);
    let mut bot = RolesyncBot::new(settings.require_discord_token()?, handler).await?;
    info!(guild_id, "Starting gateway bot");
    bot.start().await?;
    Ok(())
}

/// Serve the interactions endpoint until the process exits.
#[instrument(skip(settings))]
pub async fn run_webhook(
    settings: &Settings,
    bind: Option<SocketAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    let guild_id = settings.require_guild_id()?;
    let verifier = SignatureVerifier::from_hex(settings.require_discord_public_key()?)?;
    let application_id = settings.require_discord_application_id()?;

    let services = build_services(settings, role_store(settings)?)?;
    let followup = FollowupClient::new(services.http.clone(), application_id);
    let command = Arc::new(UpdateCommand::new(services.engine));

    let state = WebhookState::new(command, verifier, followup, guild_id);
    let addr = bind.unwrap_or(*settings.webhook_bind());
    serve(addr, state).await?;
    Ok(())
}

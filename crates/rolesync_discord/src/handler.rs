//! Serenity event handler for the gateway bot.

use crate::render::{outcome_view, updating_view};
use crate::{UPDATE_COMMAND, UPDATE_DESCRIPTION, UpdateCommand};
use rolesync_core::{CurrentRoleSet, DiscordUserId, RoleId};
use serenity::all::{
    CommandInteraction, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, GuildId, Interaction, Ready,
};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Event handler for the rolesync bot.
///
/// Registers `/update` in the configured guild once connected and answers
/// it by running the sync engine for the invoking member.
pub struct RolesyncHandler {
    command: Arc<UpdateCommand>,
    guild_id: GuildId,
}

impl RolesyncHandler {
    /// Create a handler serving `guild_id`.
    pub fn new(command: Arc<UpdateCommand>, guild_id: u64) -> Self {
        Self {
            command,
            guild_id: GuildId::new(guild_id),
        }
    }

    /// Required gateway intents for the bot.
    ///
    /// Interactions arrive regardless of intents; guild data is enough.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    #[instrument(skip(self, ctx, command), fields(discord_id = %command.user.id))]
    async fn handle_update(&self, ctx: &Context, command: &CommandInteraction) {
        let requested_by = command
            .user
            .global_name
            .clone()
            .unwrap_or_else(|| command.user.name.clone());

        let member = match (&command.member, command.guild_id) {
            (Some(member), Some(guild_id)) if guild_id == self.guild_id => member,
            _ => {
                warn!(guild_id = ?command.guild_id, "Command used outside the configured guild");
                let reply = CreateInteractionResponseMessage::new()
                    .content("This command only works in the configured server.")
                    .ephemeral(true);
                if let Err(e) = command
                    .create_response(&ctx.http, CreateInteractionResponse::Message(reply))
                    .await
                {
                    error!(error = %e, "Failed to respond");
                }
                return;
            }
        };

        let pending = CreateInteractionResponseMessage::new()
            .embed(updating_view(&requested_by).to_embed())
            .ephemeral(true);
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(pending))
            .await
        {
            error!(error = %e, "Failed to send initial response");
            return;
        }

        let current: CurrentRoleSet = member
            .roles
            .iter()
            .map(|role| RoleId::new(role.get()))
            .collect();
        let outcome = self
            .command
            .run(DiscordUserId::new(command.user.id.get()), &current)
            .await;

        let view = outcome_view(&outcome, &requested_by);
        if let Err(e) = command
            .edit_response(&ctx.http, EditInteractionResponse::new().embed(view.to_embed()))
            .await
        {
            error!(error = %e, "Failed to deliver sync report");
        }
    }
}

#[async_trait]
impl EventHandler for RolesyncHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );

        let update = CreateCommand::new(UPDATE_COMMAND).description(UPDATE_DESCRIPTION);
        match self.guild_id.set_commands(&ctx.http, vec![update]).await {
            Ok(commands) => info!(
                guild_id = %self.guild_id,
                registered = commands.len(),
                "Registered slash commands"
            ),
            Err(e) => error!(guild_id = %self.guild_id, error = %e, "Failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if command.data.name == UPDATE_COMMAND {
            self.handle_update(&ctx, &command).await;
        } else {
            debug!(command = %command.data.name, "Ignoring unknown command");
        }
    }
}

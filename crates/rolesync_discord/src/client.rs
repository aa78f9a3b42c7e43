//! Discord bot client setup and lifecycle management.

use crate::{DiscordError, DiscordErrorKind, RolesyncHandler};
use serenity::Client;
use tracing::{info, instrument};

/// Gateway bot serving `/update`.
///
/// # Example
/// ```no_run
/// use rolesync_discord::{RolesyncBot, RolesyncHandler, UpdateCommand};
/// # use std::sync::Arc;
/// # async fn run(command: Arc<UpdateCommand>) -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let handler = RolesyncHandler::new(command, 123456789012345678);
///
/// let mut bot = RolesyncBot::new(&token, handler).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct RolesyncBot {
    client: Client,
}

impl RolesyncBot {
    /// Build the serenity client.
    ///
    /// # Errors
    /// Returns an error if the token is rejected or the client fails to
    /// initialize.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new(token: &str, handler: RolesyncHandler) -> Result<Self, DiscordError> {
        let intents = RolesyncHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Connect and process events until shutdown.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}

//! Rolesync CLI binary.
//!
//! This binary provides:
//! - The gateway bot answering `/update`
//! - The HTTP interactions endpoint, as an alternative transport
//! - Offline catalog checks and dry-run plans

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_catalog, plan_offline, run_gateway, run_webhook};
    use rolesync::{Settings, init_tracing};

    // Parse command-line arguments
    let cli = Cli::parse();

    // .env is optional
    let _ = dotenvy::dotenv();

    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(settings.log_level(), cli.verbose);

    match cli.command {
        Commands::Gateway => {
            run_gateway(&settings).await?;
        }

        Commands::Webhook { bind } => {
            run_webhook(&settings, bind).await?;
        }

        Commands::Check { roles } => {
            check_catalog(&settings, roles.as_deref())?;
        }

        Commands::Plan {
            siteop,
            security,
            current,
            roles,
        } => {
            plan_offline(&settings, roles.as_deref(), siteop, security, &current)?;
        }
    }

    Ok(())
}

//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Rolesync - keep Discord roles in step with Roblox points
#[derive(Parser, Debug)]
#[command(name = "rolesync")]
#[command(about = "Keep Discord roles in step with Roblox points", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file to load on top of the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the Discord gateway and serve /update
    Gateway,

    /// Serve /update over Discord's HTTP interactions endpoint
    Webhook {
        /// Listen address (defaults to the webhook_bind setting)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Validate the role catalog and print its tiers
    Check {
        /// Catalog file (defaults to the roles_file setting)
        #[arg(long)]
        roles: Option<PathBuf>,
    },

    /// Show which roles given points would add and remove, without touching Discord
    Plan {
        /// Site operator points
        #[arg(long, default_value = "0")]
        siteop: u64,

        /// Security points
        #[arg(long, default_value = "0")]
        security: u64,

        /// Role ids currently held, comma separated
        #[arg(long, value_delimiter = ',')]
        current: Vec<u64>,

        /// Catalog file (defaults to the roles_file setting)
        #[arg(long)]
        roles: Option<PathBuf>,
    },
}

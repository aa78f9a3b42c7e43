//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the rolesync binary.

mod commands;
mod offline;
mod serve;

pub use commands::{Cli, Commands};
pub use offline::{check_catalog, plan_offline};
pub use serve::{run_gateway, run_webhook};

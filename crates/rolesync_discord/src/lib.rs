//! Discord transports for rolesync.
//!
//! Two ways to receive `/update`, both feeding the same [`UpdateCommand`]:
//!
//! - **gateway**: [`RolesyncBot`] connects with serenity, registers the
//!   command in the configured guild and handles it in [`RolesyncHandler`]
//! - **webhook**: [`webhook::create_router`] serves Discord's HTTP
//!   interactions endpoint, checking each request with a
//!   [`SignatureVerifier`]
//!
//! Role changes go through [`SerenityRoleStore`]. Reports are rendered by
//! the [`render`] module.

#![warn(missing_docs)]

mod client;
mod command;
mod error;
mod handler;
pub mod json_models;
mod locks;
pub mod render;
mod signature;
mod store;
pub mod webhook;

pub use client::RolesyncBot;
pub use command::{UPDATE_COMMAND, UPDATE_DESCRIPTION, UpdateCommand};
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::RolesyncHandler;
pub use locks::UserLocks;
pub use signature::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER};
pub use store::{
    SerenityRoleStore, UNKNOWN_MEMBER_CODE, UNKNOWN_ROLE_CODE, role_error_from_response,
    role_error_kind,
};
pub use webhook::{FollowupClient, WebhookState};

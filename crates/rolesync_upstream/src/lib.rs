//! HTTP collaborators for rolesync.
//!
//! [`BloxlinkResolver`] maps a Discord user to a linked Roblox account and
//! [`RobloxPointsFetcher`] reads that account's point totals from a Roblox
//! Open Cloud data store. Both take a shared [`reqwest::Client`] built once
//! by the caller with [`build_http_client`], so the timeout applies to every
//! upstream request.

#![warn(missing_docs)]

mod bloxlink;
mod http;
mod roblox;

pub use bloxlink::{BloxlinkResolver, DEFAULT_BLOXLINK_URL, roblox_id_from_link};
pub use http::{DEFAULT_HTTP_TIMEOUT, build_http_client};
pub use roblox::{
    DEFAULT_ROBLOX_URL, POINTS_DATASTORE, RobloxPointsFetcher, SECURITY_FIELD, SITEOP_FIELD,
    points_from_entry,
};

//! Snowflake-style identifiers.
//!
//! Discord and Roblox both hand out 64-bit unsigned ids. JSON producers are
//! inconsistent about whether they arrive as numbers or strings, so every id
//! here deserializes from either.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

fn deserialize_snowflake<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid snowflake id '{}'", s))),
    }
}

/// Discord user id.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct DiscordUserId(u64);

impl DiscordUserId {
    /// Wrap a raw snowflake.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw snowflake value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for DiscordUserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_snowflake(deserializer).map(Self)
    }
}

/// Roblox account id linked to a Discord user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ExternalAccountId(u64);

impl ExternalAccountId {
    /// Wrap a raw account id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw account id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ExternalAccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_snowflake(deserializer).map(Self)
    }
}

/// Discord role id.
///
/// # Examples
///
/// ```
/// use rolesync_core::RoleId;
///
/// let from_number: RoleId = serde_json::from_str("1200").unwrap();
/// let from_text: RoleId = serde_json::from_str("\"1200\"").unwrap();
/// assert_eq!(from_number, from_text);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RoleId(u64);

impl RoleId {
    /// Wrap a raw snowflake.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw snowflake value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for RoleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_snowflake(deserializer).map(Self)
    }
}

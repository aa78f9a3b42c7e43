//! Shared fixtures for the Discord transport tests.

#![allow(dead_code)]

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use rolesync_core::{
    CurrentRoleSet, DiscordUserId, ExternalAccountId, IdentityResolver, MutationOutcome, PointTotals,
    PointsFetcher, RoleCatalog, RoleId, RoleStore, RoleSync, RoleTier,
};
use rolesync_discord::{SignatureVerifier, UpdateCommand};
use rolesync_error::{RoleStoreError, UpstreamError};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const SITEOP_BASIC: RoleId = RoleId::new(111);
pub const SITEOP_SENIOR: RoleId = RoleId::new(222);
pub const SECURITY_CADET: RoleId = RoleId::new(333);

pub fn catalog() -> RoleCatalog {
    RoleCatalog::default()
        .with_category(
            "siteop",
            vec![
                RoleTier::new(SITEOP_BASIC, 0),
                RoleTier::new(SITEOP_SENIOR, 100),
            ],
        )
        .with_category("security", vec![RoleTier::new(SECURITY_CADET, 50)])
}

pub struct FixedResolver(pub Option<u64>);

#[async_trait]
impl IdentityResolver for FixedResolver {
    async fn resolve(
        &self,
        _discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError> {
        Ok(self.0.map(ExternalAccountId::new))
    }
}

/// Hands out siteop totals in order, repeating the last one.
pub struct ScriptedFetcher {
    pub siteop: Vec<u64>,
    pub calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(siteop: Vec<u64>) -> Self {
        Self {
            siteop,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PointsFetcher for ScriptedFetcher {
    async fn fetch(&self, _account: ExternalAccountId) -> Result<PointTotals, UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let siteop = self
            .siteop
            .get(call)
            .or_else(|| self.siteop.last())
            .copied()
            .unwrap_or_default();
        Ok(PointTotals::siteop_security(siteop, 0))
    }
}

pub struct FixedFetcher(pub u64, pub u64);

#[async_trait]
impl PointsFetcher for FixedFetcher {
    async fn fetch(&self, _account: ExternalAccountId) -> Result<PointTotals, UpstreamError> {
        Ok(PointTotals::siteop_security(self.0, self.1))
    }
}

/// Role store that records calls and how many overlap.
#[derive(Default)]
pub struct SlowStore {
    pub delay: Duration,
    pub held: Mutex<BTreeSet<RoleId>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl SlowStore {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn holding(self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        *self.held.lock().unwrap() = roles.into_iter().collect();
        self
    }

    async fn mutate(&self, role: RoleId, add: bool) -> MutationOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        {
            let mut held = self.held.lock().unwrap();
            if add {
                held.insert(role);
            } else {
                held.remove(&role);
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        MutationOutcome::Applied
    }
}

#[async_trait]
impl RoleStore for SlowStore {
    async fn current_roles(&self, _user: DiscordUserId) -> Result<CurrentRoleSet, RoleStoreError> {
        Ok(self.held.lock().unwrap().clone())
    }

    async fn add_role(
        &self,
        _user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        Ok(self.mutate(role, true).await)
    }

    async fn remove_role(
        &self,
        _user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        Ok(self.mutate(role, false).await)
    }
}

pub fn update_command(
    linked: Option<u64>,
    siteop: u64,
    security: u64,
    store: Arc<SlowStore>,
) -> Arc<UpdateCommand> {
    let engine = RoleSync::new(
        Arc::new(catalog()),
        Arc::new(FixedResolver(linked)),
        Arc::new(FixedFetcher(siteop, security)),
        store,
    );
    Arc::new(UpdateCommand::new(Arc::new(engine)))
}

/// Deterministic application key pair.
pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

pub fn verifier() -> SignatureVerifier {
    SignatureVerifier::from_hex(&hex::encode(signing_key().verifying_key().to_bytes())).unwrap()
}

/// Hex signature over `timestamp || body`.
pub fn sign(timestamp: &str, body: &[u8]) -> String {
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body);
    hex::encode(signing_key().sign(&message).to_bytes())
}

//! In-memory collaborators shared by the engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rolesync_core::{
    CurrentRoleSet, DiscordUserId, ExternalAccountId, IdentityResolver, MutationOutcome, PointTotals,
    PointsFetcher, RoleCatalog, RoleId, RoleStore, RoleTier,
};
use rolesync_error::{RoleStoreError, RoleStoreErrorKind, UpstreamError, UpstreamErrorKind};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ROLE_A: RoleId = RoleId::new(1001);
pub const ROLE_B: RoleId = RoleId::new(1002);
pub const ROLE_C: RoleId = RoleId::new(1003);
pub const GUARD_1: RoleId = RoleId::new(2001);
pub const GUARD_2: RoleId = RoleId::new(2002);
pub const UNMANAGED: RoleId = RoleId::new(9999);

pub const USER: DiscordUserId = DiscordUserId::new(42);
pub const ACCOUNT: ExternalAccountId = ExternalAccountId::new(7_000_000);

/// siteop: A@0, B@100, C@500 (listed out of order); security: G1@50, G2@250.
pub fn sample_catalog() -> RoleCatalog {
    RoleCatalog::default()
        .with_category(
            "siteop",
            vec![
                RoleTier::new(ROLE_C, 500),
                RoleTier::new(ROLE_A, 0),
                RoleTier::new(ROLE_B, 100),
            ],
        )
        .with_category(
            "security",
            vec![RoleTier::new(GUARD_2, 250), RoleTier::new(GUARD_1, 50)],
        )
}

pub enum ResolverMode {
    Linked(ExternalAccountId),
    Unlinked,
    Failing,
}

pub struct FakeResolver {
    mode: ResolverMode,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new(mode: ResolverMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for FakeResolver {
    async fn resolve(
        &self,
        _discord_id: DiscordUserId,
    ) -> Result<Option<ExternalAccountId>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ResolverMode::Linked(id) => Ok(Some(id)),
            ResolverMode::Unlinked => Ok(None),
            ResolverMode::Failing => Err(UpstreamError::new(UpstreamErrorKind::Timeout("bloxlink"))),
        }
    }
}

/// Returns the scripted totals in order, repeating the last one.
pub struct FakeFetcher {
    points: Vec<PointTotals>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn returning(points: PointTotals) -> Self {
        Self::sequence(vec![points])
    }

    pub fn sequence(points: Vec<PointTotals>) -> Self {
        Self {
            points,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn timing_out() -> Self {
        Self::sequence(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointsFetcher for FakeFetcher {
    async fn fetch(&self, _account: ExternalAccountId) -> Result<PointTotals, UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.points
            .get(call)
            .or_else(|| self.points.last())
            .cloned()
            .ok_or_else(|| UpstreamError::new(UpstreamErrorKind::Timeout("roblox")))
    }
}

/// Role store backed by a set, with roles that can be made to fail.
#[derive(Default)]
pub struct MemoryRoleStore {
    held: Mutex<BTreeSet<RoleId>>,
    failing: HashMap<RoleId, RoleStoreErrorKind>,
    attempts: Mutex<Vec<RoleId>>,
    unreadable: bool,
}

impl MemoryRoleStore {
    pub fn holding(roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            held: Mutex::new(roles.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, role: RoleId, kind: RoleStoreErrorKind) -> Self {
        self.failing.insert(role, kind);
        self
    }

    /// Membership reads fail; mutations still work.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    pub fn held(&self) -> BTreeSet<RoleId> {
        self.held.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> Vec<RoleId> {
        self.attempts.lock().unwrap().clone()
    }

    fn check(&self, role: RoleId) -> Result<(), RoleStoreError> {
        self.attempts.lock().unwrap().push(role);
        match self.failing.get(&role) {
            Some(kind) => Err(RoleStoreError::new(kind.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn current_roles(&self, _user: DiscordUserId) -> Result<CurrentRoleSet, RoleStoreError> {
        if self.unreadable {
            return Err(RoleStoreError::new(RoleStoreErrorKind::Unreachable(
                "member lookup failed".into(),
            )));
        }
        Ok(self.held())
    }

    async fn add_role(
        &self,
        _user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        self.check(role)?;
        if self.held.lock().unwrap().insert(role) {
            Ok(MutationOutcome::Applied)
        } else {
            Ok(MutationOutcome::AlreadyPresent)
        }
    }

    async fn remove_role(
        &self,
        _user: DiscordUserId,
        role: RoleId,
    ) -> Result<MutationOutcome, RoleStoreError> {
        self.check(role)?;
        if self.held.lock().unwrap().remove(&role) {
            Ok(MutationOutcome::Applied)
        } else {
            Ok(MutationOutcome::AlreadyAbsent)
        }
    }
}

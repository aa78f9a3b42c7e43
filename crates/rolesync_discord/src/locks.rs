//! Per-user request serialization.

use parking_lot::Mutex;
use rolesync_core::DiscordUserId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// Idle entries are swept once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 256;

/// Keyed async mutex: one lock per Discord user.
///
/// Two `/update` requests from the same member run one after the other;
/// requests from different members never wait on each other.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<DiscordUserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `user`.
    ///
    /// The lock is held until the returned guard is dropped.
    pub async fn lock(&self, user: DiscordUserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            if locks.len() >= PRUNE_THRESHOLD {
                Self::prune_idle(&mut locks);
            }
            Arc::clone(locks.entry(user).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop entries nobody holds or waits on.
    pub fn prune(&self) -> usize {
        Self::prune_idle(&mut self.locks.lock())
    }

    /// Number of users with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Whether no lock entries exist.
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }

    fn prune_idle(locks: &mut HashMap<DiscordUserId, Arc<tokio::sync::Mutex<()>>>) -> usize {
        let before = locks.len();
        // the map's own reference is the only one left for idle users
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let removed = before - locks.len();
        if removed > 0 {
            debug!(removed, remaining = locks.len(), "Pruned idle user locks");
        }
        removed
    }
}

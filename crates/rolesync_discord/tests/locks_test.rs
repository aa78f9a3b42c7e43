//! Tests for per-user request serialization.

mod common;

use common::{
    FixedResolver, SITEOP_BASIC, SITEOP_SENIOR, ScriptedFetcher, SlowStore, catalog,
    update_command,
};
use rolesync_core::{CurrentRoleSet, DiscordUserId, RoleCatalog, RoleId, RoleSync, RoleTier, SyncOutcome};
use rolesync_discord::UpdateCommand;
use rolesync_discord::UserLocks;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

const ALICE: DiscordUserId = DiscordUserId::new(1);
const BOB: DiscordUserId = DiscordUserId::new(2);

#[tokio::test]
async fn test_same_user_waits() {
    let locks = UserLocks::new();
    let _held = locks.lock(ALICE).await;

    let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(ALICE)).await;
    assert!(second.is_err(), "second lock for the same user should block");
}

#[tokio::test]
async fn test_different_users_do_not_wait() {
    let locks = UserLocks::new();
    let _alice = locks.lock(ALICE).await;

    let bob = tokio::time::timeout(Duration::from_millis(50), locks.lock(BOB)).await;
    assert!(bob.is_ok());
}

#[tokio::test]
async fn test_lock_is_released_on_drop() {
    let locks = UserLocks::new();
    drop(locks.lock(ALICE).await);

    let again = tokio::time::timeout(Duration::from_millis(50), locks.lock(ALICE)).await;
    assert!(again.is_ok());
}

#[tokio::test]
async fn test_prune_drops_idle_entries() {
    let locks = UserLocks::new();
    let held = locks.lock(ALICE).await;
    drop(locks.lock(BOB).await);
    assert_eq!(locks.len(), 2);

    assert_eq!(locks.prune(), 1);
    assert_eq!(locks.len(), 1);

    drop(held);
    assert_eq!(locks.prune(), 1);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_overlapping_updates_for_one_user_run_in_turn() {
    let store = Arc::new(SlowStore::with_delay(Duration::from_millis(30)).holding([SITEOP_BASIC]));
    let command = update_command(Some(77), 150, 0, Arc::clone(&store));
    let held: CurrentRoleSet = [SITEOP_BASIC].into_iter().collect();

    let (first, second) = tokio::join!(command.run(ALICE, &held), command.run(ALICE, &held));

    assert!(matches!(first, SyncOutcome::Synced(_)));
    assert!(matches!(second, SyncOutcome::Synced(_)));
    assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);

    let final_roles = store.held.lock().unwrap().clone();
    assert!(final_roles.contains(&SITEOP_SENIOR));
    assert!(!final_roles.contains(&SITEOP_BASIC));
}

#[tokio::test]
async fn test_unlinked_user_changes_nothing() {
    let store = Arc::new(SlowStore::default());
    let command = update_command(None, 150, 150, Arc::clone(&store));

    let outcome = command.run(ALICE, &CurrentRoleSet::new()).await;

    assert_eq!(outcome, SyncOutcome::NotLinked { discord_id: ALICE });
    assert!(store.held.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_queued_update_sees_roles_granted_by_the_first() {
    const SITEOP_LEAD: RoleId = RoleId::new(444);
    let catalog: RoleCatalog = catalog().with_category(
        "siteop",
        vec![
            RoleTier::new(SITEOP_BASIC, 0),
            RoleTier::new(SITEOP_SENIOR, 100),
            RoleTier::new(SITEOP_LEAD, 500),
        ],
    );
    let store = Arc::new(SlowStore::with_delay(Duration::from_millis(20)).holding([SITEOP_BASIC]));
    let engine = RoleSync::new(
        Arc::new(catalog),
        Arc::new(FixedResolver(Some(77))),
        Arc::new(ScriptedFetcher::new(vec![150, 600])),
        store.clone(),
    );
    let command = UpdateCommand::new(Arc::new(engine));
    // both interactions carried the roles held before either ran
    let snapshot: CurrentRoleSet = [SITEOP_BASIC].into_iter().collect();

    let (first, second) = tokio::join!(command.run(ALICE, &snapshot), command.run(ALICE, &snapshot));

    assert!(matches!(first, SyncOutcome::Synced(_)));
    assert!(matches!(second, SyncOutcome::Synced(_)));
    let final_roles = store.held.lock().unwrap().clone();
    assert_eq!(final_roles, [SITEOP_LEAD].into_iter().collect());
}

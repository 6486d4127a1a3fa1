//! Debug domain: unit tests for snapshot save/restore.

use std::sync::Arc;

use super::state::{RestoreError, restore_snapshot, save_snapshot};
use crate::boss::{BossDefinition, BossLifecycle, IntroStage};

#[test]
fn test_save_then_restore() {
    let definition = Arc::new(BossDefinition::default());
    let boss = BossLifecycle::new(Arc::clone(&definition), 1).expect("default boss is valid");
    let json = save_snapshot(&boss).expect("snapshot serializes");

    let restored = restore_snapshot(Some(&json), definition, 1).expect("restore");
    assert_eq!(restored.current_hp(), boss.current_hp());
    assert_eq!(restored.intro_stage(), IntroStage::FightStart);
}

#[test]
fn test_restore_without_snapshot() {
    let definition = Arc::new(BossDefinition::default());
    let result = restore_snapshot(None, definition, 1);
    assert!(matches!(result, Err(RestoreError::NothingSaved)));
}

#[test]
fn test_restore_rejects_bad_json() {
    let definition = Arc::new(BossDefinition::default());
    let result = restore_snapshot(Some("{\"boss_id\": 3"), definition, 1);
    assert!(matches!(result, Err(RestoreError::Json(_))));
}

//! Debug domain: hotkeys for driving a boss fight by hand.

use std::sync::Arc;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arena::{Player, PlayerHealth};
use crate::boss::{
    BossDamaged, BossHealthChanged, BossHealthVisibility, BossLifecycle, BossSeed, StartBossIntro,
};
use crate::debug::state::{DebugState, restore_snapshot, save_snapshot};

/// Damage dealt by one debug hit
const DEBUG_HIT: u32 = 3;
/// Horizontal speed of the debug nudge, in pixels per second
const NUDGE_SPEED: f32 = 260.0;
const NUDGE_JUMP: f32 = 420.0;

/// Handle keyboard shortcuts for debug actions. All of them need Ctrl held.
pub(crate) fn handle_debug_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    boss_query: Query<(Entity, &BossLifecycle)>,
    mut player_query: Query<&mut PlayerHealth, With<Player>>,
    mut intro_events: MessageWriter<StartBossIntro>,
    mut damage_events: MessageWriter<BossDamaged>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Ctrl+B: Trigger the boss intro
    if keyboard.just_pressed(KeyCode::KeyB) {
        for (boss, _) in &boss_query {
            intro_events.write(StartBossIntro { boss });
        }
        debug_state.set_message("Boss intro triggered", 2.0);
    }

    // Ctrl+D: Hit the boss, Ctrl+K: kill it outright
    let hit = if keyboard.just_pressed(KeyCode::KeyK) {
        Some(u32::MAX)
    } else if keyboard.just_pressed(KeyCode::KeyD) {
        Some(DEBUG_HIT)
    } else {
        None
    };
    if let Some(amount) = hit {
        for (boss, lifecycle) in &boss_query {
            damage_events.write(BossDamaged {
                boss,
                amount,
                knockback: None,
            });
            debug_state.set_message(
                format!(
                    "Hit '{}' (was {}/{} HP)",
                    lifecycle.definition().id,
                    lifecycle.current_hp(),
                    lifecycle.max_hp()
                ),
                2.0,
            );
        }
    }

    // Ctrl+H: Full heal the player
    if keyboard.just_pressed(KeyCode::KeyH) {
        for mut health in &mut player_query {
            health.current = health.max;
        }
        debug_state.set_message("Player healed", 2.0);
    }

    // Ctrl+S: Save a boss snapshot
    if keyboard.just_pressed(KeyCode::KeyS) {
        if let Some((_, lifecycle)) = boss_query.iter().next() {
            match save_snapshot(lifecycle) {
                Ok(json) => {
                    debug_state.set_message(format!("Saved snapshot {}", json), 3.0);
                    debug_state.saved_snapshot = Some(json);
                }
                Err(error) => warn!("Could not save boss snapshot: {}", error),
            }
        }
    }
}

/// Ctrl+R: Replace the boss with the saved snapshot.
pub(crate) fn handle_restore_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut boss_query: Query<(
        Entity,
        &mut BossLifecycle,
        &BossSeed,
        &mut RigidBody,
        &mut Visibility,
    )>,
    mut health_events: MessageWriter<BossHealthChanged>,
    mut visibility_events: MessageWriter<BossHealthVisibility>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl || !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }

    let Some((boss, mut lifecycle, seed, mut rigid_body, mut visibility)) =
        boss_query.iter_mut().next()
    else {
        return;
    };

    let definition = Arc::clone(lifecycle.definition());
    match restore_snapshot(debug_state.saved_snapshot.as_deref(), definition, seed.0) {
        Ok(restored) => {
            *lifecycle = restored;
            *rigid_body = RigidBody::Dynamic;
            *visibility = Visibility::Visible;
            visibility_events.write(BossHealthVisibility {
                boss,
                visible: true,
            });
            health_events.write(BossHealthChanged {
                boss,
                current: lifecycle.current_hp(),
                max: lifecycle.max_hp(),
            });
            let message = format!(
                "Restored boss at {}/{} HP, phase {}",
                lifecycle.current_hp(),
                lifecycle.max_hp(),
                lifecycle.current_phase_index()
            );
            debug_state.set_message(message, 3.0);
        }
        Err(error) => warn!("Could not restore boss: {}", error),
    }
}

/// Arrow keys walk the stand-in player; Up hops.
pub(crate) fn nudge_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<&mut LinearVelocity, With<Player>>,
) {
    let mut direction = 0.0;
    if keyboard.pressed(KeyCode::ArrowLeft) {
        direction -= 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        direction += 1.0;
    }
    let hop = keyboard.just_pressed(KeyCode::ArrowUp);

    for mut velocity in &mut player_query {
        if direction != 0.0 {
            velocity.x = direction * NUDGE_SPEED;
        }
        if hop {
            velocity.y = NUDGE_JUMP;
        }
    }
}

pub(crate) fn tick_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    let expired = match debug_state.status_message.as_mut() {
        Some((_, remaining)) => {
            *remaining -= time.delta_secs();
            *remaining <= 0.0
        }
        None => false,
    };
    if expired {
        debug_state.status_message = None;
    }
}

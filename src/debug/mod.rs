//! Debug tooling for driving a boss fight by hand.
//!
//! Hotkeys (Ctrl held):
//! - B: trigger the boss intro
//! - D / K: hit the boss / kill it
//! - H: heal the player
//! - S / R: save / restore a boss snapshot
//!
//! Arrow keys walk the stand-in player.

mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use state::DebugState;

use bevy::prelude::*;

use crate::debug::systems::{
    handle_debug_hotkeys, handle_restore_hotkey, nudge_player, tick_status_message,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                handle_debug_hotkeys,
                handle_restore_hotkey,
                nudge_player,
                tick_status_message,
            ),
        );
    }
}

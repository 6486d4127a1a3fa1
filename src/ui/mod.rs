//! UI domain: boss health bar driven by the boss's HP observer messages.

mod hud_boss;


use bevy::prelude::*;

use crate::ui::hud_boss::{
    cleanup_boss_healthbar, show_boss_healthbar, spawn_boss_healthbar, update_boss_healthbar,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_boss_healthbar,
                show_boss_healthbar,
                update_boss_healthbar,
                cleanup_boss_healthbar,
            )
                .chain(),
        );
    }
}

//! Arena domain: camera, floor, stand-in player and encounter spawning.

mod components;
mod systems;


pub use components::{ArenaSettings, GameLayer, Ground, HitFlash, Player, PlayerHealth};
pub use systems::knockback_velocity;

use bevy::prelude::*;

use crate::arena::systems::{
    apply_player_strikes, auto_start_intro, configure_gravity, fade_hit_flash, setup_camera,
    spawn_arena, spawn_encounter,
};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaSettings>()
            .add_systems(Startup, (setup_camera, configure_gravity, spawn_arena))
            // Content loads during Startup, so the boss waits one stage.
            .add_systems(PostStartup, spawn_encounter)
            .add_systems(
                Update,
                (auto_start_intro, apply_player_strikes, fade_hit_flash),
            );
    }
}

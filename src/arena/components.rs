//! Arena domain: components, physics layers and settings for the test arena.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, walls)
    Ground,
    /// Player character
    Player,
    /// Boss bodies
    Boss,
    /// Boss hitboxes (damage player)
    BossHitbox,
}

/// Stand-in for the player: a position and a damage-receiving contract.
#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug)]
pub struct Ground;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHealth {
    pub current: u32,
    pub max: u32,
}

impl PlayerHealth {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// Red tint left on the player after a hit
#[derive(Component, Debug, Default)]
pub struct HitFlash {
    pub timer: f32,
}

/// Layout of the test arena, in world units.
#[derive(Resource, Debug, Clone)]
pub struct ArenaSettings {
    /// Registry id of the boss to spawn
    pub boss_id: String,
    pub boss_home: Vec2,
    pub player_start: Vec2,
    pub player_size: Vec2,
    pub player_max_hp: u32,
    pub floor_width: f32,
    pub floor_thickness: f32,
    /// Gravity in world units per second squared
    pub gravity: f32,
    /// Seconds after startup before the intro is triggered; `None` waits
    /// for an external trigger
    pub auto_intro_delay: Option<f32>,
    pub boss_seed: u64,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            boss_id: "boss_stone_warden".to_string(),
            boss_home: Vec2::new(6.0, 1.5),
            player_start: Vec2::new(-6.0, 1.0),
            player_size: Vec2::new(1.0, 2.0),
            player_max_hp: 10,
            floor_width: 40.0,
            floor_thickness: 1.0,
            gravity: 20.0,
            auto_intro_delay: Some(1.5),
            boss_seed: 0x5EED,
        }
    }
}

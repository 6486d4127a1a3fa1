//! Boss domain: ECS components and resources for the boss adapter.

use bevy::prelude::*;

use crate::boss::attacks::HitboxId;
use crate::boss::ports::OverlapFacts;

/// Conversion between engine world units and Bevy pixels.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldScale {
    pub pixels_per_unit: f32,
}

impl Default for WorldScale {
    fn default() -> Self {
        Self {
            pixels_per_unit: 32.0,
        }
    }
}

impl WorldScale {
    pub fn to_world(&self, pixels: Vec2) -> Vec2 {
        pixels / self.pixels_per_unit
    }

    pub fn to_pixels(&self, world: Vec2) -> Vec2 {
        world * self.pixels_per_unit
    }
}

/// Whatever boss hitboxes are allowed to strike (the player).
#[derive(Component, Debug, Default)]
pub struct BossTarget;

/// Sensor child carrying one declared hitbox volume.
#[derive(Component, Debug, Clone)]
pub struct BossHitboxVolume {
    pub owner: Entity,
    pub id: HitboxId,
    /// Pixel offset from the boss centre when facing +x
    pub offset: Vec2,
}

/// Hitboxes of this boss currently touching a [`BossTarget`].
///
/// Maintained from collision start/end messages; the lifecycle only acts on
/// the ones it has enabled.
#[derive(Component, Debug, Default)]
pub struct BossOverlaps {
    pub facts: OverlapFacts,
    /// Target entity last seen touching a hitbox
    pub target: Option<Entity>,
}

/// Seed for the boss's decision RNG, kept so snapshots can be restored
/// onto an identical stream.
#[derive(Component, Debug, Clone, Copy)]
pub struct BossSeed(pub u64);

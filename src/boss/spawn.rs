//! Boss domain: spawning an armed boss with its hitbox sensors.

use std::sync::Arc;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arena::GameLayer;
use crate::boss::components::{BossHitboxVolume, BossOverlaps, BossSeed, WorldScale};
use crate::boss::definition::{BossConfigError, BossDefinition};
use crate::boss::lifecycle::BossLifecycle;

const BOSS_COLOR: Color = Color::srgb(0.55, 0.15, 0.2);
const HITBOX_COLOR: Color = Color::srgba(1.0, 0.3, 0.1, 0.35);

/// Spawn a dormant boss at `home` (world units). It stays hidden and inert
/// until a [`StartBossIntro`](crate::boss::StartBossIntro) arrives.
pub fn spawn_boss(
    commands: &mut Commands,
    definition: Arc<BossDefinition>,
    home: Vec2,
    seed: u64,
    scale: &WorldScale,
) -> Result<Entity, BossConfigError> {
    let lifecycle = BossLifecycle::new(Arc::clone(&definition), seed)?;
    let size = scale.to_pixels(definition.body_size);
    let position = scale.to_pixels(home);

    let boss = commands
        .spawn((
            Name::new(definition.name.clone()),
            (lifecycle, BossSeed(seed), BossOverlaps::default()),
            (
                Sprite {
                    color: BOSS_COLOR,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, 0.0),
                Visibility::Hidden,
            ),
            (
                RigidBody::Kinematic,
                Collider::rectangle(size.x, size.y),
                CollisionLayers::new(GameLayer::Boss, [GameLayer::Ground]),
                LinearVelocity::default(),
                LockedAxes::ROTATION_LOCKED,
            ),
        ))
        .id();

    commands.entity(boss).with_children(|parent| {
        for volume in &definition.hitboxes {
            let size = scale.to_pixels(volume.size);
            let offset = scale.to_pixels(volume.offset);
            parent.spawn((
                BossHitboxVolume {
                    owner: boss,
                    id: volume.id.clone(),
                    offset,
                },
                Sprite {
                    color: HITBOX_COLOR,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_xyz(offset.x, offset.y, 0.1),
                Visibility::Hidden,
                Collider::rectangle(size.x, size.y),
                Sensor,
                CollisionEventsEnabled,
                CollisionLayers::new(GameLayer::BossHitbox, [GameLayer::Player]),
            ));
        }
    });

    info!(
        "Spawned boss '{}' with {} phases and {} hitboxes",
        definition.id,
        definition.phases.len(),
        definition.hitboxes.len()
    );
    Ok(boss)
}

//! Arena domain: setup, boss spawning and player damage intake.

use std::sync::Arc;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arena::components::{ArenaSettings, GameLayer, Ground, HitFlash, Player, PlayerHealth};
use crate::boss::{
    BossDefinition, BossLifecycle, BossTarget, PlayerStruck, StartBossIntro, WorldScale,
    spawn_boss,
};
use crate::content::BossRegistry;

/// Maximum velocity the player can have after knockback
const MAX_KNOCKBACK_VELOCITY: f32 = 800.0;
/// Minimum upward knockback to give a small lift
const MIN_VERTICAL_KNOCKBACK: f32 = 100.0;
const HIT_FLASH_SECONDS: f32 = 0.2;

const PLAYER_COLOR: Color = Color::srgb(0.3, 0.6, 0.9);
const HIT_COLOR: Color = Color::srgb(1.0, 0.5, 0.5);

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub(crate) fn configure_gravity(
    settings: Res<ArenaSettings>,
    scale: Res<WorldScale>,
    mut gravity: ResMut<Gravity>,
) {
    gravity.0 = Vec2::NEG_Y * settings.gravity * scale.pixels_per_unit;
}

pub(crate) fn spawn_arena(
    mut commands: Commands,
    settings: Res<ArenaSettings>,
    scale: Res<WorldScale>,
) {
    let floor_size = scale.to_pixels(Vec2::new(settings.floor_width, settings.floor_thickness));
    let floor_center = scale.to_pixels(Vec2::new(0.0, -settings.floor_thickness / 2.0));

    commands.spawn((
        Ground,
        Sprite {
            color: Color::srgb(0.25, 0.22, 0.2),
            custom_size: Some(floor_size),
            ..default()
        },
        Transform::from_xyz(floor_center.x, floor_center.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(floor_size.x, floor_size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player, GameLayer::Boss]),
    ));

    let size = scale.to_pixels(settings.player_size);
    let start = scale.to_pixels(settings.player_start);
    commands.spawn((
        Name::new("Player"),
        (
            Player,
            BossTarget,
            PlayerHealth::new(settings.player_max_hp),
            HitFlash::default(),
        ),
        (
            Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(start.x, start.y, 0.0),
        ),
        (
            RigidBody::Dynamic,
            Collider::rectangle(size.x, size.y),
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::BossHitbox]),
            LinearVelocity::default(),
            LinearDamping(3.0),
            LockedAxes::ROTATION_LOCKED,
        ),
    ));
}

/// Spawn the configured boss, falling back to a default definition when the
/// registry does not know it.
pub(crate) fn spawn_encounter(
    mut commands: Commands,
    settings: Res<ArenaSettings>,
    scale: Res<WorldScale>,
    registry: Option<Res<BossRegistry>>,
) {
    let definition = registry
        .as_ref()
        .and_then(|r| r.get(&settings.boss_id).cloned())
        .unwrap_or_else(|| {
            warn!(
                "Boss '{}' not in registry, using default definition",
                settings.boss_id
            );
            Arc::new(BossDefinition::default())
        });

    if let Err(error) = spawn_boss(
        &mut commands,
        definition,
        settings.boss_home,
        settings.boss_seed,
        &scale,
    ) {
        error!("Could not spawn boss: {}", error);
    }
}

/// Trigger the intro once the configured delay has passed.
pub(crate) fn auto_start_intro(
    time: Res<Time>,
    settings: Res<ArenaSettings>,
    mut elapsed: Local<f32>,
    mut sent: Local<bool>,
    boss_query: Query<Entity, With<BossLifecycle>>,
    mut intro_events: MessageWriter<StartBossIntro>,
) {
    let Some(delay) = settings.auto_intro_delay else {
        return;
    };
    if *sent {
        return;
    }

    *elapsed += time.delta_secs();
    if *elapsed < delay {
        return;
    }

    for boss in &boss_query {
        intro_events.write(StartBossIntro { boss });
    }
    *sent = true;
}

/// Knockback layered onto the current velocity, with a small lift and a speed cap.
pub fn knockback_velocity(current: Vec2, knockback: Vec2) -> Vec2 {
    let velocity = Vec2::new(
        current.x + knockback.x,
        current.y + knockback.y.max(MIN_VERTICAL_KNOCKBACK),
    );
    velocity.clamp_length_max(MAX_KNOCKBACK_VELOCITY)
}

pub(crate) fn apply_player_strikes(
    mut struck_events: MessageReader<PlayerStruck>,
    mut player_query: Query<
        (&mut PlayerHealth, &mut LinearVelocity, &mut HitFlash, &mut Sprite),
        With<Player>,
    >,
) {
    for event in struck_events.read() {
        let Ok((mut health, mut velocity, mut flash, mut sprite)) =
            player_query.get_mut(event.target)
        else {
            continue;
        };
        if health.is_dead() {
            continue;
        }

        let applied = health.take_damage(event.amount);
        velocity.0 = knockback_velocity(velocity.0, event.knockback);
        flash.timer = HIT_FLASH_SECONDS;
        sprite.color = HIT_COLOR;

        debug!(
            "Player took {} from boss {:?}: {}/{} HP, velocity {:?}",
            applied, event.boss, health.current, health.max, velocity.0
        );
        if health.is_dead() {
            info!("Player defeated");
        }
    }
}

pub(crate) fn fade_hit_flash(
    time: Res<Time>,
    mut player_query: Query<(&mut HitFlash, &mut Sprite), With<Player>>,
) {
    for (mut flash, mut sprite) in &mut player_query {
        if flash.timer <= 0.0 {
            continue;
        }
        flash.timer -= time.delta_secs();
        if flash.timer <= 0.0 {
            sprite.color = PLAYER_COLOR;
        }
    }
}

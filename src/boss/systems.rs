//! Boss domain: ECS adapters and systems driving [`BossLifecycle`].

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::boss::components::{BossHitboxVolume, BossOverlaps, BossTarget, WorldScale};
use crate::boss::events::{
    BossCueEvent, BossDamaged, BossDefeated, BossHealthChanged, BossHealthVisibility,
    BossPhaseChanged, BossSoundEvent, PlayerStruck, StartBossIntro,
};
use crate::boss::lifecycle::BossLifecycle;
use crate::boss::ports::{
    BossBody, BossPorts, Cue, CueSink, DamageTarget, HealthObserver, TickInput,
};

/// Avian body seen through engine units.
struct PhysicsBody<'a> {
    transform: &'a mut Transform,
    velocity: &'a mut LinearVelocity,
    rigid_body: &'a mut RigidBody,
    scale: WorldScale,
}

impl BossBody for PhysicsBody<'_> {
    fn position(&self) -> Vec2 {
        self.scale.to_world(self.transform.translation.truncate())
    }

    fn velocity(&self) -> Vec2 {
        self.scale.to_world(self.velocity.0)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity.0 = self.scale.to_pixels(velocity);
    }

    fn teleport(&mut self, position: Vec2) {
        let pixels = self.scale.to_pixels(position);
        self.transform.translation.x = pixels.x;
        self.transform.translation.y = pixels.y;
    }

    fn set_simulated(&mut self, simulated: bool) {
        // Kinematic bodies ignore gravity and contacts but still follow velocity.
        *self.rigid_body = if simulated {
            RigidBody::Dynamic
        } else {
            RigidBody::Kinematic
        };
    }
}

/// Every message a boss writes while ticking or taking damage.
#[derive(SystemParam)]
pub(crate) struct BossOutputs<'w> {
    cues: MessageWriter<'w, BossCueEvent>,
    sounds: MessageWriter<'w, BossSoundEvent>,
    health: MessageWriter<'w, BossHealthChanged>,
    visibility: MessageWriter<'w, BossHealthVisibility>,
}

impl<'w> BossOutputs<'w> {
    fn channels(&mut self, boss: Entity) -> (MessageCues<'_, 'w>, MessageHealth<'_, 'w>) {
        (
            MessageCues {
                boss,
                cues: &mut self.cues,
                sounds: &mut self.sounds,
            },
            MessageHealth {
                boss,
                changed: &mut self.health,
                visibility: &mut self.visibility,
            },
        )
    }
}

struct MessageCues<'a, 'w> {
    boss: Entity,
    cues: &'a mut MessageWriter<'w, BossCueEvent>,
    sounds: &'a mut MessageWriter<'w, BossSoundEvent>,
}

impl CueSink for MessageCues<'_, '_> {
    fn play(&mut self, cue: Cue) {
        self.cues.write(BossCueEvent {
            boss: self.boss,
            cue,
        });
    }

    fn play_sound(&mut self, sound: &str) {
        self.sounds.write(BossSoundEvent {
            boss: self.boss,
            sound: sound.to_string(),
        });
    }
}

struct MessageHealth<'a, 'w> {
    boss: Entity,
    changed: &'a mut MessageWriter<'w, BossHealthChanged>,
    visibility: &'a mut MessageWriter<'w, BossHealthVisibility>,
}

impl HealthObserver for MessageHealth<'_, '_> {
    fn health_changed(&mut self, current: u32, max: u32) {
        self.changed.write(BossHealthChanged {
            boss: self.boss,
            current,
            max,
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visibility.write(BossHealthVisibility {
            boss: self.boss,
            visible,
        });
    }
}

/// Turns strikes into [`PlayerStruck`] messages, converting knockback to pixels.
struct StrikeRelay<'a, 'w> {
    boss: Entity,
    target: Option<Entity>,
    scale: WorldScale,
    writer: &'a mut MessageWriter<'w, PlayerStruck>,
}

impl DamageTarget for StrikeRelay<'_, '_> {
    fn take_damage(&mut self, amount: u32, knockback: Vec2) {
        let Some(target) = self.target else {
            return;
        };
        self.writer.write(PlayerStruck {
            boss: self.boss,
            target,
            amount,
            knockback: self.scale.to_pixels(knockback),
        });
    }
}

type BossBodyQuery<'a> = (
    Entity,
    &'a mut BossLifecycle,
    &'a mut Transform,
    &'a mut LinearVelocity,
    &'a mut RigidBody,
);

fn nearest_target(
    boss_position: Vec2,
    targets: &Query<(Entity, &Transform), (With<BossTarget>, Without<BossLifecycle>)>,
) -> Option<(Entity, Vec2)> {
    targets
        .iter()
        .map(|(entity, transform)| (entity, transform.translation.truncate()))
        .min_by(|(_, a), (_, b)| {
            a.distance_squared(boss_position)
                .total_cmp(&b.distance_squared(boss_position))
        })
}

/// Keep each boss's overlap facts in step with avian's collision messages.
pub(crate) fn track_hitbox_overlaps(
    mut collision_starts: MessageReader<CollisionStart>,
    mut collision_ends: MessageReader<CollisionEnd>,
    volume_query: Query<&BossHitboxVolume>,
    target_query: Query<(), With<BossTarget>>,
    mut boss_query: Query<&mut BossOverlaps>,
) {
    let resolve = |a: Entity, b: Entity| {
        [(a, b), (b, a)].into_iter().find_map(|(volume, target)| {
            let volume = volume_query.get(volume).ok()?;
            target_query.get(target).ok()?;
            Some((volume.owner, volume.id.clone(), target))
        })
    };

    for event in collision_starts.read() {
        let Some((owner, id, target)) = resolve(event.collider1, event.collider2) else {
            continue;
        };
        if let Ok(mut overlaps) = boss_query.get_mut(owner) {
            overlaps.facts.insert(id);
            overlaps.target = Some(target);
        }
    }

    for event in collision_ends.read() {
        let Some((owner, id, _)) = resolve(event.collider1, event.collider2) else {
            continue;
        };
        if let Ok(mut overlaps) = boss_query.get_mut(owner) {
            overlaps.facts.remove(&id);
        }
    }
}

pub(crate) fn start_boss_intros(
    mut requests: MessageReader<StartBossIntro>,
    scale: Res<WorldScale>,
    target_query: Query<(Entity, &Transform), (With<BossTarget>, Without<BossLifecycle>)>,
    mut boss_query: Query<(BossBodyQuery<'_>, &mut Visibility)>,
    mut outputs: BossOutputs,
) {
    for request in requests.read() {
        let Ok((
            (entity, mut lifecycle, mut transform, mut velocity, mut rigid_body),
            mut visibility,
        )) = boss_query.get_mut(request.boss)
        else {
            warn!("StartBossIntro for {:?}, which is not a boss", request.boss);
            continue;
        };

        let boss_position = transform.translation.truncate();
        let target_position = nearest_target(boss_position, &target_query)
            .map(|(_, position)| scale.to_world(position));

        let (mut cues, mut health) = outputs.channels(entity);
        let mut body = PhysicsBody {
            transform: &mut *transform,
            velocity: &mut *velocity,
            rigid_body: &mut *rigid_body,
            scale: *scale,
        };
        let mut ports = BossPorts {
            body: &mut body,
            cues: &mut cues,
            health: &mut health,
        };

        if lifecycle.start_intro(target_position, &mut ports) {
            *visibility = Visibility::Visible;
        } else {
            debug!(
                "Boss '{}' ignored intro request in {:?}",
                lifecycle.definition().id,
                lifecycle.intro_stage()
            );
        }
    }
}

/// Damage intake from the player side.
pub(crate) fn apply_boss_damage(
    mut damage_events: MessageReader<BossDamaged>,
    scale: Res<WorldScale>,
    mut boss_query: Query<BossBodyQuery<'_>>,
    mut outputs: BossOutputs,
) {
    for event in damage_events.read() {
        let Ok((entity, mut lifecycle, mut transform, mut velocity, mut rigid_body)) =
            boss_query.get_mut(event.boss)
        else {
            continue;
        };

        let (mut cues, mut health) = outputs.channels(entity);
        let mut body = PhysicsBody {
            transform: &mut *transform,
            velocity: &mut *velocity,
            rigid_body: &mut *rigid_body,
            scale: *scale,
        };
        let mut ports = BossPorts {
            body: &mut body,
            cues: &mut cues,
            health: &mut health,
        };

        let knockback = event.knockback.map(|k| scale.to_world(k));
        let applied = lifecycle.take_damage(event.amount, knockback, &mut ports);
        if applied > 0 {
            debug!(
                "Boss '{}' took {} damage ({}/{})",
                lifecycle.definition().id,
                applied,
                lifecycle.current_hp(),
                lifecycle.max_hp()
            );
        }
    }
}

pub(crate) fn tick_bosses(
    time: Res<Time>,
    scale: Res<WorldScale>,
    target_query: Query<(Entity, &Transform), (With<BossTarget>, Without<BossLifecycle>)>,
    mut boss_query: Query<(BossBodyQuery<'_>, &BossOverlaps)>,
    mut outputs: BossOutputs,
    mut struck_events: MessageWriter<PlayerStruck>,
    mut phase_events: MessageWriter<BossPhaseChanged>,
) {
    let dt = time.delta_secs();

    for ((entity, mut lifecycle, mut transform, mut velocity, mut rigid_body), overlaps) in
        &mut boss_query
    {
        if lifecycle.is_dead() {
            continue;
        }

        let boss_position = transform.translation.truncate();
        let nearest = nearest_target(boss_position, &target_query);
        let target_position = scale.to_world(nearest.map_or(boss_position, |(_, p)| p));
        let phase_before = lifecycle.current_phase_index();

        let mut target = StrikeRelay {
            boss: entity,
            target: overlaps.target.or(nearest.map(|(e, _)| e)),
            scale: *scale,
            writer: &mut struck_events,
        };
        let (mut cues, mut health) = outputs.channels(entity);
        let mut body = PhysicsBody {
            transform: &mut *transform,
            velocity: &mut *velocity,
            rigid_body: &mut *rigid_body,
            scale: *scale,
        };
        let mut ports = BossPorts {
            body: &mut body,
            cues: &mut cues,
            health: &mut health,
        };

        lifecycle.tick(
            TickInput {
                dt,
                target_position,
                overlaps: &overlaps.facts,
                target: &mut target,
            },
            &mut ports,
        );

        let phase_after = lifecycle.current_phase_index();
        if phase_after != phase_before {
            phase_events.write(BossPhaseChanged {
                boss: entity,
                phase: phase_after,
            });
        }
    }
}

/// Mirror hitbox sensors with facing and show the ones that are live.
pub(crate) fn sync_hitbox_volumes(
    boss_query: Query<&BossLifecycle>,
    mut volume_query: Query<(&BossHitboxVolume, &mut Transform, &mut Visibility)>,
) {
    for (volume, mut transform, mut visibility) in &mut volume_query {
        let Ok(lifecycle) = boss_query.get(volume.owner) else {
            continue;
        };
        transform.translation.x = volume.offset.x * lifecycle.facing_sign();
        transform.translation.y = volume.offset.y;
        *visibility = if lifecycle.hitboxes().is_enabled(&volume.id) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

pub(crate) fn sync_boss_facing(mut boss_query: Query<(&BossLifecycle, &mut Sprite)>) {
    for (lifecycle, mut sprite) in &mut boss_query {
        sprite.flip_x = lifecycle.facing_sign() < 0.0;
    }
}

/// Log cues and turn the death beat into [`BossDefeated`].
pub(crate) fn relay_boss_cues(
    mut cue_events: MessageReader<BossCueEvent>,
    mut sound_events: MessageReader<BossSoundEvent>,
    mut defeated_events: MessageWriter<BossDefeated>,
) {
    for event in cue_events.read() {
        debug!("Boss {:?} cue {}", event.boss, event.cue.name());
        if event.cue == Cue::Die {
            defeated_events.write(BossDefeated { boss: event.boss });
        }
    }
    for event in sound_events.read() {
        debug!("Boss {:?} sound '{}'", event.boss, event.sound);
    }
}

pub(crate) fn announce_boss_outcomes(
    mut phase_events: MessageReader<BossPhaseChanged>,
    mut defeated_events: MessageReader<BossDefeated>,
    boss_query: Query<&BossLifecycle>,
) {
    for event in phase_events.read() {
        if let Ok(lifecycle) = boss_query.get(event.boss) {
            let name = lifecycle
                .current_phase()
                .map_or("?", |phase| phase.name.as_str());
            info!(
                "Boss '{}' advanced to phase {} '{}'",
                lifecycle.definition().name,
                event.phase,
                name
            );
        }
    }
    for event in defeated_events.read() {
        if let Ok(lifecycle) = boss_query.get(event.boss) {
            info!("Boss '{}' defeated", lifecycle.definition().name);
        }
    }
}

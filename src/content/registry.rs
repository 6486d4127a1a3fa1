//! BossRegistry resource providing lookups for loaded boss definitions.

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::data::*;
use crate::boss::{
    AttackDefinition, BossDefinition, DecisionTuning, HitboxId, HitboxVolume, IntroTuning,
    PhaseDefinition,
};

/// Every boss kind loaded at startup, shared behind `Arc` so spawned bosses
/// never copy attack tables.
#[derive(Resource, Default)]
pub struct BossRegistry {
    pub bosses: HashMap<String, Arc<BossDefinition>>,
}

impl BossRegistry {
    pub fn from_defs(defs: &[BossDef]) -> Self {
        let bosses = defs
            .iter()
            .map(|def| (def.id.clone(), Arc::new(build_definition(def))))
            .collect();
        Self { bosses }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<BossDefinition>> {
        self.bosses.get(id)
    }

    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        let mut ids: Vec<&str> = self.bosses.keys().map(String::as_str).collect();
        ids.sort_unstable();
        format!("BossRegistry loaded {} bosses: {}", ids.len(), ids.join(", "))
    }
}

fn vec2((x, y): (f32, f32)) -> Vec2 {
    Vec2::new(x, y)
}

/// Convert a content definition into the engine's form.
///
/// Unresolvable attack references are dropped here; `validate_bosses` is
/// where they get reported.
pub fn build_definition(def: &BossDef) -> BossDefinition {
    let fallback = BossDefinition::default();

    let attacks: HashMap<&str, Arc<AttackDefinition>> = def
        .attacks
        .iter()
        .map(|a| {
            let attack = AttackDefinition {
                id: a.id.clone(),
                windup_seconds: a.windup_seconds.max(0.0),
                active_seconds: a.active_seconds.max(0.0),
                recovery_seconds: a.recovery_seconds.max(0.0),
                damage: a.damage,
                hitbox: HitboxId::new(a.hitbox.clone()),
                movement_impulse: vec2(a.movement_impulse),
                preferred_range: a.preferred_range.max(0.0),
                lock_facing: a.lock_facing,
                knockback: a.knockback,
                windup_sound: a.windup_sound.clone(),
                end_active_on_hit: a.end_active_on_hit,
            };
            (a.id.as_str(), Arc::new(attack))
        })
        .collect();

    let phases = def
        .phases
        .iter()
        .map(|p| {
            if p.enter_at_hp_percent > 100 {
                warn!(
                    "Boss '{}' phase '{}' threshold {} clamped to 100",
                    def.id, p.name, p.enter_at_hp_percent
                );
            }
            PhaseDefinition {
                name: p.name.clone(),
                attacks: p
                    .attacks
                    .iter()
                    .filter_map(|id| attacks.get(id.as_str()).cloned())
                    .collect(),
                enter_at_hp_percent: p.enter_at_hp_percent.min(100),
                move_speed: p.move_speed,
                min_decision_gap: p.min_decision_gap,
                max_decision_gap: p.max_decision_gap,
            }
        })
        .collect();

    let hitboxes = def
        .hitboxes
        .iter()
        .map(|h| HitboxVolume {
            id: HitboxId::new(h.id.clone()),
            size: vec2(h.size),
            offset: vec2(h.offset),
        })
        .collect();

    BossDefinition {
        id: def.id.clone(),
        name: def.name.clone(),
        max_hp: def.max_hp,
        phases,
        hitboxes,
        intro: def.intro.as_ref().map(build_intro),
        decision: build_decision(&def.decision),
        stagger_seconds: def.stagger_seconds.unwrap_or(fallback.stagger_seconds),
        knockback: def.knockback.unwrap_or(fallback.knockback),
        body_size: vec2(def.body_size),
    }
}

fn build_intro(def: &IntroDef) -> IntroTuning {
    let base = IntroTuning::default();
    IntroTuning {
        spawn_point: def.spawn_point.map(vec2),
        spawn_offset: def.spawn_offset.map_or(base.spawn_offset, vec2),
        landing_point: def.landing_point.map(vec2),
        fall_speed: def.fall_speed.unwrap_or(base.fall_speed),
        landing_timeout: def.landing_timeout.unwrap_or(base.landing_timeout),
        scream_delay: def.scream_delay.unwrap_or(base.scream_delay),
        scream_seconds: def.scream_seconds,
        scream_sound: def.scream_sound.clone(),
        hp_fill_seconds: def.hp_fill_seconds.unwrap_or(base.hp_fill_seconds),
        ..base
    }
}

fn build_decision(def: &DecisionDef) -> DecisionTuning {
    let base = DecisionTuning::default();
    DecisionTuning {
        range_band: def.range_band.unwrap_or(base.range_band),
        step_back_distance: def.step_back_distance.unwrap_or(base.step_back_distance),
        step_back_direction: def.step_back_direction.unwrap_or(base.step_back_direction),
        arrive_threshold: def.arrive_threshold.unwrap_or(base.arrive_threshold),
    }
}

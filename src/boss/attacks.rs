//! Boss domain: immutable attack and phase definitions.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Opaque handle naming one damage-dealing volume on a boss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HitboxId(pub String);

impl HitboxId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HitboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One attack's timing, damage and positioning data.
///
/// Definitions are loaded once and shared behind an `Arc` by every attack
/// instance that runs them; nothing mutates them after load.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackDefinition {
    pub id: String,
    pub windup_seconds: f32,
    pub active_seconds: f32,
    pub recovery_seconds: f32,
    pub damage: u32,
    pub hitbox: HitboxId,
    /// Velocity change applied when the hit window opens. `x` is mirrored by facing.
    pub movement_impulse: Vec2,
    /// Horizontal distance the boss tries to keep from the target before striking
    pub preferred_range: f32,
    pub lock_facing: bool,
    /// Knockback magnitude on strike; `None` uses the boss default
    pub knockback: Option<f32>,
    pub windup_sound: Option<String>,
    /// Close the hit window as soon as a strike lands instead of waiting out the timer
    pub end_active_on_hit: bool,
}

impl AttackDefinition {
    /// Windup + active + recovery, in seconds.
    #[cfg(test)]
    pub fn total_seconds(&self) -> f32 {
        self.windup_seconds + self.active_seconds + self.recovery_seconds
    }
}

impl Default for AttackDefinition {
    fn default() -> Self {
        Self {
            id: "basic_swing".to_string(),
            windup_seconds: 0.4,
            active_seconds: 0.25,
            recovery_seconds: 0.7,
            damage: 1,
            hitbox: HitboxId::new("melee"),
            movement_impulse: Vec2::ZERO,
            preferred_range: 2.0,
            lock_facing: true,
            knockback: None,
            windup_sound: None,
            end_active_on_hit: false,
        }
    }
}

/// Attacks plus movement tuning active below an HP threshold.
#[derive(Debug, Clone)]
pub struct PhaseDefinition {
    pub name: String,
    pub attacks: Vec<Arc<AttackDefinition>>,
    /// Phase becomes eligible once HP% drops to this value or below
    pub enter_at_hp_percent: u8,
    pub move_speed: f32,
    pub min_decision_gap: f32,
    pub max_decision_gap: f32,
}

impl PhaseDefinition {
    /// Gap bounds ordered low→high, tolerating reversed config.
    pub fn decision_gap_bounds(&self) -> (f32, f32) {
        let lo = self.min_decision_gap.max(0.0);
        let hi = self.max_decision_gap.max(0.0);
        if lo <= hi { (lo, hi) } else { (hi, lo) }
    }
}

impl Default for PhaseDefinition {
    fn default() -> Self {
        Self {
            name: "Opening".to_string(),
            attacks: vec![Arc::new(AttackDefinition::default())],
            enter_at_hp_percent: 100,
            move_speed: 4.0,
            min_decision_gap: 0.4,
            max_decision_gap: 0.9,
        }
    }
}

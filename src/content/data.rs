//! Data definitions for boss content files.
//!
//! These structs mirror the structure in assets/data/bosses.ron and are used
//! for deserialization. The BossRegistry turns them into engine definitions.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boss::StepBackDirection;

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Bosses (bosses.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct BossDef {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    #[serde(default = "default_body_size")]
    pub body_size: (f32, f32),
    /// Strike knockback for attacks without their own
    pub knockback: Option<f32>,
    pub stagger_seconds: Option<f32>,
    pub hitboxes: Vec<HitboxDef>,
    pub attacks: Vec<AttackDef>,
    /// Ordered by `enter_at_hp_percent`, highest first
    pub phases: Vec<PhaseDef>,
    /// Omit to arm the boss without an intro
    pub intro: Option<IntroDef>,
    #[serde(default)]
    pub decision: DecisionDef,
}

fn default_body_size() -> (f32, f32) {
    (2.0, 3.0)
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct HitboxDef {
    pub id: String,
    pub size: (f32, f32),
    #[serde(default)]
    pub offset: (f32, f32),
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct AttackDef {
    pub id: String,
    pub windup_seconds: f32,
    pub active_seconds: f32,
    pub recovery_seconds: f32,
    pub damage: u32,
    pub hitbox: String,
    #[serde(default)]
    pub movement_impulse: (f32, f32),
    #[serde(default)]
    pub preferred_range: f32,
    #[serde(default)]
    pub lock_facing: bool,
    pub knockback: Option<f32>,
    pub windup_sound: Option<String>,
    #[serde(default)]
    pub end_active_on_hit: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Reflect)]
pub struct PhaseDef {
    pub name: String,
    pub enter_at_hp_percent: u8,
    /// Attack ids from the same boss
    pub attacks: Vec<String>,
    pub move_speed: f32,
    pub min_decision_gap: f32,
    pub max_decision_gap: f32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Reflect)]
pub struct IntroDef {
    pub spawn_point: Option<(f32, f32)>,
    pub spawn_offset: Option<(f32, f32)>,
    pub landing_point: Option<(f32, f32)>,
    pub fall_speed: Option<f32>,
    pub landing_timeout: Option<f32>,
    pub scream_delay: Option<f32>,
    pub scream_seconds: Option<f32>,
    pub scream_sound: Option<String>,
    pub hp_fill_seconds: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Reflect)]
pub struct DecisionDef {
    pub range_band: Option<f32>,
    pub step_back_distance: Option<f32>,
    pub step_back_direction: Option<StepBackDirection>,
    pub arrive_threshold: Option<f32>,
}

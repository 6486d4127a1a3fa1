//! Boss domain: runtime state owned by the lifecycle.

use serde::{Deserialize, Serialize};

use crate::boss::intro::IntroStage;

/// Which way the boss faces, and whether an attack has pinned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facing {
    sign: f32,
    locked: bool,
}

impl Default for Facing {
    fn default() -> Self {
        Self {
            sign: 1.0,
            locked: false,
        }
    }
}

impl Facing {
    pub fn sign(&self) -> f32 {
        self.sign
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Keeps whatever sign the boss had when the lock was taken.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Turn toward a horizontal offset. Ignored while locked or when `dx` is 0.
    pub fn face_toward(&mut self, dx: f32) {
        if self.locked || dx == 0.0 {
            return;
        }
        self.sign = dx.signum();
    }
}

/// Mutable per-encounter state. Only `BossLifecycle` and the sub-machines it
/// owns write to this.
#[derive(Debug, Clone)]
pub struct BossRuntimeState {
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_phase_index: usize,
    pub busy: bool,
    pub phase_transitioning: bool,
    pub facing: Facing,
    pub dead: bool,
    pub intro: IntroStage,
    /// Movement speed from the most recently applied phase
    pub move_speed: f32,
}

impl BossRuntimeState {
    pub fn new(max_hp: u32, move_speed: f32) -> Self {
        Self {
            current_hp: max_hp,
            max_hp,
            current_phase_index: 0,
            busy: false,
            phase_transitioning: false,
            facing: Facing::default(),
            dead: false,
            intro: IntroStage::Idle,
            move_speed,
        }
    }

    pub fn intro_complete(&self) -> bool {
        self.intro == IntroStage::FightStart
    }

    /// Whole-number HP percentage, rounded to nearest.
    pub fn hp_percent(&self) -> u32 {
        hp_percent(self.current_hp, self.max_hp)
    }
}

pub fn hp_percent(current: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    (current as f64 / max as f64 * 100.0).round() as u32
}

/// Save-state view of a boss: enough to resume phase decisions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BossSnapshot {
    pub boss_id: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_phase_index: usize,
    pub dead: bool,
}

impl BossSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

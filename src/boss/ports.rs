//! Boss domain: collaborator contracts the engine is driven through.
//!
//! The engine never reaches for global state. Physics body access, cue
//! output, HP display and the struck target are all handed in by the caller
//! on each call, so the same state machines run under the ECS adapter and
//! under plain test fakes.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::boss::attacks::HitboxId;

/// Fire-and-forget animation/audio beats emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Windup,
    Attack,
    Recover,
    PhaseShift,
    Die,
    JumpDown,
    Scream,
    FightStart,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Windup => "Windup",
            Cue::Attack => "Attack",
            Cue::Recover => "Recover",
            Cue::PhaseShift => "PhaseShift",
            Cue::Die => "Die",
            Cue::JumpDown => "JumpDown",
            Cue::Scream => "Scream",
            Cue::FightStart => "FightStart",
        }
    }
}

/// Physics body the boss moves through. Units are world units.
pub trait BossBody {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn teleport(&mut self, position: Vec2);
    /// Toggle whether the physics step integrates this body.
    fn set_simulated(&mut self, simulated: bool);
}

/// Receives animation and audio cues. No acknowledgement is expected.
pub trait CueSink {
    fn play(&mut self, cue: Cue);

    fn play_sound(&mut self, _sound: &str) {}
}

/// Optional HP readout (health bar, boss name plate).
pub trait HealthObserver {
    fn health_changed(&mut self, current: u32, max: u32);

    fn set_visible(&mut self, _visible: bool) {}
}

/// Damage-intake contract implemented by whatever the boss hits.
pub trait DamageTarget {
    fn take_damage(&mut self, amount: u32, knockback: Vec2);
}

/// Observer that ignores everything, for bosses without a health bar.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHealthDisplay;

impl HealthObserver for NoHealthDisplay {
    fn health_changed(&mut self, _current: u32, _max: u32) {}
}

/// Hitboxes overlapping the target this tick, as reported by collision.
#[derive(Debug, Default, Clone)]
pub struct OverlapFacts {
    overlapping: HashSet<HitboxId>,
}

impl OverlapFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: HitboxId) {
        self.overlapping.insert(id);
    }

    pub fn remove(&mut self, id: &HitboxId) {
        self.overlapping.remove(id);
    }

    pub fn contains(&self, id: &HitboxId) -> bool {
        self.overlapping.contains(id)
    }
}

impl FromIterator<HitboxId> for OverlapFacts {
    fn from_iter<I: IntoIterator<Item = HitboxId>>(iter: I) -> Self {
        Self {
            overlapping: iter.into_iter().collect(),
        }
    }
}

/// Side-effect channels shared by ticking and damage intake.
pub struct BossPorts<'a> {
    pub body: &'a mut dyn BossBody,
    pub cues: &'a mut dyn CueSink,
    pub health: &'a mut dyn HealthObserver,
}

/// Per-tick inputs sampled from the world.
pub struct TickInput<'a> {
    pub dt: f32,
    pub target_position: Vec2,
    pub overlaps: &'a OverlapFacts,
    pub target: &'a mut dyn DamageTarget,
}

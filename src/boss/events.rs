//! Boss domain: messages between the boss adapter and the rest of the game.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::boss::ports::Cue;

/// External trigger for a boss's intro sequence
#[derive(Debug)]
pub struct StartBossIntro {
    pub boss: Entity,
}

impl Message for StartBossIntro {}

/// Damage dealt to a boss by the player side
#[derive(Debug)]
pub struct BossDamaged {
    pub boss: Entity,
    pub amount: u32,
    pub knockback: Option<Vec2>,
}

impl Message for BossDamaged {}

/// Animation beat emitted by a boss
#[derive(Debug, Clone, Copy)]
pub struct BossCueEvent {
    pub boss: Entity,
    pub cue: Cue,
}

impl Message for BossCueEvent {}

/// Named audio cue requested alongside an animation beat
#[derive(Debug, Clone)]
pub struct BossSoundEvent {
    pub boss: Entity,
    pub sound: String,
}

impl Message for BossSoundEvent {}

#[derive(Debug, Clone, Copy)]
pub struct BossHealthChanged {
    pub boss: Entity,
    pub current: u32,
    pub max: u32,
}

impl Message for BossHealthChanged {}

#[derive(Debug, Clone, Copy)]
pub struct BossHealthVisibility {
    pub boss: Entity,
    pub visible: bool,
}

impl Message for BossHealthVisibility {}

/// A boss hitbox landed on the player
#[derive(Debug, Clone, Copy)]
pub struct PlayerStruck {
    pub boss: Entity,
    pub target: Entity,
    pub amount: u32,
    /// Pixels per second, ready to add to the target's `LinearVelocity`
    pub knockback: Vec2,
}

impl Message for PlayerStruck {}

#[derive(Debug, Clone, Copy)]
pub struct BossPhaseChanged {
    pub boss: Entity,
    pub phase: usize,
}

impl Message for BossPhaseChanged {}

#[derive(Debug, Clone, Copy)]
pub struct BossDefeated {
    pub boss: Entity,
}

impl Message for BossDefeated {}

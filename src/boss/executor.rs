//! Boss domain: windup → active → recovery state machine for one attack.

use std::sync::Arc;

use bevy::prelude::*;

use crate::boss::attacks::AttackDefinition;
use crate::boss::hitbox::HitboxController;
use crate::boss::ports::{BossBody, Cue, CueSink};
use crate::boss::state::Facing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackStage {
    #[default]
    Windup,
    /// Hitbox enabled
    Active,
    Recovery,
    Done,
}

/// What an attack instance may touch while it runs.
pub struct AttackEnv<'a> {
    pub body: &'a mut dyn BossBody,
    pub cues: &'a mut dyn CueSink,
    pub hitboxes: &'a mut HitboxController,
    pub facing: &'a mut Facing,
    /// Knockback used when the attack does not set its own
    pub default_knockback: f32,
}

/// One running instance of an [`AttackDefinition`].
#[derive(Debug, Clone)]
pub struct AttackExecutor {
    attack: Arc<AttackDefinition>,
    stage: AttackStage,
    state_timer: f32,
    elapsed: f32,
    hit_confirmed: bool,
    locked_facing: bool,
    /// Horizontal impulse applied on entering `Active`, cleared again at recovery
    lunging: bool,
}

impl AttackExecutor {
    /// Enter `Windup`: emit the windup cue and take the facing lock if asked.
    pub fn start(attack: Arc<AttackDefinition>, env: &mut AttackEnv) -> Self {
        env.cues.play(Cue::Windup);
        if let Some(sound) = &attack.windup_sound {
            env.cues.play_sound(sound);
        }

        let locked_facing = attack.lock_facing && !env.facing.is_locked();
        if locked_facing {
            env.facing.lock();
        }

        debug!(
            "Attack '{}' windup ({:.2}s / {:.2}s / {:.2}s)",
            attack.id, attack.windup_seconds, attack.active_seconds, attack.recovery_seconds
        );

        Self {
            attack,
            stage: AttackStage::Windup,
            state_timer: 0.0,
            elapsed: 0.0,
            hit_confirmed: false,
            locked_facing,
            lunging: false,
        }
    }

    pub fn attack(&self) -> &Arc<AttackDefinition> {
        &self.attack
    }

    pub fn stage(&self) -> AttackStage {
        self.stage
    }

    pub fn is_done(&self) -> bool {
        self.stage == AttackStage::Done
    }

    /// Total time this instance has spent suspended.
    #[cfg(test)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// External "hit landed" signal.
    ///
    /// Only honoured during `Active` for attacks flagged `end_active_on_hit`,
    /// and only the first call counts. Returns whether it took effect.
    pub fn confirm_hit(&mut self) -> bool {
        if self.stage != AttackStage::Active
            || !self.attack.end_active_on_hit
            || self.hit_confirmed
        {
            return false;
        }
        self.hit_confirmed = true;
        true
    }

    pub fn tick(&mut self, dt: f32, env: &mut AttackEnv) -> AttackStage {
        if self.stage == AttackStage::Done {
            return self.stage;
        }

        self.state_timer += dt;
        self.elapsed += dt;

        // Zero-length stages fall straight through in the same tick.
        loop {
            match self.stage {
                AttackStage::Windup => {
                    if self.state_timer < self.attack.windup_seconds {
                        break;
                    }
                    self.state_timer -= self.attack.windup_seconds;
                    self.enter_active(env);
                }
                AttackStage::Active => {
                    if self.hit_confirmed {
                        self.state_timer = 0.0;
                    } else if self.state_timer >= self.attack.active_seconds {
                        self.state_timer -= self.attack.active_seconds;
                    } else {
                        break;
                    }
                    self.enter_recovery(env);
                }
                AttackStage::Recovery => {
                    if self.state_timer < self.attack.recovery_seconds {
                        break;
                    }
                    self.state_timer = 0.0;
                    self.stage = AttackStage::Done;
                }
                AttackStage::Done => break,
            }
        }

        self.stage
    }

    fn enter_active(&mut self, env: &mut AttackEnv) {
        self.stage = AttackStage::Active;
        env.cues.play(Cue::Attack);

        let knockback = self.attack.knockback.unwrap_or(env.default_knockback);
        env.hitboxes
            .enable(&self.attack.hitbox, self.attack.damage, knockback);

        let impulse = self.attack.movement_impulse;
        if impulse != Vec2::ZERO {
            let mut velocity = env.body.velocity();
            velocity.x = impulse.x * env.facing.sign();
            velocity.y += impulse.y;
            env.body.set_velocity(velocity);
            self.lunging = impulse.x != 0.0;
        }
    }

    fn enter_recovery(&mut self, env: &mut AttackEnv) {
        env.hitboxes.disable(&self.attack.hitbox);
        if self.lunging {
            let mut velocity = env.body.velocity();
            velocity.x = 0.0;
            env.body.set_velocity(velocity);
            self.lunging = false;
        }
        if self.locked_facing {
            env.facing.unlock();
            self.locked_facing = false;
        }
        self.stage = AttackStage::Recovery;
        env.cues.play(Cue::Recover);
    }
}

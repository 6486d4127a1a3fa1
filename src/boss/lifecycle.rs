//! Boss domain: root controller owning HP, phase and the sub-machines.

use std::sync::Arc;

use bevy::prelude::*;

use crate::boss::attacks::PhaseDefinition;
use crate::boss::decision::DecisionLoop;
use crate::boss::definition::{BossConfigError, BossDefinition};
use crate::boss::executor::AttackEnv;
use crate::boss::hitbox::{HitboxController, knockback_vector};
use crate::boss::intro::{IntroSequencer, IntroStage};
use crate::boss::phase::PhaseSupervisor;
use crate::boss::ports::{BossPorts, Cue, DamageTarget, OverlapFacts, TickInput};
use crate::boss::state::{BossRuntimeState, BossSnapshot};

/// One armed boss: intro, decision cycles, phase transitions and death.
///
/// Ticked once per simulation frame. `take_damage` may be called at any
/// other time; it only touches HP, the health display and the dead flag.
#[derive(Component, Debug, Clone)]
pub struct BossLifecycle {
    definition: Arc<BossDefinition>,
    state: BossRuntimeState,
    hitboxes: HitboxController,
    intro: IntroSequencer,
    supervisor: PhaseSupervisor,
    decision: DecisionLoop,
    /// Phase we already complained about being unable to attack in
    stalled_phase: Option<usize>,
}

impl BossLifecycle {
    pub fn new(definition: Arc<BossDefinition>, seed: u64) -> Result<Self, BossConfigError> {
        if let Some(error) = definition.validate().into_iter().next() {
            return Err(error);
        }
        for warning in definition.lint() {
            warn!("Boss '{}': {}", definition.id, warning);
        }

        let move_speed = definition.phases.first().map_or(0.0, |p| p.move_speed);

        Ok(Self {
            state: BossRuntimeState::new(definition.max_hp, move_speed),
            hitboxes: HitboxController::new(definition.hitbox_ids().cloned()),
            intro: IntroSequencer::new(definition.intro.clone().unwrap_or_default()),
            supervisor: PhaseSupervisor::new(definition.stagger_seconds),
            decision: DecisionLoop::new(definition.decision.clone(), seed),
            stalled_phase: None,
            definition,
        })
    }

    /// Rebuild a fight-ready boss from a save snapshot.
    pub fn restore(
        definition: Arc<BossDefinition>,
        snapshot: &BossSnapshot,
        seed: u64,
    ) -> Result<Self, BossConfigError> {
        if snapshot.boss_id != definition.id {
            warn!(
                "Restoring snapshot for '{}' onto boss '{}'",
                snapshot.boss_id, definition.id
            );
        }
        if snapshot.max_hp != definition.max_hp {
            warn!(
                "Snapshot max_hp {} differs from definition {}; clamping",
                snapshot.max_hp, definition.max_hp
            );
        }

        let mut boss = Self::new(definition, seed)?;
        let last_phase = boss.definition.phases.len().saturating_sub(1);

        boss.state.current_hp = snapshot.current_hp.min(boss.state.max_hp);
        boss.state.current_phase_index = snapshot.current_phase_index.min(last_phase);
        if let Some(phase) = boss.definition.phases.get(boss.state.current_phase_index) {
            boss.state.move_speed = phase.move_speed;
        }
        boss.state.dead = snapshot.dead || boss.state.current_hp == 0;
        boss.state.intro = IntroStage::FightStart;
        Ok(boss)
    }

    pub fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            boss_id: self.definition.id.clone(),
            current_hp: self.state.current_hp,
            max_hp: self.state.max_hp,
            current_phase_index: self.state.current_phase_index,
            dead: self.state.dead,
        }
    }

    pub fn definition(&self) -> &Arc<BossDefinition> {
        &self.definition
    }

    pub fn hitboxes(&self) -> &HitboxController {
        &self.hitboxes
    }

    pub fn is_dead(&self) -> bool {
        self.state.dead
    }

    pub fn current_hp(&self) -> u32 {
        self.state.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.state.max_hp
    }

    pub fn current_phase_index(&self) -> usize {
        self.state.current_phase_index
    }

    pub fn current_phase(&self) -> Option<&PhaseDefinition> {
        self.definition.phases.get(self.state.current_phase_index)
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn intro_stage(&self) -> IntroStage {
        self.state.intro
    }

    pub fn facing_sign(&self) -> f32 {
        self.state.facing.sign()
    }

    #[cfg(test)]
    pub fn is_deciding(&self) -> bool {
        self.decision.is_running()
    }

    /// Stage of the attack currently running, if any.
    #[cfg(test)]
    pub fn current_attack_stage(&self) -> Option<crate::boss::executor::AttackStage> {
        self.decision
            .cycle()
            .and_then(|cycle| cycle.executor())
            .map(|executor| executor.stage())
    }

    /// External trigger for the intro. Bosses without intro tuning are armed directly.
    pub fn start_intro(&mut self, target_position: Option<Vec2>, ports: &mut BossPorts) -> bool {
        if self.definition.intro.is_none() {
            return self.arm(ports);
        }
        self.intro.start(&mut self.state, target_position, ports)
    }

    /// Skip the intro and hand control to the combat AI.
    pub fn arm(&mut self, ports: &mut BossPorts) -> bool {
        if self.state.intro != IntroStage::Idle || self.state.dead {
            return false;
        }
        self.state.intro = IntroStage::FightStart;
        self.state.busy = false;
        ports.health.set_visible(true);
        ports
            .health
            .health_changed(self.state.current_hp, self.state.max_hp);
        ports.cues.play(Cue::FightStart);
        info!("Boss '{}' armed without intro", self.definition.id);
        true
    }

    /// Forward an external "hit landed" signal to the running attack.
    pub fn confirm_hit(&mut self) -> bool {
        self.decision
            .cycle_mut()
            .and_then(|cycle| cycle.executor_mut())
            .is_some_and(|executor| executor.confirm_hit())
    }

    pub fn tick(&mut self, input: TickInput, ports: &mut BossPorts) {
        if self.state.dead {
            return;
        }

        if !self.state.intro_complete() {
            self.intro.tick(input.dt, &mut self.state, ports);
            return;
        }

        let boss_position = ports.body.position();
        self.state
            .facing
            .face_toward(input.target_position.x - boss_position.x);

        self.resolve_strikes(
            input.overlaps,
            input.target,
            boss_position,
            input.target_position,
        );

        self.supervisor
            .evaluate(&mut self.state, &self.definition.phases);

        if self.decision.is_running() {
            let finished = {
                let mut env = AttackEnv {
                    body: &mut *ports.body,
                    cues: &mut *ports.cues,
                    hitboxes: &mut self.hitboxes,
                    facing: &mut self.state.facing,
                    default_knockback: self.definition.knockback,
                };
                self.decision.tick(input.dt, &mut env)
            };
            if finished {
                self.state.busy = false;
            }
        } else if self.supervisor.is_staggering() {
            self.supervisor.tick_stagger(input.dt, &mut self.state);
        } else if self.supervisor.has_pending_stagger() {
            self.supervisor.start_stagger(&mut self.state, &mut *ports.cues);
        } else if !self.state.busy && !self.state.phase_transitioning {
            self.enter_decision(input.target_position.x, ports);
        }

        // Hit windows opened during this step, including ones already closed again.
        let boss_position = ports.body.position();
        self.resolve_strikes(
            input.overlaps,
            input.target,
            boss_position,
            input.target_position,
        );
    }

    fn enter_decision(&mut self, target_x: f32, ports: &mut BossPorts) {
        let definition = Arc::clone(&self.definition);
        let index = self.state.current_phase_index;
        let Some(phase) = definition.phases.get(index) else {
            if self.stalled_phase != Some(index) {
                warn!("Boss '{}' has no phase {}; idling", definition.id, index);
                self.stalled_phase = Some(index);
            }
            return;
        };

        let move_speed = self.state.move_speed;
        let started = {
            let mut env = AttackEnv {
                body: &mut *ports.body,
                cues: &mut *ports.cues,
                hitboxes: &mut self.hitboxes,
                facing: &mut self.state.facing,
                default_knockback: definition.knockback,
            };
            self.decision.begin(phase, target_x, move_speed, &mut env)
        };

        if started {
            self.state.busy = true;
        } else if self.stalled_phase != Some(index) {
            warn!(
                "Boss '{}' phase '{}' has no attacks; idling",
                definition.id, phase.name
            );
            self.stalled_phase = Some(index);
        }
    }

    fn resolve_strikes(
        &mut self,
        overlaps: &OverlapFacts,
        target: &mut dyn DamageTarget,
        boss_position: Vec2,
        target_position: Vec2,
    ) {
        for strike in self.hitboxes.collect_strikes(overlaps) {
            let knockback = knockback_vector(
                boss_position,
                target_position,
                self.state.facing.sign(),
                strike.knockback,
            );
            debug!(
                "Hitbox '{}' struck target for {} (knockback {:?})",
                strike.hitbox, strike.damage, knockback
            );
            target.take_damage(strike.damage, knockback);

            if let Some(executor) = self
                .decision
                .cycle_mut()
                .and_then(|cycle| cycle.executor_mut())
                .filter(|executor| executor.attack().hitbox == strike.hitbox)
            {
                executor.confirm_hit();
            }
        }
    }

    /// Damage intake. Returns the HP actually removed.
    ///
    /// Ignored once dead and before the fight has started. Knockback is
    /// accepted but bosses do not get pushed around.
    pub fn take_damage(
        &mut self,
        amount: u32,
        knockback: Option<Vec2>,
        ports: &mut BossPorts,
    ) -> u32 {
        if self.state.dead || !self.state.intro_complete() {
            return 0;
        }

        let applied = amount.min(self.state.current_hp);
        self.state.current_hp -= applied;
        if let Some(knockback) = knockback {
            debug!("Boss absorbed knockback {:?}", knockback);
        }

        ports
            .health
            .health_changed(self.state.current_hp, self.state.max_hp);

        if self.state.current_hp == 0 {
            self.die(ports);
        }
        applied
    }

    /// Terminal. Safe to call repeatedly; only the first call has effects.
    pub fn die(&mut self, ports: &mut BossPorts) {
        if self.state.dead {
            return;
        }
        self.state.dead = true;

        ports.body.set_velocity(Vec2::ZERO);
        ports.cues.play(Cue::Die);
        self.hitboxes.disable_all();

        self.decision.abandon();
        self.supervisor.abandon();
        self.state.busy = false;
        self.state.phase_transitioning = false;
        self.state.facing.unlock();

        info!(
            "Boss '{}' died in phase {}",
            self.definition.id, self.state.current_phase_index
        );
    }
}

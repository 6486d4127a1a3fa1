//! Boss domain: the choose → position → attack → gap cycle.

use std::sync::Arc;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::boss::attacks::{AttackDefinition, PhaseDefinition};
use crate::boss::executor::{AttackEnv, AttackExecutor};
use crate::boss::movement::{MoveStatus, MovementDriver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Reflect)]
pub enum StepBackDirection {
    /// Retreat directly away from the target
    #[default]
    AwayFromTarget,
    /// Retreat opposite the current facing, whatever the target is doing
    BehindFacing,
}

/// Spacing rules for the decision cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTuning {
    /// Half-width of the "in range" band around an attack's preferred range
    pub range_band: f32,
    pub step_back_distance: f32,
    pub step_back_direction: StepBackDirection,
    /// How close counts as arrived when repositioning
    pub arrive_threshold: f32,
}

impl Default for DecisionTuning {
    fn default() -> Self {
        Self {
            range_band: 0.5,
            step_back_distance: 2.0,
            step_back_direction: StepBackDirection::AwayFromTarget,
            arrive_threshold: 0.25,
        }
    }
}

/// Where the boss goes before striking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Positioning {
    /// Close in until `preferred_range` from the target
    Approach { goal_x: f32 },
    StepBack { goal_x: f32 },
    /// Already inside the range band
    Hold,
}

/// Pick the pre-attack move for a boss at `boss_x` against a target at `target_x`.
///
/// Inside `[range - band, range + band]` the boss holds still; that band is
/// the intended in-range policy.
pub fn plan_positioning(
    boss_x: f32,
    target_x: f32,
    preferred_range: f32,
    facing_sign: f32,
    tuning: &DecisionTuning,
) -> Positioning {
    let offset = target_x - boss_x;
    let distance = offset.abs();
    let toward = if offset == 0.0 {
        facing_sign.signum()
    } else {
        offset.signum()
    };

    if distance > preferred_range + tuning.range_band {
        Positioning::Approach {
            goal_x: target_x - toward * preferred_range,
        }
    } else if distance < preferred_range - tuning.range_band {
        let away = match tuning.step_back_direction {
            StepBackDirection::AwayFromTarget => -toward,
            StepBackDirection::BehindFacing => -facing_sign.signum(),
        };
        Positioning::StepBack {
            goal_x: boss_x + away * tuning.step_back_distance,
        }
    } else {
        Positioning::Hold
    }
}

#[derive(Debug, Clone)]
enum CycleStep {
    Positioning(MovementDriver),
    Attacking(AttackExecutor),
    Gap { duration: f32, timer: f32 },
    Finished,
}

/// One full decision cycle in flight.
#[derive(Debug, Clone)]
pub struct DecisionCycle {
    attack: Arc<AttackDefinition>,
    step: CycleStep,
    gap_bounds: (f32, f32),
}

impl DecisionCycle {
    pub fn attack(&self) -> &Arc<AttackDefinition> {
        &self.attack
    }

    pub fn executor(&self) -> Option<&AttackExecutor> {
        match &self.step {
            CycleStep::Attacking(executor) => Some(executor),
            _ => None,
        }
    }

    pub fn executor_mut(&mut self) -> Option<&mut AttackExecutor> {
        match &mut self.step {
            CycleStep::Attacking(executor) => Some(executor),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_positioning(&self) -> bool {
        matches!(self.step, CycleStep::Positioning(_))
    }

    #[cfg(test)]
    pub fn is_in_gap(&self) -> bool {
        matches!(self.step, CycleStep::Gap { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.step, CycleStep::Finished)
    }
}

/// Chooses and runs decision cycles for one boss with a seeded RNG.
#[derive(Debug, Clone)]
pub struct DecisionLoop {
    pub tuning: DecisionTuning,
    rng: ChaCha8Rng,
    cycle: Option<DecisionCycle>,
}

impl DecisionLoop {
    pub fn new(tuning: DecisionTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cycle: None,
        }
    }

    pub fn cycle(&self) -> Option<&DecisionCycle> {
        self.cycle.as_ref()
    }

    pub fn cycle_mut(&mut self) -> Option<&mut DecisionCycle> {
        self.cycle.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.cycle.is_some()
    }

    /// Drop the in-flight cycle without unwinding it.
    pub fn abandon(&mut self) {
        self.cycle = None;
    }

    /// Uniform pick from the phase's attack list.
    pub fn pick_attack(&mut self, phase: &PhaseDefinition) -> Option<Arc<AttackDefinition>> {
        if phase.attacks.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..phase.attacks.len());
        Some(phase.attacks[index].clone())
    }

    #[cfg(test)]
    pub fn roll_gap(&mut self, bounds: (f32, f32)) -> f32 {
        roll_between(&mut self.rng, bounds)
    }

    /// Start a cycle. Returns false (and stays idle) if the phase has no attacks.
    pub fn begin(
        &mut self,
        phase: &PhaseDefinition,
        target_x: f32,
        move_speed: f32,
        env: &mut AttackEnv,
    ) -> bool {
        let Some(attack) = self.pick_attack(phase) else {
            return false;
        };

        let boss_x = env.body.position().x;
        let plan = plan_positioning(
            boss_x,
            target_x,
            attack.preferred_range,
            env.facing.sign(),
            &self.tuning,
        );

        debug!(
            "Decision: '{}' at distance {:.2} -> {:?}",
            attack.id,
            (target_x - boss_x).abs(),
            plan
        );

        let step = match plan {
            Positioning::Approach { goal_x } | Positioning::StepBack { goal_x } => {
                CycleStep::Positioning(MovementDriver::toward(
                    boss_x,
                    goal_x,
                    move_speed,
                    self.tuning.arrive_threshold,
                ))
            }
            Positioning::Hold => CycleStep::Attacking(AttackExecutor::start(attack.clone(), env)),
        };

        self.cycle = Some(DecisionCycle {
            attack,
            step,
            gap_bounds: phase.decision_gap_bounds(),
        });
        true
    }

    /// Advance the running cycle. Returns true once the cycle has finished
    /// and been cleared.
    pub fn tick(&mut self, dt: f32, env: &mut AttackEnv) -> bool {
        let Some(cycle) = self.cycle.as_mut() else {
            return false;
        };

        let next = match &mut cycle.step {
            CycleStep::Positioning(driver) => match driver.tick(dt, &mut *env.body) {
                MoveStatus::Moving => None,
                MoveStatus::Arrived | MoveStatus::TimedOut => Some(CycleStep::Attacking(
                    AttackExecutor::start(cycle.attack.clone(), env),
                )),
            },
            CycleStep::Attacking(executor) => {
                executor.tick(dt, env);
                if executor.is_done() {
                    Some(CycleStep::Gap {
                        duration: roll_between(&mut self.rng, cycle.gap_bounds),
                        timer: 0.0,
                    })
                } else {
                    None
                }
            }
            CycleStep::Gap { duration, timer } => {
                *timer += dt;
                (*timer >= *duration).then_some(CycleStep::Finished)
            }
            CycleStep::Finished => None,
        };

        if let Some(step) = next {
            cycle.step = step;
        }

        if cycle.is_finished() {
            self.cycle = None;
            return true;
        }
        false
    }
}

fn roll_between(rng: &mut ChaCha8Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..=hi)
}

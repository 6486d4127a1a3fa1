//! Boss domain: HP-driven phase transitions and the stagger window.

use bevy::prelude::*;

use crate::boss::attacks::PhaseDefinition;
use crate::boss::ports::{Cue, CueSink};
use crate::boss::state::BossRuntimeState;

pub const DEFAULT_STAGGER_SECONDS: f32 = 1.0;

/// First phase after `current` whose threshold the HP percentage has reached.
///
/// Scans in index order, so when HP skips past several thresholds at once
/// only the nearest one fires; the rest follow on later ticks.
pub fn next_phase(phases: &[PhaseDefinition], current: usize, hp_percent: u32) -> Option<usize> {
    phases
        .iter()
        .enumerate()
        .skip(current + 1)
        .find(|(_, phase)| u32::from(phase.enter_at_hp_percent) >= hp_percent)
        .map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy)]
struct StaggerWindow {
    duration: f32,
    timer: f32,
}

/// Watches HP and moves the phase index forward, never back.
#[derive(Debug, Clone)]
pub struct PhaseSupervisor {
    pub stagger_seconds: f32,
    pending_stagger: bool,
    stagger: Option<StaggerWindow>,
}

impl Default for PhaseSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_STAGGER_SECONDS)
    }
}

impl PhaseSupervisor {
    pub fn new(stagger_seconds: f32) -> Self {
        Self {
            stagger_seconds: stagger_seconds.max(0.0),
            pending_stagger: false,
            stagger: None,
        }
    }

    pub fn has_pending_stagger(&self) -> bool {
        self.pending_stagger
    }

    pub fn is_staggering(&self) -> bool {
        self.stagger.is_some()
    }

    /// Check HP against the phase table and commit a transition if one is due.
    ///
    /// The index and movement tuning change immediately. The stagger itself
    /// is left pending until the boss is free to play it.
    pub fn evaluate(
        &mut self,
        state: &mut BossRuntimeState,
        phases: &[PhaseDefinition],
    ) -> Option<usize> {
        if state.phase_transitioning {
            return None;
        }

        let hp_percent = state.hp_percent();
        let next = next_phase(phases, state.current_phase_index, hp_percent)?;
        let phase = &phases[next];

        info!(
            "Boss entering phase {} '{}' at {}% HP",
            next, phase.name, hp_percent
        );

        state.current_phase_index = next;
        state.move_speed = phase.move_speed;
        state.phase_transitioning = true;
        self.pending_stagger = true;
        Some(next)
    }

    /// Begin the attack-blocking stagger for a committed transition.
    pub fn start_stagger(&mut self, state: &mut BossRuntimeState, cues: &mut dyn CueSink) {
        if !self.pending_stagger {
            return;
        }
        self.pending_stagger = false;
        state.busy = true;
        cues.play(Cue::PhaseShift);
        self.stagger = Some(StaggerWindow {
            duration: self.stagger_seconds,
            timer: 0.0,
        });
    }

    /// Advance the stagger. Returns true on the tick it ends.
    pub fn tick_stagger(&mut self, dt: f32, state: &mut BossRuntimeState) -> bool {
        let Some(window) = self.stagger.as_mut() else {
            return false;
        };
        window.timer += dt;
        if window.timer < window.duration {
            return false;
        }
        self.stagger = None;
        state.busy = false;
        state.phase_transitioning = false;
        true
    }

    /// Forget any transition in flight (death).
    pub fn abandon(&mut self) {
        self.pending_stagger = false;
        self.stagger = None;
    }
}

//! Boss domain: one-shot drop-in / scream / HP-fill introduction.

use bevy::prelude::*;

use crate::boss::ports::{BossPorts, Cue};
use crate::boss::state::BossRuntimeState;

/// Fallback scream length when no cue duration is configured
pub const DEFAULT_SCREAM_SECONDS: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntroStage {
    /// Waiting for the external trigger
    #[default]
    Idle,
    /// Falling into the arena
    DroppedIn,
    Landed,
    Screaming,
    /// Health bar filling from empty
    HpLoading,
    /// Intro finished; combat AI owns the boss
    FightStart,
}

impl IntroStage {
    /// Stages during which the boss is locked out of combat logic.
    pub fn is_running(self) -> bool {
        !matches!(self, IntroStage::Idle | IntroStage::FightStart)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntroTuning {
    /// Explicit drop position; otherwise the target position plus `spawn_offset`
    pub spawn_point: Option<Vec2>,
    pub spawn_offset: Vec2,
    /// Where the boss should end up; without one, landing is judged by vertical speed
    pub landing_point: Option<Vec2>,
    pub fall_speed: f32,
    pub landing_timeout: f32,
    /// Distance to the landing point that counts as landed
    pub landing_epsilon: f32,
    /// Vertical speed below which the boss counts as settled
    pub settle_speed: f32,
    pub scream_delay: f32,
    pub scream_seconds: Option<f32>,
    pub scream_sound: Option<String>,
    pub hp_fill_seconds: f32,
}

impl Default for IntroTuning {
    fn default() -> Self {
        Self {
            spawn_point: None,
            spawn_offset: Vec2::new(0.0, 8.0),
            landing_point: None,
            fall_speed: 12.0,
            landing_timeout: 5.0,
            landing_epsilon: 0.05,
            settle_speed: 0.05,
            scream_delay: 0.3,
            scream_seconds: None,
            scream_sound: None,
            hp_fill_seconds: 1.25,
        }
    }
}

/// Drives [`IntroStage`] on the lifecycle's runtime state.
#[derive(Debug, Clone, Default)]
pub struct IntroSequencer {
    pub tuning: IntroTuning,
    state_timer: f32,
    landing_target: Option<Vec2>,
    displayed_hp: u32,
}

impl IntroSequencer {
    pub fn new(tuning: IntroTuning) -> Self {
        Self {
            tuning,
            ..default()
        }
    }

    /// `Idle → DroppedIn`. Ignored unless the intro is still idle.
    pub fn start(
        &mut self,
        state: &mut BossRuntimeState,
        target_position: Option<Vec2>,
        ports: &mut BossPorts,
    ) -> bool {
        if state.intro != IntroStage::Idle || state.dead {
            return false;
        }

        let spawn = self
            .tuning
            .spawn_point
            .or_else(|| target_position.map(|t| t + self.tuning.spawn_offset))
            .unwrap_or_else(|| ports.body.position() + self.tuning.spawn_offset);
        self.landing_target = self.tuning.landing_point;

        ports.body.teleport(spawn);
        ports.body.set_velocity(Vec2::ZERO);
        ports.body.set_simulated(true);
        ports.body.set_velocity(Vec2::new(0.0, -self.tuning.fall_speed));

        state.busy = true;
        self.enter(state, IntroStage::DroppedIn);
        self.displayed_hp = 0;
        ports.health.set_visible(true);
        ports.health.health_changed(0, state.max_hp);
        ports.cues.play(Cue::JumpDown);

        info!("Boss intro started, dropping in at {:?}", spawn);
        true
    }

    pub fn tick(
        &mut self,
        dt: f32,
        state: &mut BossRuntimeState,
        ports: &mut BossPorts,
    ) -> IntroStage {
        if !state.intro.is_running() {
            return state.intro;
        }

        self.state_timer += dt;

        match state.intro {
            IntroStage::DroppedIn => {
                let position = ports.body.position();
                let mut velocity = ports.body.velocity();

                let near_target = self
                    .landing_target
                    .is_some_and(|t| position.distance(t) < self.tuning.landing_epsilon);
                let settled = velocity.y.abs() < self.tuning.settle_speed;
                let timed_out = self.state_timer >= self.tuning.landing_timeout;

                if near_target || settled || timed_out {
                    if timed_out && !(near_target || settled) {
                        warn!(
                            "Boss landing not detected after {:.1}s; snapping",
                            self.state_timer
                        );
                    }
                    ports.body.teleport(self.landing_target.unwrap_or(position));
                    ports.body.set_velocity(Vec2::ZERO);
                    ports.body.set_simulated(false);
                    self.enter(state, IntroStage::Landed);
                } else {
                    velocity.y = -self.tuning.fall_speed;
                    ports.body.set_velocity(velocity);
                }
            }
            IntroStage::Landed => {
                if self.state_timer >= self.tuning.scream_delay {
                    ports.cues.play(Cue::Scream);
                    if let Some(sound) = &self.tuning.scream_sound {
                        ports.cues.play_sound(sound);
                    }
                    self.enter(state, IntroStage::Screaming);
                }
            }
            IntroStage::Screaming => {
                let scream = self.tuning.scream_seconds.unwrap_or(DEFAULT_SCREAM_SECONDS);
                if self.state_timer >= scream {
                    self.enter(state, IntroStage::HpLoading);
                    if self.tuning.hp_fill_seconds <= 0.0 {
                        self.displayed_hp = state.max_hp;
                        ports.health.health_changed(state.max_hp, state.max_hp);
                        self.finish(state, ports);
                    }
                }
            }
            IntroStage::HpLoading => {
                let t = (self.state_timer / self.tuning.hp_fill_seconds).clamp(0.0, 1.0);
                self.displayed_hp = (state.max_hp as f32 * t).round() as u32;
                ports.health.health_changed(self.displayed_hp, state.max_hp);
                if t >= 1.0 {
                    self.finish(state, ports);
                }
            }
            IntroStage::Idle | IntroStage::FightStart => {}
        }

        state.intro
    }

    fn enter(&mut self, state: &mut BossRuntimeState, stage: IntroStage) {
        debug!("Boss intro: {:?} -> {:?}", state.intro, stage);
        state.intro = stage;
        self.state_timer = 0.0;
    }

    fn finish(&mut self, state: &mut BossRuntimeState, ports: &mut BossPorts) {
        state.current_hp = state.max_hp;
        self.displayed_hp = state.max_hp;
        ports.body.set_simulated(true);
        state.busy = false;
        self.enter(state, IntroStage::FightStart);
        ports.cues.play(Cue::FightStart);
        info!("Boss intro complete; fight started at {} HP", state.max_hp);
    }
}

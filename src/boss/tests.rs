//! Boss domain: unit tests for the sequencing engine.

use std::sync::Arc;

use bevy::prelude::*;

use super::decision::DecisionLoop;
use super::executor::{AttackEnv, AttackExecutor};
use super::hitbox::{HitboxController, knockback_vector};
use super::movement::{MoveStatus, MovementDriver, auto_timeout};
use super::phase::next_phase;
use super::state::{Facing, hp_percent};
use super::{
    AttackDefinition, AttackStage, BossBody, BossConfigError, BossConfigWarning, BossDefinition,
    BossLifecycle, BossPorts, BossSnapshot, Cue, CueSink, DamageTarget, DecisionTuning,
    HealthObserver, HitboxId, IntroStage, IntroTuning, NoHealthDisplay, OverlapFacts,
    PhaseDefinition, Positioning, StepBackDirection, TickInput, plan_positioning,
};

const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct FakeBody {
    position: Vec2,
    velocity: Vec2,
    simulated: bool,
    floor: Option<f32>,
    teleports: Vec<Vec2>,
    simulation_toggles: Vec<bool>,
}

impl FakeBody {
    fn on_floor(x: f32) -> Self {
        Self {
            position: Vec2::new(x, 0.0),
            floor: Some(0.0),
            ..default()
        }
    }

    fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        if let Some(floor) = self.floor {
            if self.position.y <= floor {
                self.position.y = floor;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }
}

impl BossBody for FakeBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.teleports.push(position);
    }

    fn set_simulated(&mut self, simulated: bool) {
        self.simulated = simulated;
        self.simulation_toggles.push(simulated);
    }
}

#[derive(Debug, Default)]
struct RecordingCues {
    now: f32,
    cues: Vec<(f32, Cue)>,
    sounds: Vec<String>,
}

impl RecordingCues {
    fn names(&self) -> Vec<Cue> {
        self.cues.iter().map(|(_, cue)| *cue).collect()
    }

    fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|(_, c)| *c == cue).count()
    }

    fn time_of(&self, cue: Cue) -> Option<f32> {
        self.cues.iter().find(|(_, c)| *c == cue).map(|(t, _)| *t)
    }
}

impl CueSink for RecordingCues {
    fn play(&mut self, cue: Cue) {
        self.cues.push((self.now, cue));
    }

    fn play_sound(&mut self, sound: &str) {
        self.sounds.push(sound.to_string());
    }
}

#[derive(Debug, Default)]
struct RecordingHealth {
    updates: Vec<(u32, u32)>,
    visible: Option<bool>,
}

impl HealthObserver for RecordingHealth {
    fn health_changed(&mut self, current: u32, max: u32) {
        self.updates.push((current, max));
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = Some(visible);
    }
}

#[derive(Debug, Default)]
struct RecordingTarget {
    hits: Vec<(u32, Vec2)>,
}

impl DamageTarget for RecordingTarget {
    fn take_damage(&mut self, amount: u32, knockback: Vec2) {
        self.hits.push((amount, knockback));
    }
}

struct Harness {
    boss: BossLifecycle,
    body: FakeBody,
    cues: RecordingCues,
    health: RecordingHealth,
    target: RecordingTarget,
    target_position: Vec2,
    overlaps: OverlapFacts,
    time: f32,
}

impl Harness {
    fn new(definition: BossDefinition) -> Self {
        Self {
            boss: BossLifecycle::new(Arc::new(definition), 7).expect("valid definition"),
            body: FakeBody::on_floor(0.0),
            cues: RecordingCues::default(),
            health: RecordingHealth::default(),
            target: RecordingTarget::default(),
            target_position: Vec2::new(2.0, 0.0),
            overlaps: OverlapFacts::new(),
            time: 0.0,
        }
    }

    fn armed(definition: BossDefinition) -> Self {
        let mut harness = Self::new(definition);
        let mut ports = BossPorts {
            body: &mut harness.body,
            cues: &mut harness.cues,
            health: &mut harness.health,
        };
        assert!(harness.boss.arm(&mut ports));
        harness
    }

    fn start_intro(&mut self) -> bool {
        let mut ports = BossPorts {
            body: &mut self.body,
            cues: &mut self.cues,
            health: &mut self.health,
        };
        self.boss.start_intro(Some(self.target_position), &mut ports)
    }

    fn step(&mut self) {
        self.time += DT;
        self.cues.now = self.time;
        let mut ports = BossPorts {
            body: &mut self.body,
            cues: &mut self.cues,
            health: &mut self.health,
        };
        self.boss.tick(
            TickInput {
                dt: DT,
                target_position: self.target_position,
                overlaps: &self.overlaps,
                target: &mut self.target,
            },
            &mut ports,
        );
        self.body.integrate(DT);
    }

    fn run(&mut self, seconds: f32) {
        let steps = (seconds / DT).ceil() as usize;
        for _ in 0..steps {
            self.step();
        }
    }

    fn run_until(&mut self, max_seconds: f32, mut done: impl FnMut(&Self) -> bool) -> bool {
        let steps = (max_seconds / DT).ceil() as usize;
        for _ in 0..steps {
            if done(self) {
                return true;
            }
            self.step();
        }
        done(self)
    }

    fn damage(&mut self, amount: u32) -> u32 {
        let mut ports = BossPorts {
            body: &mut self.body,
            cues: &mut self.cues,
            health: &mut self.health,
        };
        self.boss.take_damage(amount, None, &mut ports)
    }
}

fn attack(id: &str) -> Arc<AttackDefinition> {
    Arc::new(AttackDefinition {
        id: id.to_string(),
        ..default()
    })
}

fn phase(name: &str, enter_at_hp_percent: u8, attacks: Vec<Arc<AttackDefinition>>) -> PhaseDefinition {
    PhaseDefinition {
        name: name.to_string(),
        attacks,
        enter_at_hp_percent,
        min_decision_gap: 0.2,
        max_decision_gap: 0.4,
        ..default()
    }
}

fn boss_with_phases(max_hp: u32, thresholds: &[u8]) -> BossDefinition {
    let shared = attack("swipe");
    BossDefinition {
        id: "test_boss".to_string(),
        max_hp,
        phases: thresholds
            .iter()
            .enumerate()
            .map(|(i, &t)| phase(&format!("phase_{i}"), t, vec![Arc::clone(&shared)]))
            .collect(),
        intro: None,
        ..default()
    }
}

// --- AttackExecutor ---

struct AttackRig {
    body: FakeBody,
    cues: RecordingCues,
    hitboxes: HitboxController,
    facing: Facing,
}

impl AttackRig {
    fn new() -> Self {
        Self {
            body: FakeBody::on_floor(0.0),
            cues: RecordingCues::default(),
            hitboxes: HitboxController::new([HitboxId::new("melee")]),
            facing: Facing::default(),
        }
    }

    fn env(&mut self) -> AttackEnv<'_> {
        AttackEnv {
            body: &mut self.body,
            cues: &mut self.cues,
            hitboxes: &mut self.hitboxes,
            facing: &mut self.facing,
            default_knockback: 6.0,
        }
    }
}

#[test]
fn test_attack_emits_windup_attack_recover_in_order() {
    let mut rig = AttackRig::new();
    let melee = HitboxId::new("melee");
    let mut executor = AttackExecutor::start(attack("swipe"), &mut rig.env());

    let mut time = 0.0;
    let mut enabled_time = 0.0;
    while !executor.is_done() {
        time += DT;
        rig.cues.now = time;
        executor.tick(DT, &mut rig.env());
        if rig.hitboxes.is_enabled(&melee) {
            enabled_time += DT;
            assert_eq!(executor.stage(), AttackStage::Active);
        }
        assert!(time < 5.0, "attack never finished");
    }

    assert_eq!(rig.cues.names(), vec![Cue::Windup, Cue::Attack, Cue::Recover]);
    assert!(executor.elapsed() >= attack("swipe").total_seconds() - 1e-4);
    assert!((enabled_time - 0.25).abs() <= DT + 1e-4);
    assert!(!rig.hitboxes.any_enabled());

    let attack_at = rig.cues.time_of(Cue::Attack).unwrap_or_default();
    let recover_at = rig.cues.time_of(Cue::Recover).unwrap_or_default();
    assert!((attack_at - 0.4).abs() <= DT + 1e-4);
    assert!((recover_at - 0.65).abs() <= DT + 1e-4);
}

#[test]
fn test_zero_length_stages_fall_through() {
    let mut rig = AttackRig::new();
    let instant = Arc::new(AttackDefinition {
        windup_seconds: 0.0,
        active_seconds: 0.0,
        recovery_seconds: 0.0,
        ..default()
    });
    let mut executor = AttackExecutor::start(instant, &mut rig.env());
    executor.tick(DT, &mut rig.env());

    assert!(executor.is_done());
    assert_eq!(rig.cues.names(), vec![Cue::Windup, Cue::Attack, Cue::Recover]);
    assert!(!rig.hitboxes.any_enabled());
}

#[test]
fn test_attack_locks_facing_until_recovery() {
    let mut rig = AttackRig::new();
    let mut executor = AttackExecutor::start(attack("swipe"), &mut rig.env());
    assert!(rig.facing.is_locked());

    rig.facing.face_toward(-3.0);
    assert_eq!(rig.facing.sign(), 1.0);

    while executor.stage() != AttackStage::Recovery {
        executor.tick(DT, &mut rig.env());
    }
    assert!(!rig.facing.is_locked());
    rig.facing.face_toward(-3.0);
    assert_eq!(rig.facing.sign(), -1.0);
}

#[test]
fn test_movement_impulse_mirrors_facing_and_keeps_vertical() {
    let mut rig = AttackRig::new();
    rig.facing.face_toward(-1.0);
    rig.body.velocity = Vec2::new(0.0, -2.0);
    let lunge = Arc::new(AttackDefinition {
        windup_seconds: 0.0,
        movement_impulse: Vec2::new(5.0, 1.0),
        ..default()
    });
    let mut executor = AttackExecutor::start(lunge, &mut rig.env());
    executor.tick(DT, &mut rig.env());

    assert_eq!(executor.stage(), AttackStage::Active);
    assert_eq!(rig.body.velocity, Vec2::new(-5.0, -1.0));
}

#[test]
fn test_lunge_stops_when_recovery_starts() {
    let mut rig = AttackRig::new();
    let lunge = Arc::new(AttackDefinition {
        windup_seconds: 0.0,
        movement_impulse: Vec2::new(9.0, 0.0),
        ..default()
    });
    let mut executor = AttackExecutor::start(lunge, &mut rig.env());
    executor.tick(DT, &mut rig.env());
    assert_eq!(rig.body.velocity.x, 9.0);

    while executor.stage() == AttackStage::Active {
        executor.tick(DT, &mut rig.env());
    }
    assert_eq!(executor.stage(), AttackStage::Recovery);
    assert_eq!(rig.body.velocity.x, 0.0);
}

#[test]
fn test_hit_confirm_ends_active_only_when_flagged() {
    let mut rig = AttackRig::new();
    let quick = Arc::new(AttackDefinition {
        end_active_on_hit: true,
        ..default()
    });
    let mut executor = AttackExecutor::start(quick, &mut rig.env());
    assert!(!executor.confirm_hit(), "windup ignores hit confirm");

    while executor.stage() != AttackStage::Active {
        executor.tick(DT, &mut rig.env());
    }
    assert!(executor.confirm_hit());
    assert!(!executor.confirm_hit(), "second confirm is a no-op");
    executor.tick(DT, &mut rig.env());
    assert_eq!(executor.stage(), AttackStage::Recovery);
    assert!(!rig.hitboxes.any_enabled());

    let mut rig = AttackRig::new();
    let mut executor = AttackExecutor::start(attack("plain"), &mut rig.env());
    while executor.stage() != AttackStage::Active {
        executor.tick(DT, &mut rig.env());
    }
    assert!(!executor.confirm_hit());
    executor.tick(DT, &mut rig.env());
    assert_eq!(executor.stage(), AttackStage::Active);
}

// --- HitboxController ---

#[test]
fn test_strikes_once_per_enable_period() {
    let melee = HitboxId::new("melee");
    let mut hitboxes = HitboxController::new([melee.clone(), melee.clone()]);
    assert_eq!(hitboxes.handles().len(), 1);

    let overlaps: OverlapFacts = [melee.clone()].into_iter().collect();
    assert!(hitboxes.collect_strikes(&overlaps).is_empty(), "disabled");

    assert!(hitboxes.enable(&melee, 3, 4.0));
    let strikes = hitboxes.collect_strikes(&overlaps);
    assert_eq!(strikes.len(), 1);
    assert_eq!(strikes[0].damage, 3);
    assert!(hitboxes.collect_strikes(&overlaps).is_empty());

    hitboxes.disable(&melee);
    hitboxes.enable(&melee, 3, 4.0);
    assert_eq!(hitboxes.collect_strikes(&overlaps).len(), 1);
}

#[test]
fn test_window_closed_within_one_tick_is_still_checked() {
    let melee = HitboxId::new("melee");
    let mut hitboxes = HitboxController::new([melee.clone()]);
    let overlaps: OverlapFacts = [melee.clone()].into_iter().collect();

    hitboxes.enable(&melee, 2, 4.0);
    hitboxes.disable(&melee);
    assert_eq!(hitboxes.collect_strikes(&overlaps).len(), 1);
    assert!(hitboxes.collect_strikes(&overlaps).is_empty());

    hitboxes.enable(&melee, 2, 4.0);
    hitboxes.disable_all();
    assert!(hitboxes.collect_strikes(&overlaps).is_empty());
}

#[test]
fn test_unknown_hitbox_is_a_noop() {
    let mut hitboxes = HitboxController::new([HitboxId::new("melee")]);
    let ghost = HitboxId::new("ghost");
    assert!(!hitboxes.enable(&ghost, 1, 1.0));
    assert!(!hitboxes.disable(&ghost));
    assert!(!hitboxes.any_enabled());
}

#[test]
fn test_knockback_points_away_from_boss() {
    let push = knockback_vector(Vec2::ZERO, Vec2::new(-3.0, 0.0), 1.0, 6.0);
    assert!((push - Vec2::new(-6.0, 0.0)).length() < 1e-5);

    let stacked = knockback_vector(Vec2::ONE, Vec2::ONE, -1.0, 2.0);
    assert_eq!(stacked, Vec2::new(-2.0, 0.0));
}

// --- MovementDriver ---

#[test]
fn test_movement_with_zero_speed_times_out() {
    let mut body = FakeBody::on_floor(0.0);
    let mut driver = MovementDriver::toward(0.0, 10.0, 0.0, 0.25);
    assert_eq!(driver.timeout, 4.0);

    let mut steps = 0;
    while driver.tick(0.1, &mut body) == MoveStatus::Moving {
        steps += 1;
        assert!(steps < 100, "driver never gave up");
    }
    assert_eq!(driver.status(), MoveStatus::TimedOut);
    assert!(driver.elapsed() >= 4.0 - 1e-4);
    assert_eq!(body.velocity.x, 0.0);
}

#[test]
fn test_movement_arrives_and_leaves_vertical_alone() {
    let mut body = FakeBody {
        velocity: Vec2::new(0.0, 1.5),
        ..default()
    };
    let mut driver = MovementDriver::toward(0.0, 3.0, 5.0, 0.1);

    let status = loop {
        let status = driver.tick(DT, &mut body);
        if status.is_finished() {
            break status;
        }
        assert_eq!(body.velocity.y, 1.5);
        body.position.x += body.velocity.x * DT;
    };

    assert_eq!(status, MoveStatus::Arrived);
    assert!((body.position.x - 3.0).abs() <= 0.1);
    assert_eq!(body.velocity, Vec2::new(0.0, 1.5));
}

#[test]
fn test_auto_timeout_is_capped() {
    assert_eq!(auto_timeout(10.0, 5.0), 4.0);
    assert_eq!(auto_timeout(2.0, 4.0), 2.5);
    assert_eq!(auto_timeout(50.0, 1.0), 4.0);
    assert_eq!(auto_timeout(1.0, -2.0), 4.0);
}

// --- DecisionLoop ---

#[test]
fn test_plan_positioning_bands() {
    let tuning = DecisionTuning::default();

    match plan_positioning(0.0, 8.0, 2.0, 1.0, &tuning) {
        Positioning::Approach { goal_x } => assert!((goal_x - 6.0).abs() < 1e-5),
        other => panic!("expected approach, got {:?}", other),
    }
    match plan_positioning(0.0, -8.0, 2.0, 1.0, &tuning) {
        Positioning::Approach { goal_x } => assert!((goal_x + 6.0).abs() < 1e-5),
        other => panic!("expected approach, got {:?}", other),
    }
    match plan_positioning(0.0, 0.5, 2.0, 1.0, &tuning) {
        Positioning::StepBack { goal_x } => assert!((goal_x + 2.0).abs() < 1e-5),
        other => panic!("expected step back, got {:?}", other),
    }
    assert_eq!(plan_positioning(0.0, 2.4, 2.0, 1.0, &tuning), Positioning::Hold);
    assert_eq!(plan_positioning(0.0, -1.6, 2.0, 1.0, &tuning), Positioning::Hold);

    let behind = DecisionTuning {
        step_back_direction: StepBackDirection::BehindFacing,
        ..default()
    };
    match plan_positioning(0.0, -0.5, 2.0, -1.0, &behind) {
        Positioning::StepBack { goal_x } => assert!((goal_x - 2.0).abs() < 1e-5),
        other => panic!("expected step back, got {:?}", other),
    }
}

#[test]
fn test_seeded_decisions_are_reproducible() {
    let phase = phase(
        "mixed",
        100,
        vec![attack("a"), attack("b"), attack("c"), attack("d")],
    );
    let mut first = DecisionLoop::new(DecisionTuning::default(), 42);
    let mut second = DecisionLoop::new(DecisionTuning::default(), 42);

    for _ in 0..20 {
        let a = first.pick_attack(&phase).map(|a| a.id.clone());
        let b = second.pick_attack(&phase).map(|a| a.id.clone());
        assert_eq!(a, b);
        assert_eq!(first.roll_gap((0.2, 0.4)), second.roll_gap((0.2, 0.4)));
    }
}

#[test]
fn test_gap_stays_within_bounds() {
    let mut decisions = DecisionLoop::new(DecisionTuning::default(), 3);
    for _ in 0..100 {
        let gap = decisions.roll_gap((0.3, 0.8));
        assert!((0.3..=0.8).contains(&gap));
    }
    assert_eq!(decisions.roll_gap((0.5, 0.5)), 0.5);

    let reversed = PhaseDefinition {
        min_decision_gap: 1.0,
        max_decision_gap: 0.2,
        ..default()
    };
    assert_eq!(reversed.decision_gap_bounds(), (0.2, 1.0));
}

#[test]
fn test_decision_cycle_moves_then_attacks_then_waits() {
    let mut rig = AttackRig::new();
    let phase = phase("only", 100, vec![attack("swipe")]);
    let mut decisions = DecisionLoop::new(DecisionTuning::default(), 11);

    assert!(decisions.begin(&phase, 8.0, 6.0, &mut rig.env()));
    assert!(decisions.cycle().is_some_and(|cycle| cycle.is_positioning()));

    let mut saw_attack = false;
    let mut saw_gap = false;
    let mut time = 0.0;
    while decisions.is_running() {
        decisions.tick(DT, &mut rig.env());
        rig.body.integrate(DT);
        if let Some(cycle) = decisions.cycle() {
            assert_eq!(cycle.attack().id, "swipe");
            saw_attack |= cycle.executor().is_some();
            saw_gap |= cycle.is_in_gap();
        }
        time += DT;
        assert!(time < 10.0, "cycle never finished");
    }

    assert!(saw_attack && saw_gap);
    assert_eq!(rig.cues.names(), vec![Cue::Windup, Cue::Attack, Cue::Recover]);
}

// --- PhaseSupervisor ---

#[test]
fn test_next_phase_scans_in_order() {
    let phases = vec![
        phase("a", 100, vec![]),
        phase("b", 70, vec![]),
        phase("c", 40, vec![]),
    ];
    assert_eq!(next_phase(&phases, 0, 100), None);
    assert_eq!(next_phase(&phases, 0, 70), Some(1));
    assert_eq!(next_phase(&phases, 0, 30), Some(1));
    assert_eq!(next_phase(&phases, 1, 30), Some(2));
    assert_eq!(next_phase(&phases, 2, 0), None);
}

#[test]
fn test_hp_percent_rounds_to_nearest() {
    assert_eq!(hp_percent(13, 25), 52);
    assert_eq!(hp_percent(10, 25), 40);
    assert_eq!(hp_percent(1, 3), 33);
    assert_eq!(hp_percent(2, 3), 67);
    assert_eq!(hp_percent(5, 0), 0);
}

#[test]
fn test_phase_transition_fires_once_at_threshold() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100, 52]));
    harness.run(0.5);
    assert_eq!(harness.boss.current_phase_index(), 0);

    assert_eq!(harness.damage(12), 12);
    assert_eq!(harness.boss.current_hp(), 13);
    harness.step();
    assert_eq!(harness.boss.current_phase_index(), 1);

    harness.run(4.0);
    assert_eq!(harness.cues.count(Cue::PhaseShift), 1);

    harness.damage(3);
    assert_eq!(harness.boss.current_hp(), 10);
    harness.run(4.0);
    assert_eq!(harness.boss.current_phase_index(), 1);
    assert_eq!(harness.cues.count(Cue::PhaseShift), 1);
}

#[test]
fn test_phase_index_never_decreases_across_skipped_thresholds() {
    let mut harness = Harness::armed(boss_with_phases(100, &[100, 70, 40]));
    harness.run(0.2);
    harness.damage(70);

    let mut last = harness.boss.current_phase_index();
    let mut seen = vec![last];
    for _ in 0..(8.0 / DT) as usize {
        harness.step();
        let index = harness.boss.current_phase_index();
        assert!(index >= last);
        if index != last {
            seen.push(index);
        }
        last = index;
    }

    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(harness.cues.count(Cue::PhaseShift), 2);
}

#[test]
fn test_no_attack_starts_during_stagger() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100, 52]));
    harness.run(0.2);
    harness.damage(12);
    harness.run(4.0);

    let shift_at = harness.cues.time_of(Cue::PhaseShift).unwrap_or_default();
    let stagger_end = shift_at + 1.0 - DT;
    assert!(
        !harness
            .cues
            .cues
            .iter()
            .any(|(t, cue)| *cue == Cue::Windup && *t >= shift_at && *t < stagger_end)
    );
}

// --- BossLifecycle ---

#[test]
fn test_damage_mid_attack_does_not_interrupt() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100]));
    assert!(harness.run_until(2.0, |h| h.boss.current_attack_stage() == Some(AttackStage::Active)));

    assert_eq!(harness.damage(3), 3);
    assert_eq!(harness.boss.current_hp(), 22);
    assert_eq!(harness.boss.current_attack_stage(), Some(AttackStage::Active));
    assert!(harness.boss.is_busy());

    assert!(harness.run_until(2.0, |h| h.cues.count(Cue::Recover) == 1));
    assert_eq!(harness.cues.count(Cue::Die), 0);
}

#[test]
fn test_lethal_damage_mid_attack_preempts() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100]));
    assert!(harness.run_until(2.0, |h| h.boss.current_attack_stage() == Some(AttackStage::Active)));
    assert!(harness.boss.hitboxes().any_enabled());

    assert_eq!(harness.damage(99), 25);
    assert!(harness.boss.is_dead());
    assert!(!harness.boss.hitboxes().any_enabled());
    assert_eq!(harness.body.velocity, Vec2::ZERO);

    let cues_at_death = harness.cues.cues.len();
    harness.run(3.0);
    assert_eq!(harness.cues.cues.len(), cues_at_death);
    assert_eq!(harness.cues.count(Cue::Recover), 0);
}

#[test]
fn test_repeated_damage_after_death_is_ignored() {
    let mut harness = Harness::armed(boss_with_phases(10, &[100]));
    harness.damage(10);
    assert!(harness.boss.is_dead());

    assert_eq!(harness.damage(5), 0);
    assert_eq!(harness.damage(5), 0);
    assert_eq!(harness.boss.current_hp(), 0);
    assert_eq!(harness.cues.count(Cue::Die), 1);

    let mut ports = BossPorts {
        body: &mut harness.body,
        cues: &mut harness.cues,
        health: &mut harness.health,
    };
    harness.boss.die(&mut ports);
    assert_eq!(harness.cues.count(Cue::Die), 1);
}

#[test]
fn test_strike_reaches_target_once_with_knockback() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100]));
    harness.overlaps.insert(HitboxId::new("melee"));

    assert!(harness.run_until(3.0, |h| h.cues.count(Cue::Recover) == 1));
    assert_eq!(harness.target.hits.len(), 1);

    let (amount, knockback) = harness.target.hits[0];
    assert_eq!(amount, 1);
    assert!(knockback.x > 0.0);
    assert!((knockback.length() - 6.0).abs() < 1e-4);
}

#[test]
fn test_active_window_shorter_than_a_tick_still_strikes() {
    let flick = Arc::new(AttackDefinition {
        id: "flick".to_string(),
        active_seconds: 0.01,
        ..default()
    });
    let definition = BossDefinition {
        phases: vec![phase("only", 100, vec![flick])],
        intro: None,
        ..default()
    };
    let mut harness = Harness::armed(definition);
    harness.overlaps.insert(HitboxId::new("melee"));

    assert!(harness.run_until(3.0, |h| h.cues.count(Cue::Recover) == 1));
    assert_eq!(harness.target.hits.len(), 1);
    assert!(!harness.boss.hitboxes().any_enabled());
}

#[test]
fn test_landed_hit_closes_flagged_attack_early() {
    let quick = Arc::new(AttackDefinition {
        id: "jab".to_string(),
        active_seconds: 0.5,
        end_active_on_hit: true,
        ..default()
    });
    let definition = BossDefinition {
        phases: vec![phase("only", 100, vec![quick])],
        intro: None,
        ..default()
    };
    let mut harness = Harness::armed(definition);
    harness.overlaps.insert(HitboxId::new("melee"));

    assert!(harness.run_until(3.0, |h| h.cues.count(Cue::Recover) == 1));
    let attack_at = harness.cues.time_of(Cue::Attack).unwrap_or_default();
    let recover_at = harness.cues.time_of(Cue::Recover).unwrap_or_default();
    assert!(recover_at - attack_at < 0.1);
    assert_eq!(harness.target.hits.len(), 1);
}

#[test]
fn test_boss_approaches_distant_target_before_attacking() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100]));
    harness.target_position = Vec2::new(10.0, 0.0);

    harness.step();
    assert!(harness.boss.is_deciding());
    assert_eq!(harness.boss.current_attack_stage(), None);
    assert!(harness.body.velocity.x > 0.0);

    assert!(harness.run_until(4.0, |h| h.cues.count(Cue::Windup) == 1));
    assert!((harness.body.position.x - 8.0).abs() <= 0.35);
    assert_eq!(harness.body.velocity.x, 0.0);
}

#[test]
fn test_phase_without_attacks_idles() {
    let definition = BossDefinition {
        phases: vec![phase("empty", 100, vec![])],
        intro: None,
        ..default()
    };
    assert!(
        definition
            .lint()
            .contains(&BossConfigWarning::EmptyPhase { phase: 0 })
    );

    let mut harness = Harness::armed(definition);
    harness.run(2.0);
    assert!(!harness.boss.is_busy());
    assert!(!harness.boss.is_deciding());
    assert_eq!(harness.cues.count(Cue::Windup), 0);
}

#[test]
fn test_unknown_hitbox_rejected_at_construction() {
    let definition = BossDefinition {
        phases: vec![phase(
            "bad",
            100,
            vec![Arc::new(AttackDefinition {
                hitbox: HitboxId::new("tail"),
                ..default()
            })],
        )],
        ..default()
    };
    let error = BossLifecycle::new(Arc::new(definition), 0).err();
    assert!(matches!(
        error,
        Some(BossConfigError::UnknownHitbox { ref hitbox, .. }) if hitbox.as_str() == "tail"
    ));

    let hollow = BossDefinition {
        max_hp: 0,
        ..default()
    };
    assert_eq!(
        hollow.validate(),
        vec![BossConfigError::ZeroMaxHp {
            boss: "boss".to_string()
        }]
    );
}

#[test]
fn test_lint_flags_soft_problems() {
    let definition = BossDefinition {
        phases: vec![
            phase("a", 60, vec![attack("x")]),
            PhaseDefinition {
                min_decision_gap: 2.0,
                max_decision_gap: 1.0,
                ..phase("b", 80, vec![attack("y")])
            },
        ],
        ..default()
    };
    let warnings = definition.lint();
    assert!(warnings.contains(&BossConfigWarning::ReversedDecisionGap { phase: 1 }));
    assert!(warnings.contains(&BossConfigWarning::PhaseThresholdNotDescending { phase: 1 }));

    let empty = BossDefinition {
        phases: vec![],
        ..default()
    };
    assert_eq!(empty.lint(), vec![BossConfigWarning::NoPhases]);
}

// --- IntroSequencer ---

fn intro_boss(tuning: IntroTuning) -> BossDefinition {
    BossDefinition {
        max_hp: 40,
        intro: Some(tuning),
        ..boss_with_phases(40, &[100])
    }
}

#[test]
fn test_intro_reaches_fight_start() {
    let mut harness = Harness::new(intro_boss(IntroTuning {
        scream_sound: Some("roar".to_string()),
        ..default()
    }));
    assert_eq!(harness.damage(5), 0, "damage before the fight is ignored");

    assert!(harness.start_intro());
    assert!(!harness.start_intro(), "second trigger is ignored");
    assert_eq!(harness.boss.intro_stage(), IntroStage::DroppedIn);
    assert!(harness.boss.is_busy());
    assert_eq!(harness.health.visible, Some(true));
    assert_eq!(harness.body.teleports[0], Vec2::new(2.0, 8.0));

    assert!(harness.run_until(6.0, |h| h.boss.intro_stage() == IntroStage::FightStart));
    assert!(!harness.boss.is_busy());
    assert_eq!(harness.boss.current_hp(), 40);
    assert!(harness.body.simulated);
    assert_eq!(harness.cues.names(), vec![Cue::JumpDown, Cue::Scream, Cue::FightStart]);
    assert_eq!(harness.cues.sounds, vec!["roar".to_string()]);

    let shown: Vec<u32> = harness.health.updates.iter().map(|(c, _)| *c).collect();
    assert_eq!(shown.first(), Some(&0));
    assert_eq!(shown.last(), Some(&40));
    assert!(shown.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_intro_blocks_combat_until_finished() {
    let mut harness = Harness::new(intro_boss(IntroTuning::default()));
    harness.run(1.0);
    assert_eq!(harness.boss.intro_stage(), IntroStage::Idle);
    assert!(harness.cues.cues.is_empty());

    harness.start_intro();
    harness.run_until(6.0, |h| h.boss.intro_stage() == IntroStage::FightStart);
    let fight_at = harness.cues.time_of(Cue::FightStart).unwrap_or_default();
    harness.run(1.0);

    let first_windup = harness.cues.time_of(Cue::Windup).unwrap_or_default();
    assert!(first_windup > fight_at);
}

#[test]
fn test_intro_lands_on_timeout_without_floor() {
    let mut harness = Harness::new(intro_boss(IntroTuning {
        landing_timeout: 1.0,
        hp_fill_seconds: 0.0,
        ..default()
    }));
    harness.body.floor = None;

    harness.start_intro();
    assert!(harness.run_until(2.0, |h| h.boss.intro_stage() == IntroStage::Landed));
    assert_eq!(harness.body.velocity, Vec2::ZERO);
    assert!(!harness.body.simulated);

    assert!(harness.run_until(2.0, |h| h.boss.intro_stage() == IntroStage::FightStart));
    assert_eq!(harness.health.updates.last(), Some(&(40, 40)));
    assert_eq!(harness.body.simulation_toggles, vec![true, false, true]);
}

#[test]
fn test_intro_snaps_to_landing_point() {
    let landing = Vec2::new(3.0, 0.0);
    let mut harness = Harness::new(intro_boss(IntroTuning {
        spawn_point: Some(Vec2::new(3.0, 8.0)),
        landing_point: Some(landing),
        landing_epsilon: 0.1,
        landing_timeout: 5.0,
        ..default()
    }));
    harness.body.floor = None;

    harness.start_intro();
    assert!(harness.run_until(2.0, |h| h.boss.intro_stage() == IntroStage::Landed));
    assert!(harness.time < 1.0, "landed by distance, not by timeout");
    assert_eq!(harness.body.teleports.last(), Some(&landing));
    assert_eq!(harness.body.position, landing);
    assert_eq!(harness.body.velocity, Vec2::ZERO);
    assert!(!harness.body.simulated);
}

#[test]
fn test_intro_uses_explicit_spawn_point() {
    let mut harness = Harness::new(intro_boss(IntroTuning {
        spawn_point: Some(Vec2::new(-4.0, 12.0)),
        ..default()
    }));
    harness.start_intro();
    assert_eq!(harness.body.teleports, vec![Vec2::new(-4.0, 12.0)]);
    assert_eq!(harness.body.velocity, Vec2::new(0.0, -12.0));
}

#[test]
fn test_boss_without_intro_is_armed_directly() {
    let mut harness = Harness::new(boss_with_phases(25, &[100]));
    assert!(harness.start_intro());
    assert_eq!(harness.boss.intro_stage(), IntroStage::FightStart);
    assert_eq!(harness.cues.names(), vec![Cue::FightStart]);
    assert_eq!(harness.health.updates, vec![(25, 25)]);
}

#[test]
fn test_boss_runs_without_health_display() {
    let definition = Arc::new(boss_with_phases(10, &[100]));
    let mut boss = BossLifecycle::new(definition, 1).expect("valid definition");
    let mut body = FakeBody::on_floor(0.0);
    let mut cues = RecordingCues::default();
    let mut health = NoHealthDisplay;
    let mut ports = BossPorts {
        body: &mut body,
        cues: &mut cues,
        health: &mut health,
    };

    assert!(boss.arm(&mut ports));
    assert_eq!(boss.take_damage(15, None, &mut ports), 10);
    assert!(boss.is_dead());
    assert_eq!(cues.count(Cue::Die), 1);
}

// --- Snapshots ---

#[test]
fn test_snapshot_json_round_trip() {
    let mut harness = Harness::armed(boss_with_phases(25, &[100, 52]));
    harness.damage(12);
    harness.step();

    let snapshot = harness.boss.snapshot();
    let json = snapshot.to_json().expect("serialize");
    let restored = BossSnapshot::from_json(&json).expect("deserialize");
    assert_eq!(restored, snapshot);
    assert_eq!(restored.current_hp, 13);
    assert_eq!(restored.current_phase_index, 1);
}

#[test]
fn test_restored_boss_makes_identical_phase_decisions() {
    let definition = Arc::new(boss_with_phases(25, &[100, 52, 25]));
    let mut original = Harness::armed((*definition).clone());
    original.damage(12);
    original.run(3.0);

    let snapshot = original.boss.snapshot();
    let mut copy = Harness::new((*definition).clone());
    copy.boss = BossLifecycle::restore(Arc::clone(&definition), &snapshot, 7).expect("restore");
    assert_eq!(copy.boss.intro_stage(), IntroStage::FightStart);

    let mut trajectory = Vec::new();
    for hit in [3, 4, 2, 5, 9] {
        original.damage(hit);
        copy.damage(hit);
        original.run(3.0);
        copy.run(3.0);
        assert_eq!(original.boss.current_hp(), copy.boss.current_hp());
        assert_eq!(
            original.boss.current_phase_index(),
            copy.boss.current_phase_index()
        );
        trajectory.push(copy.boss.current_phase_index());
    }
    assert_eq!(trajectory, vec![1, 2, 2, 2, 2]);
    assert!(original.boss.is_dead() && copy.boss.is_dead());
}

#[test]
fn test_restore_clamps_out_of_range_snapshot() {
    let definition = Arc::new(boss_with_phases(25, &[100, 52]));
    let snapshot = BossSnapshot {
        boss_id: "test_boss".to_string(),
        current_hp: 90,
        max_hp: 90,
        current_phase_index: 7,
        dead: false,
    };
    let boss = BossLifecycle::restore(definition, &snapshot, 0).expect("restore");
    assert_eq!(boss.current_hp(), 25);
    assert_eq!(boss.current_phase_index(), 1);
    assert!(!boss.is_dead());
}

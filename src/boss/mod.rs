//! Boss domain: phase/attack sequencing engine and its ECS wiring.

mod attacks;
mod components;
mod decision;
mod definition;
mod events;
mod executor;
mod hitbox;
mod intro;
mod lifecycle;
mod movement;
mod phase;
mod ports;
mod spawn;
mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use attacks::{AttackDefinition, HitboxId, PhaseDefinition};
pub use components::{BossHitboxVolume, BossOverlaps, BossSeed, BossTarget, WorldScale};
pub use decision::{DecisionTuning, Positioning, StepBackDirection, plan_positioning};
pub use definition::{BossConfigError, BossConfigWarning, BossDefinition, HitboxVolume};
pub use events::{
    BossCueEvent, BossDamaged, BossDefeated, BossHealthChanged, BossHealthVisibility,
    BossPhaseChanged, BossSoundEvent, PlayerStruck, StartBossIntro,
};
pub use executor::AttackStage;
pub use intro::{IntroStage, IntroTuning};
pub use lifecycle::BossLifecycle;
pub use ports::{
    BossBody, BossPorts, Cue, CueSink, DamageTarget, HealthObserver, NoHealthDisplay,
    OverlapFacts, TickInput,
};
pub use spawn::spawn_boss;
pub use state::BossSnapshot;

use bevy::prelude::*;

use crate::boss::systems::{
    announce_boss_outcomes, apply_boss_damage, relay_boss_cues, start_boss_intros,
    sync_boss_facing, sync_hitbox_volumes, tick_bosses, track_hitbox_overlaps,
};

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldScale>()
            .add_message::<StartBossIntro>()
            .add_message::<BossDamaged>()
            .add_message::<BossCueEvent>()
            .add_message::<BossSoundEvent>()
            .add_message::<BossHealthChanged>()
            .add_message::<BossHealthVisibility>()
            .add_message::<PlayerStruck>()
            .add_message::<BossPhaseChanged>()
            .add_message::<BossDefeated>()
            .add_systems(
                Update,
                (
                    track_hitbox_overlaps,
                    start_boss_intros,
                    apply_boss_damage,
                    tick_bosses,
                    sync_hitbox_volumes,
                    sync_boss_facing,
                    relay_boss_cues,
                    announce_boss_outcomes,
                )
                    .chain(),
            );
    }
}

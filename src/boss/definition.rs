//! Boss domain: per-boss configuration and construction-time checks.

use bevy::prelude::*;
use thiserror::Error;

use crate::boss::attacks::{HitboxId, PhaseDefinition};
use crate::boss::decision::DecisionTuning;
use crate::boss::intro::IntroTuning;
use crate::boss::phase::DEFAULT_STAGGER_SECONDS;

/// A damage volume attached to the boss body.
#[derive(Debug, Clone, PartialEq)]
pub struct HitboxVolume {
    pub id: HitboxId,
    /// Full extents in world units
    pub size: Vec2,
    /// Offset from the boss centre when facing +x
    pub offset: Vec2,
}

/// Everything needed to arm one boss kind.
#[derive(Debug, Clone)]
pub struct BossDefinition {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    pub phases: Vec<PhaseDefinition>,
    pub hitboxes: Vec<HitboxVolume>,
    /// `None` means the boss is armed straight into the fight
    pub intro: Option<IntroTuning>,
    pub decision: DecisionTuning,
    pub stagger_seconds: f32,
    /// Strike knockback for attacks that do not set their own
    pub knockback: f32,
    /// Body extents in world units
    pub body_size: Vec2,
}

impl Default for BossDefinition {
    fn default() -> Self {
        Self {
            id: "boss".to_string(),
            name: "Boss".to_string(),
            max_hp: 25,
            phases: vec![PhaseDefinition::default()],
            hitboxes: vec![HitboxVolume {
                id: HitboxId::new("melee"),
                size: Vec2::new(2.0, 1.5),
                offset: Vec2::new(1.5, 0.0),
            }],
            intro: Some(IntroTuning::default()),
            decision: DecisionTuning::default(),
            stagger_seconds: DEFAULT_STAGGER_SECONDS,
            knockback: 6.0,
            body_size: Vec2::new(2.0, 3.0),
        }
    }
}

/// Hard configuration faults; a boss with any of these is never armed.
#[derive(Debug, Error, PartialEq)]
pub enum BossConfigError {
    #[error("boss '{boss}' has max_hp 0")]
    ZeroMaxHp { boss: String },
    #[error("boss '{boss}' attack '{attack}' uses undeclared hitbox '{hitbox}'")]
    UnknownHitbox {
        boss: String,
        attack: String,
        hitbox: HitboxId,
    },
}

/// Soft configuration problems; the boss still runs with degraded behaviour.
#[derive(Debug, Clone, PartialEq)]
pub enum BossConfigWarning {
    NoPhases,
    EmptyPhase { phase: usize },
    ReversedDecisionGap { phase: usize },
    PhaseThresholdNotDescending { phase: usize },
}

impl std::fmt::Display for BossConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BossConfigWarning::NoPhases => write!(f, "no phases defined; boss will never attack"),
            BossConfigWarning::EmptyPhase { phase } => {
                write!(f, "phase {} has no attacks; decisions are skipped", phase)
            }
            BossConfigWarning::ReversedDecisionGap { phase } => {
                write!(f, "phase {} has min_decision_gap > max_decision_gap", phase)
            }
            BossConfigWarning::PhaseThresholdNotDescending { phase } => write!(
                f,
                "phase {} enter threshold is not below the previous phase",
                phase
            ),
        }
    }
}

impl BossDefinition {
    pub fn hitbox_ids(&self) -> impl Iterator<Item = &HitboxId> {
        self.hitboxes.iter().map(|h| &h.id)
    }

    /// Construction-time validation. Collects every hard error.
    pub fn validate(&self) -> Vec<BossConfigError> {
        let mut errors = Vec::new();

        if self.max_hp == 0 {
            errors.push(BossConfigError::ZeroMaxHp {
                boss: self.id.clone(),
            });
        }

        for phase in &self.phases {
            for attack in &phase.attacks {
                if !self.hitboxes.iter().any(|h| h.id == attack.hitbox) {
                    errors.push(BossConfigError::UnknownHitbox {
                        boss: self.id.clone(),
                        attack: attack.id.clone(),
                        hitbox: attack.hitbox.clone(),
                    });
                }
            }
        }

        errors
    }

    /// Problems worth logging that do not stop the boss from being armed.
    pub fn lint(&self) -> Vec<BossConfigWarning> {
        let mut warnings = Vec::new();

        if self.phases.is_empty() {
            warnings.push(BossConfigWarning::NoPhases);
        }

        for (index, phase) in self.phases.iter().enumerate() {
            if phase.attacks.is_empty() {
                warnings.push(BossConfigWarning::EmptyPhase { phase: index });
            }
            if phase.min_decision_gap > phase.max_decision_gap {
                warnings.push(BossConfigWarning::ReversedDecisionGap { phase: index });
            }
            if index > 0 && phase.enter_at_hp_percent >= self.phases[index - 1].enter_at_hp_percent
            {
                warnings.push(BossConfigWarning::PhaseThresholdNotDescending { phase: index });
            }
        }

        warnings
    }
}

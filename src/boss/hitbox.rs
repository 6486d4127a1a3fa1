//! Boss domain: named hitbox volumes and their enable windows.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::boss::attacks::HitboxId;
use crate::boss::ports::OverlapFacts;

/// Runtime state of one damage volume
#[derive(Debug, Clone)]
pub struct HitboxHandle {
    pub id: HitboxId,
    pub enabled: bool,
    pub damage: u32,
    pub knockback: f32,
    /// Set once the target has been struck during the current enable period
    pub struck: bool,
    /// Enabled since the last strike check. A period that opens and closes
    /// inside one tick still gets checked once.
    unresolved: bool,
}

impl HitboxHandle {
    fn new(id: HitboxId) -> Self {
        Self {
            id,
            enabled: false,
            damage: 0,
            knockback: 0.0,
            struck: false,
            unresolved: false,
        }
    }
}

/// A landed hit, ready to be applied to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Strike {
    pub hitbox: HitboxId,
    pub damage: u32,
    pub knockback: f32,
}

/// Owns every hitbox declared on a boss, indexed by id.
///
/// The id map is built once at spawn; later lookups never walk a scene
/// graph. Unknown ids are rejected when the boss is constructed, so a miss
/// here only logs.
#[derive(Debug, Clone, Default)]
pub struct HitboxController {
    handles: Vec<HitboxHandle>,
    index: HashMap<HitboxId, usize>,
}

impl HitboxController {
    pub fn new(ids: impl IntoIterator<Item = HitboxId>) -> Self {
        let mut controller = Self::default();
        for id in ids {
            if controller.index.contains_key(&id) {
                continue;
            }
            controller.index.insert(id.clone(), controller.handles.len());
            controller.handles.push(HitboxHandle::new(id));
        }
        controller
    }

    pub fn get(&self, id: &HitboxId) -> Option<&HitboxHandle> {
        self.index.get(id).map(|&i| &self.handles[i])
    }

    pub fn is_enabled(&self, id: &HitboxId) -> bool {
        self.get(id).is_some_and(|h| h.enabled)
    }

    #[cfg(test)]
    pub fn any_enabled(&self) -> bool {
        self.handles.iter().any(|h| h.enabled)
    }

    #[cfg(test)]
    pub fn handles(&self) -> &[HitboxHandle] {
        &self.handles
    }

    /// Open a new enable period. Returns false if the id is unknown.
    pub fn enable(&mut self, id: &HitboxId, damage: u32, knockback: f32) -> bool {
        let Some(&i) = self.index.get(id) else {
            warn!("Hitbox '{}' not declared on this boss; skipping enable", id);
            return false;
        };
        let handle = &mut self.handles[i];
        handle.enabled = true;
        handle.damage = damage;
        handle.knockback = knockback;
        handle.struck = false;
        handle.unresolved = true;
        true
    }

    pub fn disable(&mut self, id: &HitboxId) -> bool {
        let Some(&i) = self.index.get(id) else {
            warn!("Hitbox '{}' not declared on this boss; skipping disable", id);
            return false;
        };
        self.handles[i].enabled = false;
        true
    }

    pub fn disable_all(&mut self) {
        for handle in &mut self.handles {
            handle.enabled = false;
            handle.unresolved = false;
        }
    }

    /// Resolve this tick's overlap facts into strikes.
    ///
    /// A hitbox strikes at most once per enable period, however long the
    /// target keeps overlapping it.
    pub fn collect_strikes(&mut self, overlaps: &OverlapFacts) -> Vec<Strike> {
        let mut strikes = Vec::new();
        for handle in &mut self.handles {
            let open = handle.enabled || handle.unresolved;
            handle.unresolved = false;
            if !open || handle.struck || !overlaps.contains(&handle.id) {
                continue;
            }
            handle.struck = true;
            strikes.push(Strike {
                hitbox: handle.id.clone(),
                damage: handle.damage,
                knockback: handle.knockback,
            });
        }
        strikes
    }
}

/// Knockback pointing from the boss toward the struck target.
///
/// Falls back to the boss's facing when both share a position.
pub fn knockback_vector(boss: Vec2, target: Vec2, facing_sign: f32, magnitude: f32) -> Vec2 {
    let dir = (target - boss).normalize_or_zero();
    let dir = if dir == Vec2::ZERO {
        Vec2::new(facing_sign.signum(), 0.0)
    } else {
        dir
    };
    dir * magnitude
}

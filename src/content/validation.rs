//! Validation for cross-references inside boss content definitions.

use std::collections::{HashMap, HashSet};

use super::data::*;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub source_type: &'static str,
    pub source_id: String,
    pub field: &'static str,
    pub target_type: &'static str,
    pub missing_id: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' references missing {} '{}' in field '{}'",
            self.source_type, self.source_id, self.target_type, self.missing_id, self.field
        )
    }
}

/// Helper macro for checking a reference exists
macro_rules! check_ref {
    ($errors:expr, $known:expr, $source_type:expr, $source_id:expr, $field:expr, $target_type:expr, $ref_id:expr) => {
        if !$known.contains($ref_id) {
            $errors.push(ValidationError {
                source_type: $source_type,
                source_id: $source_id.to_string(),
                field: $field,
                target_type: $target_type,
                missing_id: $ref_id.to_string(),
            });
        }
    };
}

/// Validate all cross-references between bosses, phases, attacks and hitboxes.
/// Returns a list of validation errors, empty if all references are valid.
pub fn validate_bosses(bosses: &[BossDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_bosses: HashMap<&str, usize> = HashMap::new();

    for boss in bosses {
        *seen_bosses.entry(boss.id.as_str()).or_default() += 1;

        let hitboxes: HashSet<&str> = boss.hitboxes.iter().map(|h| h.id.as_str()).collect();
        let attacks: HashSet<&str> = boss.attacks.iter().map(|a| a.id.as_str()).collect();

        for attack in &boss.attacks {
            let source = format!("{}/{}", boss.id, attack.id);
            check_ref!(
                errors,
                hitboxes,
                "Attack",
                source,
                "hitbox",
                "Hitbox",
                attack.hitbox.as_str()
            );
        }

        for phase in &boss.phases {
            let source = format!("{}/{}", boss.id, phase.name);
            for attack_id in &phase.attacks {
                check_ref!(
                    errors,
                    attacks,
                    "Phase",
                    source,
                    "attacks",
                    "Attack",
                    attack_id.as_str()
                );
            }
        }
    }

    for (id, count) in seen_bosses {
        if count > 1 {
            errors.push(ValidationError {
                source_type: "BossFile",
                source_id: super::loader::BOSSES_FILE.to_string(),
                field: "items",
                target_type: "unique Boss id",
                missing_id: id.to_string(),
            });
        }
    }

    errors
}

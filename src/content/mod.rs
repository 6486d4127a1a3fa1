//! Content domain: data-driven boss definitions loaded from RON.

mod data;
mod loader;
mod registry;
mod validation;


pub use data::{AttackDef, BossDef, DataFile, DecisionDef, HitboxDef, IntroDef, PhaseDef};
pub use loader::{ContentLoadError, load_boss_defs, parse_data_file};
pub use registry::{BossRegistry, build_definition};
pub use validation::{ValidationError, validate_bosses};

use std::path::PathBuf;

use bevy::prelude::*;

/// Where content files are read from.
#[derive(Resource, Debug, Clone)]
pub struct ContentSettings {
    pub data_dir: PathBuf,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
        }
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentSettings>()
            .init_resource::<BossRegistry>()
            .add_systems(Startup, load_content);
    }
}

/// Load, validate and register every boss definition. Problems are logged,
/// never fatal: bosses that fail engine validation are left out.
fn load_content(mut commands: Commands, settings: Res<ContentSettings>) {
    let defs = match load_boss_defs(&settings.data_dir) {
        Ok(defs) => defs,
        Err(error) => {
            error!("{}", error);
            return;
        }
    };

    let errors = validate_bosses(&defs);
    for error in &errors {
        warn!("Content validation: {}", error);
    }

    let mut registry = BossRegistry::from_defs(&defs);
    registry.bosses.retain(|id, definition| {
        let problems = definition.validate();
        for problem in &problems {
            error!("Boss '{}' rejected: {}", id, problem);
        }
        problems.is_empty()
    });

    info!("{}", registry.summary());
    commands.insert_resource(registry);
}

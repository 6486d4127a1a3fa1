//! Debug domain: state and snapshot helpers for debug tooling.

use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::boss::{BossConfigError, BossDefinition, BossLifecycle, BossSnapshot};

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Last boss snapshot taken, as JSON
    pub saved_snapshot: Option<String>,
    /// Message to display temporarily
    pub status_message: Option<(String, f32)>,
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        let message = message.into();
        info!("[DEBUG] {}", message);
        self.status_message = Some((message, duration));
    }
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("no snapshot saved")]
    NothingSaved,
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] BossConfigError),
}

pub fn save_snapshot(lifecycle: &BossLifecycle) -> Result<String, serde_json::Error> {
    lifecycle.snapshot().to_json()
}

/// Rebuild a boss from saved JSON against its definition.
pub fn restore_snapshot(
    saved: Option<&str>,
    definition: Arc<BossDefinition>,
    seed: u64,
) -> Result<BossLifecycle, RestoreError> {
    let json = saved.ok_or(RestoreError::NothingSaved)?;
    let snapshot = BossSnapshot::from_json(json)?;
    Ok(BossLifecycle::restore(definition, &snapshot, seed)?)
}

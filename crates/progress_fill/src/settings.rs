use std::time::Duration;

use anyhow::{Context as _, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_UPDATE_DURATION, TextMode};

/// Configuration options for [`crate::ProgressFillView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressFillSettings {
    /// What the label shows, `percent` or `value`, default: `percent`.
    pub text_mode: TextMode,
    /// Seconds used by `update_fill` when no duration is given, default: 0.1.
    pub update_duration: f32,
    /// Milliseconds between two animation frames, default: 16.
    pub frame_interval_ms: u64,
}

impl Default for ProgressFillSettings {
    fn default() -> Self {
        Self {
            text_mode: TextMode::default(),
            update_duration: DEFAULT_UPDATE_DURATION,
            frame_interval_ms: 16,
        }
    }
}

impl ProgressFillSettings {
    /// Parse settings from a JSON string, missing fields use the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse progress fill settings")
    }

    /// The JSON schema of the settings, for editor completion.
    pub fn json_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(ProgressFillSettings);
        serde_json::to_value(schema).context("failed to serialize progress fill settings schema")
    }

    /// The delay between two frames, never zero.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

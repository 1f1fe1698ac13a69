//! Reset-to-rest animation configuration

use serde::{Deserialize, Serialize};

use super::{Schema, clamp_min, valid_easing};
use crate::easing::Easing;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfig {
    pub duration_ms: f32,
    pub easing: Easing,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            duration_ms: 200.0,
            easing: Easing::ANTICIPATE_OVERSHOOT,
        }
    }
}

config_overrides! {
    /// Partial [`ResetConfig`]
    ResetOverrides for ResetConfig {
        duration_ms: f32,
        easing: Easing,
    }
}

impl Schema for ResetConfig {
    type Overrides = ResetOverrides;

    fn merge(&mut self, overrides: &ResetOverrides) {
        overrides.apply_to(self);
    }

    fn validate(mut self) -> Result<Self> {
        self.duration_ms = clamp_min("durationMs", self.duration_ms, 0.0)?;
        valid_easing("easing", &self.easing)?;
        Ok(self)
    }
}

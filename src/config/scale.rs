//! Scale reaction configuration

use serde::{Deserialize, Serialize};

use super::{Schema, clamp_min, valid_easing};
use crate::easing::Easing;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    /// Target scale factor while this config is active
    pub scale: f32,
    /// Length of a scale transition
    pub scale_duration_ms: f32,
    pub scale_easing: Easing,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_duration_ms: 500.0,
            scale_easing: Easing::ANTICIPATE_OVERSHOOT,
        }
    }
}

config_overrides! {
    /// Partial [`ScaleConfig`]
    ScaleOverrides for ScaleConfig {
        scale: f32,
        scale_duration_ms: f32,
        scale_easing: Easing,
    }
}

impl Schema for ScaleConfig {
    type Overrides = ScaleOverrides;

    fn merge(&mut self, overrides: &ScaleOverrides) {
        overrides.apply_to(self);
    }

    fn validate(mut self) -> Result<Self> {
        self.scale = clamp_min("scale", self.scale, 0.0)?;
        self.scale_duration_ms = clamp_min("scaleDurationMs", self.scale_duration_ms, 0.0)?;
        valid_easing("scaleEasing", &self.scale_easing)?;
        Ok(self)
    }
}

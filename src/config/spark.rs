//! Spark (radiating particle) spawner configuration

use serde::{Deserialize, Serialize};

use super::{Schema, clamp_min, finite, non_empty, ordered, valid_easing, within};
use crate::easing::Easing;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkConfig {
    /// Whether a standalone spawner starts active
    pub active: bool,
    /// Visual content; each spark picks one at random
    pub components: Vec<String>,
    pub distance_easing: Easing,
    pub distance_start: f32,
    pub duration_ms: f32,
    /// Publish rate of each spark's visible state (0 = every frame)
    pub frame_rate: f32,
    /// Skews the shared random draw: values above 1 favour short waits and
    /// short flights, values below 1 favour long ones
    pub intensity: f32,
    pub max_distance_px: f32,
    pub max_spawn_interval_ms: f32,
    pub min_distance_px: f32,
    pub min_spawn_interval_ms: f32,
    pub opacity_easing: Easing,
    pub opacity_end: f32,
    pub opacity_start: f32,
    pub scale_easing: Easing,
    pub scale_end: f32,
    pub scale_start: f32,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            active: true,
            components: vec!["💸".to_string(), "🔥".to_string()],
            distance_easing: Easing::OVERSHOOT,
            distance_start: 0.0,
            duration_ms: 1000.0,
            frame_rate: 50.0,
            intensity: 1.0,
            max_distance_px: 600.0,
            max_spawn_interval_ms: 500.0,
            min_distance_px: 200.0,
            min_spawn_interval_ms: 50.0,
            opacity_easing: Easing::OVERSHOOT,
            opacity_end: 0.0,
            opacity_start: 1.0,
            scale_easing: Easing::OVERSHOOT,
            scale_end: 5.0,
            scale_start: 0.5,
        }
    }
}

config_overrides! {
    /// Partial [`SparkConfig`]
    SparkOverrides for SparkConfig {
        active: bool,
        components: Vec<String>,
        distance_easing: Easing,
        distance_start: f32,
        duration_ms: f32,
        frame_rate: f32,
        intensity: f32,
        max_distance_px: f32,
        max_spawn_interval_ms: f32,
        min_distance_px: f32,
        min_spawn_interval_ms: f32,
        opacity_easing: Easing,
        opacity_end: f32,
        opacity_start: f32,
        scale_easing: Easing,
        scale_end: f32,
        scale_start: f32,
    }
}

impl Schema for SparkConfig {
    type Overrides = SparkOverrides;

    fn merge(&mut self, overrides: &SparkOverrides) {
        overrides.apply_to(self);
    }

    fn validate(mut self) -> Result<Self> {
        non_empty("components", &self.components)?;
        valid_easing("distanceEasing", &self.distance_easing)?;
        self.distance_start = finite("distanceStart", self.distance_start)?;
        self.duration_ms = clamp_min("durationMs", self.duration_ms, 0.0)?;
        self.frame_rate = clamp_min("frameRate", self.frame_rate, 0.0)?;
        self.intensity = clamp_min("intensity", self.intensity, 0.0)?;
        self.max_distance_px = clamp_min("maxDistancePx", self.max_distance_px, 0.0)?;
        self.min_distance_px = clamp_min("minDistancePx", self.min_distance_px, 0.0)?;
        ordered(
            "minDistancePx",
            self.min_distance_px,
            "maxDistancePx",
            self.max_distance_px,
        )?;
        self.max_spawn_interval_ms = clamp_min("maxSpawnIntervalMs", self.max_spawn_interval_ms, 0.0)?;
        self.min_spawn_interval_ms = clamp_min("minSpawnIntervalMs", self.min_spawn_interval_ms, 0.0)?;
        ordered(
            "minSpawnIntervalMs",
            self.min_spawn_interval_ms,
            "maxSpawnIntervalMs",
            self.max_spawn_interval_ms,
        )?;
        valid_easing("opacityEasing", &self.opacity_easing)?;
        self.opacity_end = within("opacityEnd", self.opacity_end, 0.0, 1.0)?;
        self.opacity_start = within("opacityStart", self.opacity_start, 0.0, 1.0)?;
        valid_easing("scaleEasing", &self.scale_easing)?;
        self.scale_end = clamp_min("scaleEnd", self.scale_end, 0.0)?;
        self.scale_start = clamp_min("scaleStart", self.scale_start, 0.0)?;
        Ok(self)
    }
}

//! Bubble (drifting particle) spawner configuration
//!
//! Bubbles rise from the origin with a multi-harmonic horizontal wobble.
//! Every `*Randomness` field is the upper bound of a uniform random amount
//! added to its base value at spawn time.

use serde::{Deserialize, Serialize};

use super::{Schema, clamp_min, finite, non_empty, ordered, valid_easing, within};
use crate::easing::Easing;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleConfig {
    /// Whether a standalone spawner starts active
    pub active: bool,
    /// Visual content; each bubble picks one at random
    pub components: Vec<String>,
    pub duration_ms: f32,
    pub duration_ms_randomness: f32,
    pub scale_end: f32,
    pub scale_end_randomness: f32,
    /// Publish rate of each bubble's visible state (0 = every frame)
    pub frame_rate: f32,
    pub max_spawn_interval_ms: f32,
    pub min_spawn_interval_ms: f32,
    pub opacity_easing: Easing,
    pub opacity_end: f32,
    pub opacity_start: f32,
    pub scale_easing: Easing,
    pub scale_start: f32,
    pub scale_start_randomness: f32,
    pub wobble_amplitude: f32,
    pub wobble_amplitude_randomness: f32,
    /// Wobble base frequency in Hz
    pub wobble_frequency: f32,
    pub wobble_frequency_randomness: f32,
    pub x_offset_randomness: f32,
    pub y_easing: Easing,
    /// Rise height at the end of the animation (+y is up)
    pub y_end: f32,
    pub y_randomness: f32,
    pub y_start: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            active: false,
            components: vec!["💸".to_string(), "🔥".to_string()],
            duration_ms: 1500.0,
            duration_ms_randomness: 1000.0,
            scale_end: 2.0,
            scale_end_randomness: 0.2,
            frame_rate: 60.0,
            max_spawn_interval_ms: 1000.0,
            min_spawn_interval_ms: 200.0,
            opacity_easing: Easing::ANTICIPATE_OVERSHOOT,
            opacity_end: 0.0,
            opacity_start: 1.0,
            scale_easing: Easing::ANTICIPATE_OVERSHOOT,
            scale_start: 1.0,
            scale_start_randomness: 0.5,
            wobble_amplitude: 1.0,
            wobble_amplitude_randomness: 40.0,
            wobble_frequency: 0.1,
            wobble_frequency_randomness: 0.5,
            x_offset_randomness: 100.0,
            y_easing: Easing::OVERSHOOT,
            y_end: 100.0,
            y_randomness: 200.0,
            y_start: 0.0,
        }
    }
}

config_overrides! {
    /// Partial [`BubbleConfig`]
    BubbleOverrides for BubbleConfig {
        active: bool,
        components: Vec<String>,
        duration_ms: f32,
        duration_ms_randomness: f32,
        scale_end: f32,
        scale_end_randomness: f32,
        frame_rate: f32,
        max_spawn_interval_ms: f32,
        min_spawn_interval_ms: f32,
        opacity_easing: Easing,
        opacity_end: f32,
        opacity_start: f32,
        scale_easing: Easing,
        scale_start: f32,
        scale_start_randomness: f32,
        wobble_amplitude: f32,
        wobble_amplitude_randomness: f32,
        wobble_frequency: f32,
        wobble_frequency_randomness: f32,
        x_offset_randomness: f32,
        y_easing: Easing,
        y_end: f32,
        y_randomness: f32,
        y_start: f32,
    }
}

impl Schema for BubbleConfig {
    type Overrides = BubbleOverrides;

    fn merge(&mut self, overrides: &BubbleOverrides) {
        overrides.apply_to(self);
    }

    fn validate(mut self) -> Result<Self> {
        non_empty("components", &self.components)?;
        self.duration_ms = clamp_min("durationMs", self.duration_ms, 0.0)?;
        self.duration_ms_randomness =
            clamp_min("durationMsRandomness", self.duration_ms_randomness, 0.0)?;
        self.scale_end = clamp_min("scaleEnd", self.scale_end, 0.0)?;
        self.scale_end_randomness = clamp_min("scaleEndRandomness", self.scale_end_randomness, 0.0)?;
        self.frame_rate = clamp_min("frameRate", self.frame_rate, 0.0)?;
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
        self.scale_start = clamp_min("scaleStart", self.scale_start, 0.0)?;
        self.scale_start_randomness =
            clamp_min("scaleStartRandomness", self.scale_start_randomness, 0.0)?;
        self.wobble_amplitude = clamp_min("wobbleAmplitude", self.wobble_amplitude, 0.0)?;
        self.wobble_amplitude_randomness =
            clamp_min("wobbleAmplitudeRandomness", self.wobble_amplitude_randomness, 0.0)?;
        self.wobble_frequency = clamp_min("wobbleFrequency", self.wobble_frequency, 0.0)?;
        self.wobble_frequency_randomness =
            clamp_min("wobbleFrequencyRandomness", self.wobble_frequency_randomness, 0.0)?;
        self.x_offset_randomness = clamp_min("xOffsetRandomness", self.x_offset_randomness, 0.0)?;
        valid_easing("yEasing", &self.y_easing)?;
        self.y_end = finite("yEnd", self.y_end)?;
        self.y_randomness = clamp_min("yRandomness", self.y_randomness, 0.0)?;
        self.y_start = finite("yStart", self.y_start)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_build_empty_is_defaults() {
        let config = BubbleConfig::build(&BubbleOverrides::default()).unwrap();
        assert_eq!(config, BubbleConfig::default());
    }

    #[test]
    fn test_opacity_above_one_fails() {
        let overrides = BubbleOverrides {
            opacity_end: Some(2.0),
            ..Default::default()
        };
        let err = BubbleConfig::build(&overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field: "opacityEnd", .. }));
    }

    #[test]
    fn test_negative_randomness_clamped() {
        let overrides = BubbleOverrides {
            y_randomness: Some(-50.0),
            duration_ms: Some(-1.0),
            ..Default::default()
        };
        let config = BubbleConfig::build(&overrides).unwrap();
        assert_eq!(config.y_randomness, 0.0);
        assert_eq!(config.duration_ms, 0.0);
    }

    #[test]
    fn test_inverted_interval_fails() {
        let overrides = BubbleOverrides {
            min_spawn_interval_ms: Some(900.0),
            max_spawn_interval_ms: Some(100.0),
            ..Default::default()
        };
        let err = BubbleConfig::build(&overrides).unwrap_err();
        assert_eq!(err.field(), Some("minSpawnIntervalMs"));
    }

    #[test]
    fn test_empty_components_fails() {
        let overrides = BubbleOverrides {
            components: Some(Vec::new()),
            ..Default::default()
        };
        assert!(BubbleConfig::build(&overrides).is_err());
    }

    #[test]
    fn test_overrides_from_camel_case_json() {
        let overrides: BubbleOverrides =
            serde_json::from_str(r#"{"opacityStart": 0.5, "yEnd": 40}"#).unwrap();
        let config = BubbleConfig::build(&overrides).unwrap();
        assert_eq!(config.opacity_start, 0.5);
        assert_eq!(config.y_end, 40.0);
        assert_eq!(config.duration_ms, 1500.0);
    }
}

//! Flywheel physics configuration

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{Schema, clamp_min, clamp_range, control_at_least, positive, within};
use crate::error::Result;
use crate::numeric::NumericControl;

/// Which way a positive angular velocity turns on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

impl SpinDirection {
    /// Apply the direction to an internal (always positive-going) angle
    pub fn apply(&self, angle: f32) -> f32 {
        match self {
            SpinDirection::Clockwise => angle,
            SpinDirection::Counterclockwise => -angle,
        }
    }
}

/// Rotational state machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationConfig {
    /// Exponential decay rate of angular velocity per second, in [0, 1]
    pub damping_coefficient: f32,
    /// Angle the spinner rests at, in [0, 2π]
    pub initial_angle: f32,
    /// Velocity the spinner rests at (rad/s)
    pub initial_angular_velocity: f32,
    /// Velocity ceiling (rad/s). Fixed for the lifetime of a spinner.
    pub max_angular_velocity: f32,
    pub direction: SpinDirection,
    /// Velocity added by each energy injection (rad/s)
    pub energy_per_click: NumericControl,
    /// Publish rate of the rotation snapshot (0 = every frame)
    pub frame_rate: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            damping_coefficient: 0.5,
            initial_angle: 0.0,
            initial_angular_velocity: 0.0,
            max_angular_velocity: TAU * 10.0,
            direction: SpinDirection::Clockwise,
            energy_per_click: NumericControl::fixed(TAU * 0.9),
            frame_rate: 60.0,
        }
    }
}

config_overrides! {
    /// Partial [`RotationConfig`]
    RotationOverrides for RotationConfig {
        damping_coefficient: f32,
        initial_angle: f32,
        initial_angular_velocity: f32,
        max_angular_velocity: f32,
        direction: SpinDirection,
        energy_per_click: NumericControl,
        frame_rate: f32,
    }
}

impl Schema for RotationConfig {
    type Overrides = RotationOverrides;

    fn merge(&mut self, overrides: &RotationOverrides) {
        overrides.apply_to(self);
    }

    fn validate(mut self) -> Result<Self> {
        self.damping_coefficient = within("dampingCoefficient", self.damping_coefficient, 0.0, 1.0)?;
        self.initial_angle = clamp_range("initialAngle", self.initial_angle, 0.0, TAU)?;
        self.initial_angular_velocity =
            clamp_min("initialAngularVelocity", self.initial_angular_velocity, 0.0)?;
        self.max_angular_velocity = positive("maxAngularVelocity", self.max_angular_velocity)?;
        control_at_least("energyPerClick", &self.energy_per_click, 0.0)?;
        self.frame_rate = clamp_min("frameRate", self.frame_rate, 0.0)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{VariationType, VariationUnit};

    #[test]
    fn test_build_empty_is_defaults() {
        let config = RotationConfig::build(&RotationOverrides::default()).unwrap();
        assert_eq!(config, RotationConfig::default());
    }

    #[test]
    fn test_damping_out_of_range_fails() {
        let overrides = RotationOverrides {
            damping_coefficient: Some(1.5),
            ..Default::default()
        };
        let err = RotationConfig::build(&overrides).unwrap_err();
        assert_eq!(err.field(), Some("dampingCoefficient"));
    }

    #[test]
    fn test_initial_angle_clamped() {
        let overrides = RotationOverrides {
            initial_angle: Some(10.0),
            initial_angular_velocity: Some(-3.0),
            ..Default::default()
        };
        let config = RotationConfig::build(&overrides).unwrap();
        assert_eq!(config.initial_angle, TAU);
        assert_eq!(config.initial_angular_velocity, 0.0);
    }

    #[test]
    fn test_zero_max_velocity_fails() {
        let overrides = RotationOverrides {
            max_angular_velocity: Some(0.0),
            ..Default::default()
        };
        assert!(RotationConfig::build(&overrides).is_err());
    }

    #[test]
    fn test_energy_must_stay_non_negative() {
        let overrides = RotationOverrides {
            energy_per_click: Some(NumericControl::varied(
                1.0,
                VariationType::Minus,
                VariationUnit::Absolute,
                2.0,
            )),
            ..Default::default()
        };
        let err = RotationConfig::build(&overrides).unwrap_err();
        assert_eq!(err.field(), Some("energyPerClick"));
    }

    #[test]
    fn test_direction_applies_sign() {
        assert_eq!(SpinDirection::Clockwise.apply(1.0), 1.0);
        assert_eq!(SpinDirection::Counterclockwise.apply(1.0), -1.0);
    }
}

//! Velocity breakpoints
//!
//! A breakpoint swaps in a bundle of configs once the spinner's velocity,
//! as a fraction of its maximum, reaches the breakpoint's threshold.

use serde::{Deserialize, Serialize};

use super::{
    BaseConfigs, BubbleConfig, BubbleOverrides, ResetConfig, ResetOverrides, RotationConfig,
    RotationOverrides, ScaleConfig, ScaleOverrides, Schema, SparkConfig, SparkOverrides, within,
};
use crate::error::Result;

/// Caller-supplied overrides for one breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BreakpointOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubble: Option<BubbleOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark: Option<SparkOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<ResetOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationOverrides>,
}

/// One breakpoint as accepted from JSON: `{ "breakpoint": 0.7, "config": { ... } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BreakpointInput {
    pub breakpoint: f32,
    #[serde(default)]
    pub config: BreakpointOverrides,
}

impl BreakpointInput {
    pub fn new(breakpoint: f32, config: BreakpointOverrides) -> Self {
        Self { breakpoint, config }
    }

    fn scale(breakpoint: f32, scale: f32) -> Self {
        Self::new(
            breakpoint,
            BreakpointOverrides {
                scale: Some(ScaleOverrides {
                    scale: Some(scale),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
    }
}

/// Fully resolved configs applied while a breakpoint is active
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointBundle {
    pub scale: ScaleConfig,
    pub bubble: BubbleConfig,
    pub spark: SparkConfig,
    pub reset: ResetConfig,
    pub rotation: RotationConfig,
}

impl BreakpointBundle {
    /// Layer `overrides` onto the caller's base configs
    pub fn build(overrides: &BreakpointOverrides, base: &BaseConfigs) -> Result<Self> {
        let mut rotation = match &overrides.rotation {
            Some(rotation) => RotationConfig::build_on(&base.rotation, rotation)?,
            None => base.rotation.clone(),
        };
        if rotation.max_angular_velocity != base.rotation.max_angular_velocity {
            log::warn!(
                "breakpoint maxAngularVelocity {} ignored, keeping {}",
                rotation.max_angular_velocity,
                base.rotation.max_angular_velocity
            );
            rotation.max_angular_velocity = base.rotation.max_angular_velocity;
        }

        Ok(Self {
            scale: layer(&base.scale, &overrides.scale)?,
            bubble: layer(&base.bubble, &overrides.bubble)?,
            spark: layer(&base.spark, &overrides.spark)?,
            reset: layer(&base.reset, &overrides.reset)?,
            rotation,
        })
    }
}

fn layer<C: Schema>(base: &C, overrides: &Option<C::Overrides>) -> Result<C> {
    match overrides {
        Some(overrides) => C::build_on(base, overrides),
        None => Ok(base.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VelocityBreakpoint {
    /// Fraction of the maximum angular velocity, in [0, 1]
    pub threshold: f32,
    pub config: BreakpointBundle,
}

/// Resolved breakpoints, sorted by descending threshold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VelocityBreakpoints {
    entries: Vec<VelocityBreakpoint>,
}

impl VelocityBreakpoints {
    pub fn build(inputs: &[BreakpointInput], base: &BaseConfigs) -> Result<Self> {
        let mut entries = inputs
            .iter()
            .map(|input| {
                Ok(VelocityBreakpoint {
                    threshold: within("breakpoint", input.breakpoint, 0.0, 1.0)?,
                    config: BreakpointBundle::build(&input.config, base)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VelocityBreakpoint> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[VelocityBreakpoint] {
        &self.entries
    }

    /// The breakpoint in effect at `fraction` of the maximum velocity
    pub fn resolve(&self, fraction: f32) -> Option<&VelocityBreakpoint> {
        resolve_breakpoint(&self.entries, fraction)
    }
}

/// Highest breakpoint whose threshold is at or below `fraction`
///
/// Works on unsorted input; with a descending list it is the first match.
pub fn resolve_breakpoint(
    breakpoints: &[VelocityBreakpoint],
    fraction: f32,
) -> Option<&VelocityBreakpoint> {
    breakpoints
        .iter()
        .filter(|b| b.threshold <= fraction)
        .fold(None, |best: Option<&VelocityBreakpoint>, b| match best {
            Some(current) if current.threshold >= b.threshold => Some(current),
            _ => Some(b),
        })
}

/// Breakpoints used when the caller supplies none
pub fn default_inputs() -> Vec<BreakpointInput> {
    vec![
        BreakpointInput::scale(0.9, 3.0),
        BreakpointInput::scale(0.7, 2.0),
        BreakpointInput::scale(0.3, 1.5),
    ]
}

//! Configuration builders and layering
//!
//! Every domain config has three tiers:
//! - declared defaults (`Default` impl),
//! - caller overrides merged onto the defaults (the *base*),
//! - an optional breakpoint overlay that temporarily replaces the base.
//!
//! Builders shallow-merge an overrides struct onto the defaults and validate
//! the result. Lower bounds of `>= 0` are coerced (clamped) with a warning;
//! every other constraint is a hard [`ConfigError`].

/// Generates a partial-overrides struct for a config type
///
/// Every field is optional, keys are camelCase and unknown keys are rejected.
macro_rules! config_overrides {
    (
        $(#[$meta:meta])*
        $name:ident for $config:ident {
            $($field:ident: $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default, rename_all = "camelCase", deny_unknown_fields)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            /// Copy every set field onto `config`
            pub fn apply_to(&self, config: &mut $config) {
                $(
                    if let Some(value) = &self.$field {
                        config.$field = value.clone();
                    }
                )*
            }
        }
    };
}

pub mod breakpoints;
pub mod bubble;
pub mod reset;
pub mod rotation;
pub mod scale;
pub mod spark;

pub use breakpoints::{
    BreakpointBundle, BreakpointInput, BreakpointOverrides, VelocityBreakpoint,
    VelocityBreakpoints, resolve_breakpoint,
};
pub use bubble::{BubbleConfig, BubbleOverrides};
pub use reset::{ResetConfig, ResetOverrides};
pub use rotation::{RotationConfig, RotationOverrides, SpinDirection};
pub use scale::{ScaleConfig, ScaleOverrides};
pub use spark::{SparkConfig, SparkOverrides};

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{ConfigError, Result};
use crate::numeric::NumericControl;

/// A validated, fully resolved configuration type
pub trait Schema: Clone + Default {
    type Overrides;

    /// Shallow-merge `overrides` onto `self`
    fn merge(&mut self, overrides: &Self::Overrides);

    /// Check every field constraint, applying documented clamps
    fn validate(self) -> Result<Self>;

    /// Defaults + overrides, validated
    fn build(overrides: &Self::Overrides) -> Result<Self> {
        Self::build_on(&Self::default(), overrides)
    }

    /// `base` + overrides, validated
    fn build_on(base: &Self, overrides: &Self::Overrides) -> Result<Self> {
        let mut config = base.clone();
        config.merge(overrides);
        config.validate()
    }
}

/// Clamp `value` up to `min`, rejecting non-finite numbers
pub(crate) fn clamp_min(field: &'static str, value: f32, min: f32) -> Result<f32> {
    finite(field, value)?;
    if value < min {
        log::warn!("{} = {} is below {}, clamping", field, value, min);
        return Ok(min);
    }
    Ok(value)
}

/// Clamp `value` into `[min, max]`, rejecting non-finite numbers
pub(crate) fn clamp_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<f32> {
    finite(field, value)?;
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{} = {} is outside [{}, {}], clamping", field, value, min, max);
    }
    Ok(clamped)
}

/// Require `value` to lie in `[min, max]`
pub(crate) fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<f32> {
    finite(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(ConfigError::validation(
            field,
            format!("must be within [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(value)
}

/// Require `value` to be strictly positive
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::validation(
            field,
            format!("must be greater than 0, got {}", value),
        ));
    }
    Ok(value)
}

pub(crate) fn finite(field: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(ConfigError::validation(field, "must be a finite number"));
    }
    Ok(value)
}

pub(crate) fn valid_easing(field: &'static str, easing: &Easing) -> Result<()> {
    easing
        .check()
        .map_err(|reason| ConfigError::validation(field, reason))
}

pub(crate) fn non_empty<T>(field: &'static str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Require a numeric control to never resolve below `min`
pub(crate) fn control_at_least(field: &'static str, control: &NumericControl, min: f32) -> Result<()> {
    if !control.is_finite() {
        return Err(ConfigError::validation(field, "must be a finite number"));
    }
    let (low, _) = control.bounds();
    if low < min {
        return Err(ConfigError::validation(
            field,
            format!("must never resolve below {}, lower bound is {}", min, low),
        ));
    }
    Ok(())
}

/// Require `low_field <= high_field`
pub(crate) fn ordered(
    low_field: &'static str,
    low: f32,
    high_field: &'static str,
    high: f32,
) -> Result<()> {
    if low > high {
        return Err(ConfigError::validation(
            low_field,
            format!("must not exceed {} ({} > {})", high_field, low, high),
        ));
    }
    Ok(())
}

/// Base config plus an optional overlay that temporarily replaces it
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLayers<C> {
    base: C,
    overlay: Option<C>,
}

impl<C> ConfigLayers<C> {
    pub fn new(base: C) -> Self {
        Self {
            base,
            overlay: None,
        }
    }

    /// The config currently in effect
    pub fn active(&self) -> &C {
        self.overlay.as_ref().unwrap_or(&self.base)
    }

    pub fn base(&self) -> &C {
        &self.base
    }

    /// Replace the base (hot reconfiguration). An overlay stays in effect.
    pub fn set_base(&mut self, base: C) {
        self.base = base;
    }

    pub fn set_overlay(&mut self, overlay: C) {
        self.overlay = Some(overlay);
    }

    /// Drop the overlay, returning to the base
    pub fn clear_overlay(&mut self) -> Option<C> {
        self.overlay.take()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

impl<C: Default> Default for ConfigLayers<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

/// Every caller override for one spinner, as accepted from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SpinnerOptions {
    pub rotation: RotationOverrides,
    pub scale: ScaleOverrides,
    pub reset: ResetOverrides,
    pub bubble: BubbleOverrides,
    pub spark: SparkOverrides,
    /// `None` uses the default breakpoints; an empty list disables them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<BreakpointInput>>,
}

impl SpinnerOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build every base config and the breakpoints layered on top of them
    pub fn build(&self) -> Result<SpinnerConfigs> {
        let base = BaseConfigs {
            rotation: RotationConfig::build(&self.rotation)?,
            scale: ScaleConfig::build(&self.scale)?,
            reset: ResetConfig::build(&self.reset)?,
            bubble: BubbleConfig::build(&self.bubble)?,
            spark: SparkConfig::build(&self.spark)?,
        };
        let breakpoints = match &self.breakpoints {
            Some(inputs) => VelocityBreakpoints::build(inputs, &base)?,
            None => VelocityBreakpoints::build(&breakpoints::default_inputs(), &base)?,
        };
        Ok(SpinnerConfigs { base, breakpoints })
    }
}

/// The caller's validated base configs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseConfigs {
    pub rotation: RotationConfig,
    pub scale: ScaleConfig,
    pub reset: ResetConfig,
    pub bubble: BubbleConfig,
    pub spark: SparkConfig,
}

/// Everything a spinner needs, fully resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerConfigs {
    pub base: BaseConfigs,
    pub breakpoints: VelocityBreakpoints,
}

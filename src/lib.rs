//! Fidget Spin - physics, particle and configuration core of an interactive
//! fidget spinner widget
//!
//! Core modules:
//! - `spinner`: Rotational state machine, scale reaction and the widget itself
//! - `particles`: Generic particle spawner with bubble and spark styles
//! - `config`: Validated config builders, layering and velocity breakpoints
//! - `easing`: Cubic-bezier easing evaluator
//! - `numeric`: Randomized numeric controls
//! - `throttle`: Frame-rate publish gate

pub mod config;
pub mod easing;
pub mod error;
pub mod numeric;
pub mod particles;
pub mod spinner;
pub mod throttle;

pub use config::{SpinnerConfigs, SpinnerOptions};
pub use easing::{BezierCurve, Easing};
pub use error::{ConfigError, Result};
pub use numeric::NumericControl;
pub use particles::{ParticleId, ParticleKind, ParticleView};
pub use spinner::{FidgetSpinner, RotationPhase, SpinnerEvent, SpinnerSnapshot};

/// Physics tuning constants
pub mod consts {
    /// Below this angular velocity (rad/s) a spinning spinner starts resetting
    pub const STOP_VELOCITY: f32 = 2.0;
    /// Angular velocity (rad/s) under which damping is boosted
    pub const LOW_SPEED_THRESHOLD: f32 = 15.0;
    /// Damping multiplier applied below [`LOW_SPEED_THRESHOLD`]
    pub const LOW_SPEED_DAMPING_MULTIPLIER: f32 = 6.0;
}

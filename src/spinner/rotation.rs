//! Rotational state machine
//!
//! Idle → Spinning on energy input, Spinning → Resetting once damping has
//! slowed the flywheel below [`STOP_VELOCITY`], Resetting → Idle when the
//! eased return to rest completes. Energy during a reset cancels it.

use std::f32::consts::TAU;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::SpinnerEvent;
use crate::config::{ConfigLayers, ResetConfig, RotationConfig, VelocityBreakpoint, VelocityBreakpoints};
use crate::consts::{LOW_SPEED_DAMPING_MULTIPLIER, LOW_SPEED_THRESHOLD, STOP_VELOCITY};
use crate::easing::BezierCurve;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationPhase {
    /// At rest, nothing to animate
    Idle,
    /// Free spin under exponential damping
    Spinning,
    /// Easing back to the rest angle
    Resetting { started_at_ms: f64, start_angle: f32 },
}

/// Breakpoint transition produced by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum BreakpointChange {
    /// A (different) breakpoint now applies
    Entered(VelocityBreakpoint),
    /// The previously applied breakpoint no longer does
    Exited,
}

/// Reset parameters frozen when a reset begins
#[derive(Debug, Clone, Copy)]
struct ResetPlan {
    duration_ms: f32,
    curve: BezierCurve,
}

#[derive(Debug, Clone)]
pub struct RotationMachine {
    rotation: ConfigLayers<RotationConfig>,
    reset: ConfigLayers<ResetConfig>,
    breakpoints: VelocityBreakpoints,
    /// Fixed for the lifetime of the machine
    max_angular_velocity: f32,
    angle: f32,
    velocity: f32,
    phase: RotationPhase,
    reset_plan: Option<ResetPlan>,
    /// Threshold of the breakpoint currently applied
    active_breakpoint: Option<f32>,
    last_tick_ms: Option<f64>,
    rng: Pcg32,
}

impl RotationMachine {
    pub fn new(
        rotation: RotationConfig,
        reset: ResetConfig,
        breakpoints: VelocityBreakpoints,
        seed: u64,
    ) -> Self {
        Self {
            max_angular_velocity: rotation.max_angular_velocity,
            angle: rotation.initial_angle,
            velocity: rotation.initial_angular_velocity,
            rotation: ConfigLayers::new(rotation),
            reset: ConfigLayers::new(reset),
            breakpoints,
            phase: RotationPhase::Idle,
            reset_plan: None,
            active_breakpoint: None,
            last_tick_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Angle as displayed, with the configured spin direction applied
    pub fn display_angle(&self) -> f32 {
        self.rotation.active().direction.apply(self.angle)
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn max_angular_velocity(&self) -> f32 {
        self.max_angular_velocity
    }

    /// Velocity as a fraction of the maximum
    pub fn velocity_fraction(&self) -> f32 {
        self.velocity.abs() / self.max_angular_velocity
    }

    pub fn phase(&self) -> RotationPhase {
        self.phase
    }

    /// Spinning or resetting
    pub fn is_active(&self) -> bool {
        self.phase != RotationPhase::Idle
    }

    pub fn config(&self) -> &RotationConfig {
        self.rotation.active()
    }

    pub fn reset_config(&self) -> &ResetConfig {
        self.reset.active()
    }

    pub fn breakpoints(&self) -> &VelocityBreakpoints {
        &self.breakpoints
    }

    /// Threshold of the breakpoint currently applied
    pub fn active_breakpoint(&self) -> Option<f32> {
        self.active_breakpoint
    }

    /// Replace the base configs. The max velocity stays fixed.
    pub fn set_base(&mut self, mut rotation: RotationConfig, reset: ResetConfig) {
        rotation.max_angular_velocity = self.max_angular_velocity;
        self.rotation.set_base(rotation);
        self.reset.set_base(reset);
    }

    pub fn set_breakpoints(&mut self, breakpoints: VelocityBreakpoints) {
        self.breakpoints = breakpoints;
    }

    /// Inject one click's worth of energy
    pub fn add_energy(&mut self, events: &mut Vec<SpinnerEvent>) {
        if let RotationPhase::Resetting { .. } = self.phase {
            log::info!("reset cancelled at angle {:.3}", self.angle);
            self.reset_plan = None;
            events.push(SpinnerEvent::ResetCancel);
        }
        let energy = self.rotation.active().energy_per_click.resolve(&mut self.rng);
        self.velocity += energy;
        if self.phase != RotationPhase::Spinning {
            log::info!("spinning up");
        }
        self.phase = RotationPhase::Spinning;
    }

    /// Advance to `now_ms`, returning a breakpoint transition if one occurred
    pub fn tick(&mut self, now_ms: f64, events: &mut Vec<SpinnerEvent>) -> Option<BreakpointChange> {
        let dt = match self.last_tick_ms {
            Some(last) => ((now_ms - last).max(0.0) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);

        match self.phase {
            RotationPhase::Idle => None,
            RotationPhase::Spinning => self.spin(dt, now_ms, events),
            RotationPhase::Resetting {
                started_at_ms,
                start_angle,
            } => self.return_to_rest(now_ms, started_at_ms, start_angle, events),
        }
    }

    fn spin(&mut self, dt: f32, now_ms: f64, events: &mut Vec<SpinnerEvent>) -> Option<BreakpointChange> {
        let config = self.rotation.active();
        let damping = if self.velocity < LOW_SPEED_THRESHOLD {
            config.damping_coefficient * LOW_SPEED_DAMPING_MULTIPLIER
        } else {
            config.damping_coefficient
        };
        let velocity = (self.velocity * (-damping * dt).exp()).min(self.max_angular_velocity);
        if velocity == self.max_angular_velocity {
            events.push(SpinnerEvent::MaxAngularVelocity);
        }
        self.velocity = velocity;
        self.angle = (self.angle + velocity * dt) % TAU;

        let change = self.evaluate_breakpoints();

        if velocity < STOP_VELOCITY {
            let reset = self.reset.active();
            log::info!(
                "velocity {:.2} below {}, resetting over {} ms",
                velocity,
                STOP_VELOCITY,
                reset.duration_ms
            );
            self.reset_plan = Some(ResetPlan {
                duration_ms: reset.duration_ms,
                curve: reset.easing.curve(),
            });
            self.phase = RotationPhase::Resetting {
                started_at_ms: now_ms,
                start_angle: self.angle,
            };
            events.push(SpinnerEvent::ResetStart);
        }
        change
    }

    fn evaluate_breakpoints(&mut self) -> Option<BreakpointChange> {
        let current = self.breakpoints.resolve(self.velocity_fraction());
        match current {
            Some(breakpoint) if Some(breakpoint.threshold) != self.active_breakpoint => {
                let breakpoint = breakpoint.clone();
                log::info!("entered velocity breakpoint {}", breakpoint.threshold);
                self.active_breakpoint = Some(breakpoint.threshold);
                self.rotation.set_overlay(breakpoint.config.rotation.clone());
                self.reset.set_overlay(breakpoint.config.reset.clone());
                Some(BreakpointChange::Entered(breakpoint))
            }
            None if self.active_breakpoint.is_some() => Some(self.exit_breakpoint()),
            _ => None,
        }
    }

    fn exit_breakpoint(&mut self) -> BreakpointChange {
        log::info!("left velocity breakpoint {:?}", self.active_breakpoint);
        self.active_breakpoint = None;
        self.rotation.clear_overlay();
        self.reset.clear_overlay();
        BreakpointChange::Exited
    }

    fn return_to_rest(
        &mut self,
        now_ms: f64,
        started_at_ms: f64,
        start_angle: f32,
        events: &mut Vec<SpinnerEvent>,
    ) -> Option<BreakpointChange> {
        let plan = match self.reset_plan {
            Some(plan) => plan,
            None => {
                let reset = self.reset.active();
                ResetPlan {
                    duration_ms: reset.duration_ms,
                    curve: reset.easing.curve(),
                }
            }
        };
        let elapsed = (now_ms - started_at_ms).max(0.0);
        let progress = if plan.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / plan.duration_ms as f64).min(1.0) as f32
        };

        if progress >= 1.0 {
            let config = self.rotation.active();
            self.angle = config.initial_angle;
            self.velocity = config.initial_angular_velocity;
            self.phase = RotationPhase::Idle;
            self.reset_plan = None;
            events.push(SpinnerEvent::ResetEnd);
            log::info!("reset complete");
            return self
                .active_breakpoint
                .is_some()
                .then(|| self.exit_breakpoint());
        }

        let target = if start_angle < 0.0 { -TAU } else { 0.0 };
        self.angle = start_angle + (target - start_angle) * plan.curve.evaluate(progress);
        None
    }
}

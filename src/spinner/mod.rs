//! The spinner widget: rotation, scale reaction and both particle spawners
//! driven from one host frame clock
//!
//! Per tick, in order:
//! 1. rotation physics and breakpoint evaluation (a transition pushes the
//!    breakpoint's configs into the scale machine and both spawners),
//! 2. the scale transition,
//! 3. the bubble spawner,
//! 4. the spark spawner,
//! 5. a throttled snapshot publish.

mod rotation;
mod scale;

pub use rotation::{BreakpointChange, RotationMachine, RotationPhase};
pub use scale::{ScaleReaction, ScaleTransition};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{
    BaseConfigs, BubbleConfig, SparkConfig, SpinnerConfigs, SpinnerOptions, VelocityBreakpoints,
};
use crate::error::Result;
use crate::particles::{ParticleId, ParticleKind, Spawner};
use crate::throttle::FrameGate;

/// Notifications queued during a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum SpinnerEvent {
    Spawn { kind: ParticleKind, id: ParticleId },
    Remove { kind: ParticleKind, id: ParticleId },
    ScaleStart,
    /// Target scale of the transition that just started
    ScaleChange(f32),
    ScaleEnd,
    ResetStart,
    ResetEnd,
    ResetCancel,
    MaxAngularVelocity,
}

/// Published rotation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinnerSnapshot {
    /// Radians, with the spin direction applied
    pub angle: f32,
    pub scale: f32,
    pub angular_velocity: f32,
    pub phase: RotationPhase,
}

/// One interactive spinner
#[derive(Debug, Clone)]
pub struct FidgetSpinner {
    rotation: RotationMachine,
    scale: ScaleReaction,
    bubbles: Spawner<BubbleConfig>,
    sparks: Spawner<SparkConfig>,
    events: Vec<SpinnerEvent>,
    snapshot: SpinnerSnapshot,
    gate: FrameGate,
}

impl FidgetSpinner {
    /// Spinner seeded from the thread RNG
    pub fn new(configs: SpinnerConfigs) -> Self {
        Self::with_seed(configs, rand::rng().random())
    }

    /// Reproducible spinner: the same seed and inputs give the same run
    pub fn with_seed(configs: SpinnerConfigs, seed: u64) -> Self {
        let mut seeder = Pcg32::seed_from_u64(seed);
        let SpinnerConfigs { base, breakpoints } = configs;
        let BaseConfigs {
            rotation,
            scale,
            reset,
            bubble,
            spark,
        } = base;

        let gate = FrameGate::new(rotation.frame_rate);
        let rotation = RotationMachine::new(rotation, reset, breakpoints, seeder.random());
        let scale = ScaleReaction::new(scale);
        let mut bubbles = Spawner::new(bubble, seeder.random());
        let mut sparks = Spawner::new(spark, seeder.random());
        // Spawning follows the rotation, not the standalone `active` flags
        bubbles.set_active(false);
        sparks.set_active(false);

        let snapshot = SpinnerSnapshot {
            angle: rotation.display_angle(),
            scale: scale.current(),
            angular_velocity: rotation.velocity(),
            phase: rotation.phase(),
        };
        Self {
            rotation,
            scale,
            bubbles,
            sparks,
            events: Vec::new(),
            snapshot,
            gate,
        }
    }

    pub fn from_options(options: &SpinnerOptions) -> Result<Self> {
        Ok(Self::new(options.build()?))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_options(&SpinnerOptions::from_json(json)?)
    }

    /// Swap in new base configs and breakpoints without resetting state
    ///
    /// A breakpoint overlay in effect stays until the next transition.
    pub fn reconfigure(&mut self, options: &SpinnerOptions) -> Result<()> {
        let SpinnerConfigs { base, breakpoints } = options.build()?;
        log::info!("reconfigured with {} breakpoints", breakpoints.len());
        self.rotation.set_base(base.rotation, base.reset);
        self.rotation.set_breakpoints(breakpoints);
        self.scale.set_base(base.scale);
        self.bubbles.set_base(base.bubble);
        self.sparks.set_base(base.spark);
        self.gate.set_frame_rate(self.rotation.config().frame_rate);
        Ok(())
    }

    /// User input: one click's worth of energy
    pub fn add_energy(&mut self, now_ms: f64) {
        self.rotation.add_energy(&mut self.events);
        self.sync_spawners();
        self.publish(now_ms, true);
    }

    /// Advance every component to `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        let phase = self.rotation.phase();
        let mark = self.events.len();
        if let Some(change) = self.rotation.tick(now_ms, &mut self.events) {
            self.apply_breakpoint(change, now_ms);
        }
        self.scale.tick(now_ms, &mut self.events);

        self.sync_spawners();
        self.bubbles.tick(now_ms, &mut self.events);
        self.sparks.tick(now_ms, &mut self.events);

        let phase_changed = !same_phase(phase, self.rotation.phase());
        let scale_settled = self.events[mark..].contains(&SpinnerEvent::ScaleEnd);
        self.publish(now_ms, phase_changed || scale_settled);
    }

    fn apply_breakpoint(&mut self, change: BreakpointChange, now_ms: f64) {
        match change {
            BreakpointChange::Entered(breakpoint) => {
                let bundle = breakpoint.config;
                let target = bundle.scale.scale;
                self.scale.set_overlay(bundle.scale);
                self.scale.start_scaling(target, now_ms, &mut self.events);
                self.bubbles.set_overlay(bundle.bubble);
                self.sparks.set_overlay(bundle.spark);
            }
            BreakpointChange::Exited => {
                self.scale.clear_overlay();
                self.bubbles.clear_overlay();
                self.sparks.clear_overlay();
                let target = self.scale.base().scale;
                self.scale.start_scaling(target, now_ms, &mut self.events);
            }
        }
        self.gate.set_frame_rate(self.rotation.config().frame_rate);
    }

    fn sync_spawners(&mut self) {
        let active = self.rotation.is_active();
        self.bubbles.set_active(active);
        self.sparks.set_active(active);
    }

    fn publish(&mut self, now_ms: f64, force: bool) {
        if force {
            self.gate.force(now_ms);
        } else if !self.gate.admit(now_ms) {
            return;
        }
        self.snapshot = SpinnerSnapshot {
            angle: self.rotation.display_angle(),
            scale: self.scale.current(),
            angular_velocity: self.rotation.velocity(),
            phase: self.rotation.phase(),
        };
    }

    /// Last published rotation state
    pub fn snapshot(&self) -> SpinnerSnapshot {
        self.snapshot
    }

    /// Take every event queued since the previous drain
    pub fn drain_events(&mut self) -> Vec<SpinnerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn rotation(&self) -> &RotationMachine {
        &self.rotation
    }

    pub fn scale(&self) -> &ScaleReaction {
        &self.scale
    }

    pub fn bubbles(&self) -> &Spawner<BubbleConfig> {
        &self.bubbles
    }

    pub fn sparks(&self) -> &Spawner<SparkConfig> {
        &self.sparks
    }

    pub fn breakpoints(&self) -> &VelocityBreakpoints {
        self.rotation.breakpoints()
    }
}

fn same_phase(a: RotationPhase, b: RotationPhase) -> bool {
    std::mem::discriminant(&a) == std::mem::discriminant(&b)
}

//! Particle spawner engine
//!
//! One generic [`Spawner`] drives both particle styles. The style-specific
//! part (how a new particle is drawn from a config) lives behind the
//! [`Emitter`] trait, implemented by [`BubbleConfig`](crate::config::BubbleConfig)
//! and [`SparkConfig`](crate::config::SparkConfig).

mod bubble;
mod particle;
mod spark;
mod spawner;

pub use particle::Particle;
pub use spawner::{Spawner, SpawnerState};

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::config::Schema;
use crate::easing::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Bubble,
    Spark,
}

impl ParticleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::Bubble => "bubble",
            ParticleKind::Spark => "spark",
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique per spawner; displayed as `bubble-3`, `spark-12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ParticleId {
    pub kind: ParticleKind,
    pub seq: u64,
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.seq)
    }
}

/// Horizontal sway of a bubble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    pub amplitude: f32,
    /// Base frequency in Hz
    pub frequency: f32,
}

impl Wobble {
    /// Sum of three incommensurate harmonics, `elapsed_ms` since spawn
    pub fn offset(&self, elapsed_ms: f64) -> f32 {
        let t = (elapsed_ms / 1000.0) as f32;
        let f = self.frequency;
        self.amplitude
            * (0.6 * (2.0 * PI * f * t).sin()
                + 0.4 * (3.7 * PI * f * t).cos()
                + 0.2 * (5.3 * PI * f * t).sin())
    }
}

/// How eased `position` maps onto the plane (+y is up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Rise along y while swaying around `x_offset`
    Drift { x_offset: f32, wobble: Wobble },
    /// Fly outward from the origin at a fixed angle
    Radiate { angle: f32 },
}

impl Motion {
    pub fn place(&self, position: f32, elapsed_ms: f64) -> Vec2 {
        match *self {
            Motion::Drift { x_offset, wobble } => {
                Vec2::new(wobble.offset(elapsed_ms) + x_offset, position)
            }
            Motion::Radiate { angle } => Vec2::from_angle(angle) * position,
        }
    }
}

/// The three animated channels of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleValues {
    /// Distance travelled along the motion path
    pub position: f32,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleEasings {
    pub position: Easing,
    pub scale: Easing,
    pub opacity: Easing,
}

/// Everything a particle needs, drawn once at spawn and then frozen
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub duration_ms: f32,
    pub start: ParticleValues,
    pub end: ParticleValues,
    pub easings: ParticleEasings,
    pub motion: Motion,
    pub content: String,
    /// Publish rate of the particle's view (0 = every tick)
    pub frame_rate: f32,
}

/// Result of one spawn: the particle plus the wait until the next spawn
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub next_interval_ms: f64,
    pub blueprint: Blueprint,
}

/// Published visible state of a particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub position: Vec2,
    pub scale: f32,
    pub opacity: f32,
}

/// A particle style: turns its config into new particles
pub trait Emitter: Schema {
    const KIND: ParticleKind;

    /// Whether a standalone spawner starts active
    fn active(&self) -> bool;

    /// Wait before the first spawn once the spawn clock starts
    fn initial_interval_ms(&self) -> f64;

    fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Emission;
}

/// Uniform pick from a config's `components`
pub(crate) fn pick_component<R: Rng + ?Sized>(components: &[String], rng: &mut R) -> String {
    if components.is_empty() {
        return String::new();
    }
    components[rng.random_range(0..components.len())].clone()
}

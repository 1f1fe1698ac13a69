//! A single live particle

use glam::Vec2;

use super::{Blueprint, ParticleId, ParticleView};
use crate::easing::{BezierCurve, lerp};
use crate::throttle::FrameGate;

#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    spawned_at_ms: f64,
    blueprint: Blueprint,
    position_curve: BezierCurve,
    scale_curve: BezierCurve,
    opacity_curve: BezierCurve,
    progress: f32,
    view: ParticleView,
    gate: FrameGate,
}

impl Particle {
    pub fn new(id: ParticleId, blueprint: Blueprint, now_ms: f64) -> Self {
        let mut gate = FrameGate::new(blueprint.frame_rate);
        gate.force(now_ms);
        let view = ParticleView {
            position: blueprint.motion.place(blueprint.start.position, 0.0),
            scale: blueprint.start.scale,
            opacity: blueprint.start.opacity,
        };
        Self {
            id,
            spawned_at_ms: now_ms,
            position_curve: blueprint.easings.position.curve(),
            scale_curve: blueprint.easings.scale.curve(),
            opacity_curve: blueprint.easings.opacity.curve(),
            blueprint,
            progress: 0.0,
            view,
            gate,
        }
    }

    /// Advance to `now_ms`. Returns false once the animation has finished.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let elapsed = (now_ms - self.spawned_at_ms).max(0.0);
        self.progress = if self.blueprint.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.blueprint.duration_ms as f64).min(1.0) as f32
        };

        let finished = self.progress >= 1.0;
        if finished {
            self.gate.force(now_ms);
        } else if !self.gate.admit(now_ms) {
            return true;
        }

        let (start, end) = (&self.blueprint.start, &self.blueprint.end);
        let position = lerp(
            start.position,
            end.position,
            self.position_curve.evaluate(self.progress),
        );
        self.view = ParticleView {
            position: self.blueprint.motion.place(position, elapsed),
            scale: lerp(start.scale, end.scale, self.scale_curve.evaluate(self.progress)),
            opacity: lerp(
                start.opacity,
                end.opacity,
                self.opacity_curve.evaluate(self.progress),
            ),
        };
        !finished
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Last published visible state
    pub fn view(&self) -> ParticleView {
        self.view
    }

    pub fn position(&self) -> Vec2 {
        self.view.position
    }

    pub fn content(&self) -> &str {
        &self.blueprint.content
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::particles::{Motion, ParticleEasings, ParticleKind, ParticleValues};

    fn blueprint(duration_ms: f32, frame_rate: f32) -> Blueprint {
        Blueprint {
            duration_ms,
            start: ParticleValues {
                position: 0.0,
                scale: 1.0,
                opacity: 1.0,
            },
            end: ParticleValues {
                position: 100.0,
                scale: 2.0,
                opacity: 0.0,
            },
            easings: ParticleEasings {
                position: Easing::LINEAR,
                scale: Easing::LINEAR,
                opacity: Easing::LINEAR,
            },
            motion: Motion::Radiate { angle: 0.0 },
            content: "*".to_string(),
            frame_rate,
        }
    }

    fn id() -> ParticleId {
        ParticleId {
            kind: ParticleKind::Spark,
            seq: 0,
        }
    }

    #[test]
    fn test_progress_increases_then_completes() {
        let mut particle = Particle::new(id(), blueprint(1000.0, 0.0), 0.0);
        let mut last = 0.0;
        for ms in (100..1000).step_by(100) {
            assert!(particle.advance(ms as f64));
            assert!(particle.progress() > last);
            last = particle.progress();
        }
        assert!(!particle.advance(1000.0));
        assert_eq!(particle.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut particle = Particle::new(id(), blueprint(0.0, 0.0), 50.0);
        assert!(!particle.advance(50.0));
        assert_eq!(particle.progress(), 1.0);
        assert_eq!(particle.view().opacity, 0.0);
    }

    #[test]
    fn test_spawn_view_is_start_values() {
        let particle = Particle::new(id(), blueprint(1000.0, 60.0), 0.0);
        let view = particle.view();
        assert_eq!(view.scale, 1.0);
        assert_eq!(view.opacity, 1.0);
        assert_eq!(view.position, Vec2::ZERO);
    }

    #[test]
    fn test_view_throttled_but_final_frame_published() {
        // 10 fps: one publish per 100 ms
        let mut particle = Particle::new(id(), blueprint(1000.0, 10.0), 0.0);
        particle.advance(16.0);
        assert_eq!(particle.view().scale, 1.0);
        particle.advance(100.0);
        assert!((particle.view().scale - 1.1).abs() < 1e-5);
        particle.advance(990.0);
        particle.advance(1000.0);
        assert_eq!(particle.view().scale, 2.0);
        assert!((particle.position().x - 100.0).abs() < 1e-4);
    }
}

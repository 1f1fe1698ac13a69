//! Scale-reaction sub-machine

use super::SpinnerEvent;
use crate::config::{ConfigLayers, ScaleConfig};
use crate::easing::{BezierCurve, lerp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransition {
    pub started_at_ms: f64,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f32,
    curve: BezierCurve,
}

/// Eased transitions of the spinner's display scale
#[derive(Debug, Clone)]
pub struct ScaleReaction {
    layers: ConfigLayers<ScaleConfig>,
    current: f32,
    transition: Option<ScaleTransition>,
}

impl ScaleReaction {
    pub fn new(config: ScaleConfig) -> Self {
        Self {
            current: config.scale,
            layers: ConfigLayers::new(config),
            transition: None,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn transition(&self) -> Option<&ScaleTransition> {
        self.transition.as_ref()
    }

    pub fn is_scaling(&self) -> bool {
        self.transition.is_some()
    }

    pub fn config(&self) -> &ScaleConfig {
        self.layers.active()
    }

    pub fn base(&self) -> &ScaleConfig {
        self.layers.base()
    }

    pub fn set_overlay(&mut self, config: ScaleConfig) {
        self.layers.set_overlay(config);
    }

    pub fn clear_overlay(&mut self) {
        self.layers.clear_overlay();
    }

    pub fn set_base(&mut self, config: ScaleConfig) {
        self.layers.set_base(config);
    }

    /// Begin a transition from the current scale to `target`
    ///
    /// Duration and easing come from the active config. An in-flight
    /// transition is replaced.
    pub fn start_scaling(&mut self, target: f32, now_ms: f64, events: &mut Vec<SpinnerEvent>) {
        let config = self.layers.active();
        log::debug!("scaling {:.2} -> {:.2}", self.current, target);
        self.transition = Some(ScaleTransition {
            started_at_ms: now_ms,
            from: self.current,
            to: target,
            duration_ms: config.scale_duration_ms,
            curve: config.scale_easing.curve(),
        });
        events.push(SpinnerEvent::ScaleStart);
        events.push(SpinnerEvent::ScaleChange(target));
    }

    pub fn tick(&mut self, now_ms: f64, events: &mut Vec<SpinnerEvent>) {
        let Some(transition) = self.transition else {
            return;
        };
        let elapsed = (now_ms - transition.started_at_ms).max(0.0);
        let progress = if transition.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / transition.duration_ms as f64).min(1.0) as f32
        };
        self.current = lerp(transition.from, transition.to, transition.curve.evaluate(progress));

        if progress >= 1.0 {
            self.transition = None;
            events.push(SpinnerEvent::ScaleEnd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn linear(duration_ms: f32) -> ScaleReaction {
        ScaleReaction::new(ScaleConfig {
            scale: 1.0,
            scale_duration_ms: duration_ms,
            scale_easing: Easing::LINEAR,
        })
    }

    #[test]
    fn test_transition_events_and_value() {
        let mut scale = linear(100.0);
        let mut events = Vec::new();
        scale.start_scaling(3.0, 0.0, &mut events);
        assert_eq!(events, vec![SpinnerEvent::ScaleStart, SpinnerEvent::ScaleChange(3.0)]);

        scale.tick(50.0, &mut events);
        assert!((scale.current() - 2.0).abs() < 1e-5);
        assert!(scale.is_scaling());

        scale.tick(100.0, &mut events);
        assert_eq!(scale.current(), 3.0);
        assert!(!scale.is_scaling());
        assert_eq!(events.last(), Some(&SpinnerEvent::ScaleEnd));
    }

    #[test]
    fn test_new_start_overwrites_in_flight() {
        let mut scale = linear(100.0);
        let mut events = Vec::new();
        scale.start_scaling(3.0, 0.0, &mut events);
        scale.tick(50.0, &mut events);
        scale.start_scaling(1.0, 50.0, &mut events);
        let transition = scale.transition().unwrap();
        assert!((transition.from - 2.0).abs() < 1e-5);
        assert_eq!(transition.to, 1.0);

        scale.tick(150.0, &mut events);
        assert_eq!(scale.current(), 1.0);
        let ends = events.iter().filter(|e| **e == SpinnerEvent::ScaleEnd).count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut scale = linear(0.0);
        let mut events = Vec::new();
        scale.start_scaling(2.5, 10.0, &mut events);
        scale.tick(10.0, &mut events);
        assert_eq!(scale.current(), 2.5);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_overshoot_easing_exceeds_target_mid_flight() {
        let mut scale = ScaleReaction::new(ScaleConfig {
            scale_easing: Easing::OVERSHOOT,
            ..ScaleConfig::default()
        });
        let mut events = Vec::new();
        scale.start_scaling(2.0, 0.0, &mut events);
        let mut peak: f32 = 0.0;
        for ms in (0..=500).step_by(10) {
            scale.tick(ms as f64, &mut events);
            peak = peak.max(scale.current());
        }
        assert!(peak > 2.0);
        assert_eq!(scale.current(), 2.0);
    }
}

use rand::Rng;

use super::{
    Blueprint, Emission, Emitter, Motion, ParticleEasings, ParticleKind, ParticleValues, Wobble,
    pick_component,
};
use crate::config::BubbleConfig;
use crate::numeric::NumericControl;

impl Emitter for BubbleConfig {
    const KIND: ParticleKind = ParticleKind::Bubble;

    fn active(&self) -> bool {
        self.active
    }

    fn initial_interval_ms(&self) -> f64 {
        self.min_spawn_interval_ms as f64
    }

    fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Emission {
        let r: f32 = rng.random();
        let next_interval_ms =
            self.min_spawn_interval_ms + r * (self.max_spawn_interval_ms - self.min_spawn_interval_ms);

        // Randomness fields are extra amounts on top of the base value
        let wobble = Wobble {
            amplitude: NumericControl::spread(self.wobble_amplitude, self.wobble_amplitude_randomness)
                .resolve(rng),
            frequency: NumericControl::spread(self.wobble_frequency, self.wobble_frequency_randomness)
                .resolve(rng),
        };
        let motion = Motion::Drift {
            x_offset: NumericControl::spread(0.0, self.x_offset_randomness).resolve(rng),
            wobble,
        };

        let blueprint = Blueprint {
            duration_ms: NumericControl::spread(self.duration_ms, self.duration_ms_randomness)
                .resolve(rng),
            start: ParticleValues {
                position: self.y_start,
                scale: NumericControl::spread(self.scale_start, self.scale_start_randomness)
                    .resolve(rng),
                opacity: self.opacity_start,
            },
            end: ParticleValues {
                position: NumericControl::spread(self.y_end, self.y_randomness).resolve(rng),
                scale: NumericControl::spread(self.scale_end, self.scale_end_randomness).resolve(rng),
                opacity: self.opacity_end,
            },
            easings: ParticleEasings {
                position: self.y_easing,
                scale: self.scale_easing,
                opacity: self.opacity_easing,
            },
            motion,
            content: pick_component(&self.components, rng),
            frame_rate: self.frame_rate,
        };

        Emission {
            next_interval_ms: next_interval_ms as f64,
            blueprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn near(range: std::ops::RangeInclusive<f32>, value: f32) -> bool {
        value >= *range.start() - 1e-4 && value <= *range.end() + 1e-4
    }

    #[test]
    fn test_emission_within_config_ranges() {
        let config = BubbleConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let Emission {
                next_interval_ms,
                blueprint,
            } = config.emit(&mut rng);
            assert!((200.0..=1000.0).contains(&next_interval_ms));
            assert!(near(1500.0..=2500.0, blueprint.duration_ms));
            assert!(near(1.0..=1.5, blueprint.start.scale));
            assert!(near(2.0..=2.2, blueprint.end.scale));
            assert!(near(100.0..=300.0, blueprint.end.position));
            assert_eq!(blueprint.start.position, 0.0);
            assert!(config.components.contains(&blueprint.content));
            let Motion::Drift { x_offset, wobble } = blueprint.motion else {
                panic!("bubbles drift");
            };
            assert!(near(0.0..=100.0, x_offset));
            assert!(near(1.0..=41.0, wobble.amplitude));
            assert!(near(0.1..=0.6, wobble.frequency));
        }
    }

    #[test]
    fn test_zero_randomness_is_deterministic() {
        let config = BubbleConfig {
            duration_ms_randomness: 0.0,
            y_randomness: 0.0,
            scale_start_randomness: 0.0,
            ..BubbleConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(8);
        let blueprint = config.emit(&mut rng).blueprint;
        assert_eq!(blueprint.duration_ms, 1500.0);
        assert_eq!(blueprint.end.position, 100.0);
        assert_eq!(blueprint.start.scale, 1.0);
    }
}

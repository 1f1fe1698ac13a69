use std::f32::consts::TAU;

use rand::Rng;

use super::{
    Blueprint, Emission, Emitter, Motion, ParticleEasings, ParticleKind, ParticleValues,
    pick_component,
};
use crate::config::SparkConfig;

impl Emitter for SparkConfig {
    const KIND: ParticleKind = ParticleKind::Spark;

    fn active(&self) -> bool {
        self.active
    }

    fn initial_interval_ms(&self) -> f64 {
        self.min_spawn_interval_ms as f64
    }

    fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Emission {
        // One skewed draw drives both the wait and the flight length
        let r: f32 = rng.random();
        let k = r.powf(self.intensity);
        let next_interval_ms =
            self.min_spawn_interval_ms + k * (self.max_spawn_interval_ms - self.min_spawn_interval_ms);
        // Spans [minDistancePx, maxDistancePx] as the field names say, not from distanceStart
        let distance_end = self.min_distance_px + k * (self.max_distance_px - self.min_distance_px);

        let blueprint = Blueprint {
            duration_ms: self.duration_ms,
            start: ParticleValues {
                position: self.distance_start,
                scale: self.scale_start,
                opacity: self.opacity_start,
            },
            end: ParticleValues {
                position: distance_end,
                scale: self.scale_end,
                opacity: self.opacity_end,
            },
            easings: ParticleEasings {
                position: self.distance_easing,
                scale: self.scale_easing,
                opacity: self.opacity_easing,
            },
            motion: Motion::Radiate {
                angle: rng.random_range(0.0..TAU),
            },
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

    fn ratio(interval: f64, distance: f32, config: &SparkConfig) -> (f32, f32) {
        let i = (interval as f32 - config.min_spawn_interval_ms)
            / (config.max_spawn_interval_ms - config.min_spawn_interval_ms);
        let d = (distance - config.min_distance_px) / (config.max_distance_px - config.min_distance_px);
        (i, d)
    }

    #[test]
    fn test_interval_and_distance_share_draw() {
        let config = SparkConfig::default();
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..100 {
            let emission = config.emit(&mut rng);
            let (i, d) = ratio(emission.next_interval_ms, emission.blueprint.end.position, &config);
            assert!((i - d).abs() < 1e-4);
            assert!((0.0..=1.0).contains(&d));
            let Motion::Radiate { angle } = emission.blueprint.motion else {
                panic!("sparks radiate");
            };
            assert!((0.0..TAU).contains(&angle));
        }
    }

    #[test]
    fn test_high_intensity_favours_short_intervals() {
        let mean = |intensity: f32| {
            let config = SparkConfig {
                intensity,
                ..SparkConfig::default()
            };
            let mut rng = Pcg32::seed_from_u64(12);
            (0..500).map(|_| config.emit(&mut rng).next_interval_ms).sum::<f64>() / 500.0
        };
        assert!(mean(4.0) < mean(1.0));
        assert!(mean(1.0) < mean(0.25));
    }

    #[test]
    fn test_fixed_values_copied() {
        let config = SparkConfig::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let blueprint = config.emit(&mut rng).blueprint;
        assert_eq!(blueprint.duration_ms, 1000.0);
        assert_eq!(blueprint.start.scale, 0.5);
        assert_eq!(blueprint.end.scale, 5.0);
        assert_eq!(blueprint.frame_rate, 50.0);
    }
}

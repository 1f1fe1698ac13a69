//! Generic particle spawner

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{Emitter, Particle, ParticleId};
use crate::config::ConfigLayers;
use crate::spinner::SpinnerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerState {
    Idle,
    Active,
}

/// Spawns particles of one style while active and animates them always
#[derive(Debug, Clone)]
pub struct Spawner<E: Emitter> {
    layers: ConfigLayers<E>,
    state: SpawnerState,
    /// Started on the first active tick, then kept across deactivation
    last_spawn_ms: Option<f64>,
    spawn_interval_ms: f64,
    next_seq: u64,
    particles: BTreeMap<ParticleId, Particle>,
    rng: Pcg32,
}

impl<E: Emitter> Spawner<E> {
    pub fn new(config: E, seed: u64) -> Self {
        let state = if config.active() {
            SpawnerState::Active
        } else {
            SpawnerState::Idle
        };
        Self {
            spawn_interval_ms: config.initial_interval_ms(),
            layers: ConfigLayers::new(config),
            state,
            last_spawn_ms: None,
            next_seq: 0,
            particles: BTreeMap::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SpawnerState::Active
    }

    /// Start or stop spawning. Live particles are unaffected.
    pub fn set_active(&mut self, active: bool) {
        let state = if active {
            SpawnerState::Active
        } else {
            SpawnerState::Idle
        };
        if state != self.state {
            log::debug!("{} spawner {:?} -> {:?}", E::KIND, self.state, state);
            self.state = state;
        }
    }

    pub fn config(&self) -> &E {
        self.layers.active()
    }

    pub fn set_overlay(&mut self, config: E) {
        self.layers.set_overlay(config);
    }

    pub fn clear_overlay(&mut self) {
        self.layers.clear_overlay();
    }

    pub fn set_base(&mut self, config: E) {
        self.layers.set_base(config);
    }

    /// Spawn check (while active), then advance every live particle
    pub fn tick(&mut self, now_ms: f64, events: &mut Vec<SpinnerEvent>) {
        if self.is_active() {
            self.spawn_due(now_ms, events);
        }

        let mut finished = Vec::new();
        for (id, particle) in self.particles.iter_mut() {
            if !particle.advance(now_ms) {
                finished.push(*id);
            }
        }
        for id in finished {
            self.particles.remove(&id);
            log::debug!("remove {}", id);
            events.push(SpinnerEvent::Remove { kind: id.kind, id });
        }
    }

    fn spawn_due(&mut self, now_ms: f64, events: &mut Vec<SpinnerEvent>) {
        let Some(last) = self.last_spawn_ms else {
            self.last_spawn_ms = Some(now_ms);
            return;
        };
        if now_ms - last <= self.spawn_interval_ms {
            return;
        }

        self.last_spawn_ms = Some(now_ms);
        let emission = self.layers.active().emit(&mut self.rng);
        self.spawn_interval_ms = emission.next_interval_ms;

        let id = ParticleId {
            kind: E::KIND,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.particles
            .insert(id, Particle::new(id, emission.blueprint, now_ms));
        log::debug!("spawn {} (next in {:.0} ms)", id, self.spawn_interval_ms);
        events.push(SpinnerEvent::Spawn { kind: E::KIND, id });
    }

    /// Live particles in spawn order
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.values()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BubbleConfig, SparkConfig};
    use crate::particles::ParticleKind;

    fn spark_config() -> SparkConfig {
        SparkConfig {
            min_spawn_interval_ms: 100.0,
            max_spawn_interval_ms: 100.0,
            duration_ms: 250.0,
            ..SparkConfig::default()
        }
    }

    fn run<E: Emitter>(spawner: &mut Spawner<E>, from: u32, to: u32) -> Vec<SpinnerEvent> {
        let mut events = Vec::new();
        for frame in from..to {
            spawner.tick(frame as f64 * 10.0, &mut events);
        }
        events
    }

    fn spawns(events: &[SpinnerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SpinnerEvent::Spawn { .. }))
            .count()
    }

    #[test]
    fn test_initial_state_follows_config() {
        assert!(Spawner::new(SparkConfig::default(), 1).is_active());
        assert!(!Spawner::new(BubbleConfig::default(), 1).is_active());
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut spawner = Spawner::new(spark_config(), 7);
        let mut events = Vec::new();
        spawner.tick(0.0, &mut events);
        spawner.tick(100.0, &mut events);
        assert!(events.is_empty());
        spawner.tick(110.0, &mut events);
        assert_eq!(
            events,
            vec![SpinnerEvent::Spawn {
                kind: ParticleKind::Spark,
                id: ParticleId {
                    kind: ParticleKind::Spark,
                    seq: 0
                }
            }]
        );
        assert_eq!(spawner.len(), 1);
    }

    #[test]
    fn test_ids_unique_and_removed_on_finish() {
        let mut spawner = Spawner::new(spark_config(), 3);
        let events = run(&mut spawner, 0, 100);
        let mut spawned: Vec<ParticleId> = events
            .iter()
            .filter_map(|e| match e {
                SpinnerEvent::Spawn { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        let count = spawned.len();
        spawned.dedup();
        assert_eq!(spawned.len(), count);
        assert!(count >= 8);

        let removed = events
            .iter()
            .filter(|e| matches!(e, SpinnerEvent::Remove { .. }))
            .count();
        assert_eq!(removed + spawner.len(), count);
    }

    #[test]
    fn test_deactivate_halts_spawning_only() {
        let mut spawner = Spawner::new(spark_config(), 5);
        run(&mut spawner, 0, 30);
        let live = spawner.len();
        assert!(live > 0);

        spawner.set_active(false);
        let events = run(&mut spawner, 30, 100);
        assert_eq!(spawns(&events), 0);
        assert_eq!(spawner.len(), 0);
        assert!(events.len() >= live);
    }

    #[test]
    fn test_config_change_leaves_live_particles_frozen() {
        let mut spawner = Spawner::new(spark_config(), 11);
        run(&mut spawner, 0, 12);
        let before: Vec<_> = spawner.particles().map(|p| p.blueprint().clone()).collect();
        assert!(!before.is_empty());

        spawner.set_overlay(SparkConfig {
            duration_ms: 5000.0,
            scale_end: 40.0,
            ..spark_config()
        });
        let after: Vec<_> = spawner
            .particles()
            .take(before.len())
            .map(|p| p.blueprint().clone())
            .collect();
        assert_eq!(before, after);
        assert_eq!(spawner.config().scale_end, 40.0);

        spawner.clear_overlay();
        assert_eq!(spawner.config().scale_end, 5.0);
    }

    #[test]
    fn test_particles_advance_while_idle() {
        let mut spawner = Spawner::new(spark_config(), 9);
        run(&mut spawner, 0, 12);
        spawner.set_active(false);
        let progress: Vec<f32> = spawner.particles().map(|p| p.progress()).collect();
        run(&mut spawner, 12, 14);
        let later: Vec<f32> = spawner.particles().map(|p| p.progress()).collect();
        assert_eq!(progress.len(), later.len());
        assert!(progress.iter().zip(&later).all(|(a, b)| b > a));
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let mut a = Spawner::new(SparkConfig::default(), 42);
        let mut b = Spawner::new(SparkConfig::default(), 42);
        assert_eq!(run(&mut a, 0, 300), run(&mut b, 0, 300));
    }
}

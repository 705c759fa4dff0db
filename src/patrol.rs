//! Enemy spawning and patrol behavior.
//!
//! [`EnemyPatrol`] is a [`Collaborator`] driven by the engine's movement
//! cadence: it spawns waves of enemy units on the board edges facing inward
//! and walks each one through a simple patrol routine of reversals, march
//! toggles, and occasional re-facing. Every random draw goes through the
//! engine's rng, so a seeded session replays exactly.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::{
    Archetype, Battlefield, Clan, Position, UnitId, BACKWARD, CANONICAL_DIRECTIONS, FORWARD,
    LEFT, RIGHT,
};
use crate::engine::Collaborator;

/// Per-unit patrol bookkeeping.
#[derive(Debug, Clone, Copy)]
struct PatrolState {
    counter: u32,
    threshold: u32,
}

/// Edge spawner and patrol driver for the enemy clan.
pub struct EnemyPatrol {
    wave_size: usize,
    kind: Archetype,
    states: HashMap<UnitId, PatrolState>,
}

impl EnemyPatrol {
    /// Creates a patrol that spawns `wave_size` militia per cadence.
    pub fn new(wave_size: usize) -> Self {
        Self::with_kind(wave_size, Archetype::Militia)
    }

    /// Creates a patrol spawning the given archetype.
    pub fn with_kind(wave_size: usize, kind: Archetype) -> Self {
        EnemyPatrol {
            wave_size,
            kind,
            states: HashMap::new(),
        }
    }

    /// Spawns up to `wave_size` enemies on a random board edge, facing
    /// inward. Occupied cells are skipped for this wave.
    fn spawn_wave(&mut self, field: &mut Battlefield, rng: &mut SmallRng) {
        for _ in 0..self.wave_size {
            let edge = rng.gen_range(0..4);
            let (position, facing) = match edge {
                0 => (
                    Position::new(rng.gen_range(0..field.cols()), field.rows() - 1),
                    BACKWARD,
                ),
                1 => (
                    Position::new(field.cols() - 1, rng.gen_range(0..field.rows())),
                    LEFT,
                ),
                2 => (Position::new(rng.gen_range(0..field.cols()), 0), FORWARD),
                _ => (Position::new(0, rng.gen_range(0..field.rows())), RIGHT),
            };
            if let Ok(id) = field.insert(self.kind, Clan::Enemy, position, facing) {
                let threshold = rng.gen_range(3..=7);
                let _ = self.states.insert(
                    id,
                    PatrolState {
                        counter: 0,
                        threshold,
                    },
                );
            }
        }
    }
}

impl Collaborator for EnemyPatrol {
    fn on_cadence(&mut self, field: &mut Battlefield, rng: &mut SmallRng) {
        // Forget units that died since the last cadence.
        self.states.retain(|id, _| field.unit(*id).is_some());

        self.spawn_wave(field, rng);

        // Walk enemies in id order so the rng draws line up run to run.
        let mut ids: Vec<UnitId> = field
            .units()
            .filter(|u| u.clan == Clan::Enemy)
            .map(|u| u.id)
            .collect();
        ids.sort();

        for id in ids {
            let state = self.states.entry(id).or_insert_with(|| PatrolState {
                counter: 0,
                threshold: rng.gen_range(3..=7),
            });
            state.counter += 1;
            if state.counter >= state.threshold {
                state.counter = 0;
                if let Some(unit) = field.unit(id) {
                    let reversed = -unit.facing;
                    let _ = field.set_facing(id, reversed);
                }
            }
            if rng.gen_bool(0.3) {
                if let Some(unit) = field.unit(id) {
                    let marching = unit.marching;
                    let _ = field.set_marching(id, !marching);
                }
            }
            if rng.gen_bool(0.1) {
                let facing = CANONICAL_DIRECTIONS[rng.gen_range(0..CANONICAL_DIRECTIONS.len())];
                let _ = field.set_facing(id, facing);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn on_edge(field: &Battlefield, position: Position) -> bool {
        position.x == 0
            || position.y == 0
            || position.x == field.cols() - 1
            || position.y == field.rows() - 1
    }

    #[test]
    fn wave_spawns_on_edges_facing_inward() {
        let mut field = Battlefield::new(8, 8);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut patrol = EnemyPatrol::new(4);

        patrol.on_cadence(&mut field, &mut rng);

        assert!(field.len() >= 1 && field.len() <= 4);
        for unit in field.units() {
            assert_eq!(unit.clan, Clan::Enemy);
            assert!(on_edge(&field, unit.position));
            assert!((unit.position + unit.facing).in_bounds(field.rows(), field.cols()));
        }
    }

    #[test]
    fn patrol_is_seed_reproducible() {
        let run = |seed| {
            let mut field = Battlefield::new(8, 8);
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut patrol = EnemyPatrol::new(2);
            for _ in 0..6 {
                patrol.on_cadence(&mut field, &mut rng);
            }
            field.snapshot()
        };

        assert_eq!(run(11), run(11));
    }

    #[test]
    fn facings_stay_canonical_across_many_cadences() {
        let mut field = Battlefield::new(8, 8);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut patrol = EnemyPatrol::new(1);
        for _ in 0..20 {
            patrol.on_cadence(&mut field, &mut rng);
        }
        for unit in field.units() {
            assert!(unit.facing.is_canonical_direction());
        }
    }

    #[test]
    fn dead_units_are_pruned_from_patrol_state() {
        let mut field = Battlefield::new(8, 8);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut patrol = EnemyPatrol::new(1);

        patrol.on_cadence(&mut field, &mut rng);
        let cells: Vec<Position> = field.units().map(|u| u.position).collect();
        for cell in cells {
            field.apply_damage(cell, 99);
        }

        // The next cadence must not reference the dead units.
        patrol.on_cadence(&mut field, &mut rng);
        assert!(patrol.states.len() <= 1);
    }

    #[test]
    fn zero_wave_size_spawns_nothing() {
        let mut field = Battlefield::new(8, 8);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut patrol = EnemyPatrol::new(0);
        patrol.on_cadence(&mut field, &mut rng);
        assert!(field.is_empty());
    }
}

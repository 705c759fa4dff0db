//! Turn orchestration.
//!
//! The [`TurnEngine`] owns the battlefield and the rng and exposes the two
//! externally triggered steps: movement resolution and combat resolution.
//! The engine does not enforce any calling order between the two; the
//! external driver sequences triggers. A collaborator hook runs after every
//! Nth movement trigger to let spawner/AI code insert units or mutate enemy
//! facings between phases.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{Archetype, Battlefield, Clan, PlacementError, Position, UnitId};
use crate::resolve::{collect_requests, resolve_moves};

/// External spawner/AI code invoked on the movement cadence. Collaborators
/// run strictly between phases and share the engine's rng so a seeded
/// session replays exactly.
pub trait Collaborator {
    fn on_cadence(&mut self, field: &mut Battlefield, rng: &mut SmallRng);
}

/// Damage delivered by one combat trigger, per attacking clan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombatReport {
    pub ally: BTreeMap<Position, i32>,
    pub enemy: BTreeMap<Position, i32>,
}

impl CombatReport {
    /// Total damage applied across both clans.
    pub fn total_damage(&self) -> i32 {
        self.ally.values().sum::<i32>() + self.enemy.values().sum::<i32>()
    }
}

/// Orchestrates one session: request collection, resolution, and the two
/// explicit apply phases.
pub struct TurnEngine {
    field: Battlefield,
    rng: SmallRng,
    movement_steps: u64,
    cadence: Option<NonZeroU64>,
    collaborator: Option<Box<dyn Collaborator>>,
}

impl TurnEngine {
    /// Creates an engine with an entropy-seeded rng.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self::with_rng(rows, cols, SmallRng::from_entropy())
    }

    /// Creates an engine whose tie-breaks and collaborators replay exactly
    /// for a given seed.
    pub fn with_seed(rows: i32, cols: i32, seed: u64) -> Self {
        Self::with_rng(rows, cols, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rows: i32, cols: i32, rng: SmallRng) -> Self {
        TurnEngine {
            field: Battlefield::new(rows, cols),
            rng,
            movement_steps: 0,
            cadence: None,
            collaborator: None,
        }
    }

    /// Replaces the rng with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Installs a collaborator invoked after every `interval`th movement
    /// trigger. An interval of zero disables the hook.
    pub fn set_collaborator(&mut self, interval: u64, collaborator: Box<dyn Collaborator>) {
        self.cadence = NonZeroU64::new(interval);
        self.collaborator = Some(collaborator);
    }

    /// Read-only battlefield view.
    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    /// Mutable battlefield access for the external driver, valid only
    /// between triggers.
    pub fn field_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    /// Number of movement triggers processed so far.
    pub fn movement_steps(&self) -> u64 {
        self.movement_steps
    }

    /// Validates and inserts a new unit from a descriptor.
    pub fn spawn(
        &mut self,
        kind: Archetype,
        clan: Clan,
        position: Position,
        facing: Position,
    ) -> Result<UnitId, PlacementError> {
        self.field.insert(kind, clan, position, facing)
    }

    /// Movement trigger: collect requests from marching units, resolve them
    /// into a conflict-free assignment, and apply it in two phases. Returns
    /// the applied assignment.
    pub fn resolve_movement(&mut self) -> BTreeMap<Position, UnitId> {
        let requests = collect_requests(&self.field);
        let assignment = resolve_moves(requests, &self.field, &mut self.rng);
        self.field.apply_moves(&assignment);
        self.movement_steps += 1;

        if let (Some(interval), Some(collaborator)) =
            (self.cadence, self.collaborator.as_mut())
        {
            if self.movement_steps % interval.get() == 0 {
                collaborator.on_cadence(&mut self.field, &mut self.rng);
            }
        }
        assignment
    }

    /// Combat trigger: compute both clans' attack results against the same
    /// snapshot, then apply every cell of both. Each write targets a
    /// disjoint unit, so application order is irrelevant.
    pub fn resolve_combat(&mut self) -> CombatReport {
        let report = CombatReport {
            ally: self.field.attack_result(Clan::Ally),
            enemy: self.field.attack_result(Clan::Enemy),
        };
        for (&cell, &damage) in &report.ally {
            self.field.apply_damage(cell, damage);
        }
        for (&cell, &damage) in &report.enemy {
            self.field.apply_damage(cell, damage);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position::{BACKWARD, FORWARD, LEFT, RIGHT};

    /// Inserts one militia at a fixed cell per cadence call.
    struct TestSpawner {
        next_x: i32,
    }

    impl Collaborator for TestSpawner {
        fn on_cadence(&mut self, field: &mut Battlefield, _rng: &mut SmallRng) {
            let _ = field.insert(
                Archetype::Militia,
                Clan::Enemy,
                Position::new(self.next_x, 5),
                BACKWARD,
            );
            self.next_x += 1;
        }
    }

    #[test]
    fn movement_trigger_advances_marching_units() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        let id = engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(2, 2), FORWARD)
            .unwrap();

        let moves = engine.resolve_movement();
        assert_eq!(moves.get(&Position::new(2, 3)), Some(&id));
        assert_eq!(engine.field().unit(id).unwrap().position, Position::new(2, 3));
        assert_eq!(engine.movement_steps(), 1);
    }

    #[test]
    fn movement_trigger_keeps_column_behind_halted_unit() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        let a = engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(1, 1), FORWARD)
            .unwrap();
        let b = engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(1, 2), FORWARD)
            .unwrap();
        let c = engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(1, 3), FORWARD)
            .unwrap();
        engine.field_mut().set_marching(c, false);

        let moves = engine.resolve_movement();
        assert!(moves.is_empty());
        assert_eq!(engine.field().len(), 3);
        assert_eq!(engine.field().unit(a).unwrap().position, Position::new(1, 1));
        assert_eq!(engine.field().unit(b).unwrap().position, Position::new(1, 2));
        assert_eq!(engine.field().unit(c).unwrap().position, Position::new(1, 3));
    }

    #[test]
    fn combat_trigger_applies_both_clans_simultaneously() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        let a = engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(2, 2), FORWARD)
            .unwrap();
        let b = engine
            .spawn(Archetype::Militia, Clan::Enemy, Position::new(2, 3), BACKWARD)
            .unwrap();

        let report = engine.resolve_combat();
        assert_eq!(report.ally.get(&Position::new(2, 3)), Some(&1));
        assert_eq!(report.enemy.get(&Position::new(2, 2)), Some(&1));
        assert_eq!(engine.field().unit(a).unwrap().health, 4);
        assert_eq!(engine.field().unit(b).unwrap().health, 4);
    }

    #[test]
    fn mutual_exchange_kills_both_at_zero() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(2, 2), FORWARD)
            .unwrap();
        engine
            .spawn(Archetype::Militia, Clan::Enemy, Position::new(2, 3), BACKWARD)
            .unwrap();

        for _ in 0..5 {
            let _ = engine.resolve_combat();
        }
        assert!(engine.field().is_empty());
    }

    #[test]
    fn dead_units_stay_dead() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        let victim = engine
            .spawn(Archetype::Militia, Clan::Enemy, Position::new(2, 3), BACKWARD)
            .unwrap();
        engine
            .spawn(Archetype::Spear, Clan::Ally, Position::new(2, 2), FORWARD)
            .unwrap();
        engine
            .spawn(Archetype::Spear, Clan::Ally, Position::new(2, 4), BACKWARD)
            .unwrap();

        for _ in 0..3 {
            let _ = engine.resolve_combat();
        }
        assert!(engine.field().unit(victim).is_none());
        let _ = engine.resolve_combat();
        assert!(engine.field().unit(victim).is_none());
    }

    #[test]
    fn seeded_engines_resolve_ties_identically() {
        let build = |seed| {
            let mut engine = TurnEngine::with_seed(6, 6, seed);
            engine
                .spawn(Archetype::Militia, Clan::Ally, Position::new(1, 1), RIGHT)
                .unwrap();
            engine
                .spawn(Archetype::Militia, Clan::Ally, Position::new(3, 1), LEFT)
                .unwrap();
            let _ = engine.resolve_movement();
            engine.field().snapshot()
        };

        assert_eq!(build(99), build(99));
    }

    #[test]
    fn collaborator_runs_on_cadence_only() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        engine.set_collaborator(2, Box::new(TestSpawner { next_x: 0 }));

        let _ = engine.resolve_movement();
        assert_eq!(engine.field().len(), 0);
        let _ = engine.resolve_movement();
        assert_eq!(engine.field().len(), 1);
        let _ = engine.resolve_movement();
        assert_eq!(engine.field().len(), 1);
        let _ = engine.resolve_movement();
        assert_eq!(engine.field().len(), 2);
    }

    #[test]
    fn zero_interval_disables_collaborator() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        engine.set_collaborator(0, Box::new(TestSpawner { next_x: 0 }));
        for _ in 0..4 {
            let _ = engine.resolve_movement();
        }
        assert!(engine.field().is_empty());
    }

    #[test]
    fn spawn_propagates_placement_errors() {
        let mut engine = TurnEngine::with_seed(6, 6, 7);
        engine
            .spawn(Archetype::Militia, Clan::Ally, Position::new(0, 0), FORWARD)
            .unwrap();
        assert!(matches!(
            engine.spawn(Archetype::Militia, Clan::Ally, Position::new(0, 0), FORWARD),
            Err(PlacementError::OccupiedCell(_))
        ));
        assert!(matches!(
            engine.spawn(Archetype::Militia, Clan::Ally, Position::new(9, 0), FORWARD),
            Err(PlacementError::OutOfBounds(_))
        ));
    }
}

//! Battlefield occupancy and combat-grid computation.
//!
//! The [`Battlefield`] owns the cell -> unit occupancy map and derives the
//! per-cell attack and defense intensity grids from it. Grid computations are
//! pure functions of the current state; mutation happens only through
//! insert, movement application, and damage application.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

use super::archetype::Archetype;
use super::position::{DirectionError, Position};
use super::unit::{Clan, Unit, UnitId};

/// Errors raised when validating a new-unit descriptor.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("cell {0} is outside the battlefield")]
    OutOfBounds(Position),

    #[error("cell {0} is already occupied")]
    OccupiedCell(Position),

    #[error(transparent)]
    Direction(#[from] DirectionError),
}

/// Read-only view of one occupied cell, exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitView {
    pub id: UnitId,
    pub kind: Archetype,
    pub clan: Clan,
    pub position: Position,
    pub facing: Position,
    pub health: i32,
    pub marching: bool,
}

/// The occupancy map and combat-grid engine for one session.
///
/// Invariant: at most one unit per cell, and every stored unit's `position`
/// field equals its map key. Both are checked with debug assertions after
/// each mutating operation.
#[derive(Debug, Clone)]
pub struct Battlefield {
    rows: i32,
    cols: i32,
    units: HashMap<Position, Unit>,
    next_id: u32,
}

impl Battlefield {
    /// Creates an empty battlefield. Panics if either dimension is < 1.
    pub fn new(rows: i32, cols: i32) -> Self {
        assert!(rows >= 1 && cols >= 1, "battlefield must be at least 1x1");
        Battlefield {
            rows,
            cols,
            units: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of rows (the `y` extent).
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns (the `x` extent).
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Number of living units on the board.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true when no units remain.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The unit occupying `cell`, if any.
    pub fn unit_at(&self, cell: Position) -> Option<&Unit> {
        self.units.get(&cell)
    }

    /// Looks a unit up by id.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.values().find(|u| u.id == id)
    }

    /// Iterates over all units in unspecified order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Validates and inserts a new unit, assigning it a fresh id.
    pub fn insert(
        &mut self,
        kind: Archetype,
        clan: Clan,
        position: Position,
        facing: Position,
    ) -> Result<UnitId, PlacementError> {
        if !position.in_bounds(self.rows, self.cols) {
            return Err(PlacementError::OutOfBounds(position));
        }
        if self.units.contains_key(&position) {
            return Err(PlacementError::OccupiedCell(position));
        }
        let id = UnitId(self.next_id);
        let unit = Unit::new(id, kind, clan, position, facing)?;
        self.next_id += 1;
        let _ = self.units.insert(position, unit);
        debug_assert!(self.occupancy_consistent());
        Ok(id)
    }

    /// Detaches a unit from the board, leaving it temporarily untracked.
    /// Used by the two-phase movement apply; callers must re-place the unit.
    pub fn take(&mut self, id: UnitId) -> Option<Unit> {
        let position = self.units.values().find(|u| u.id == id)?.position;
        self.units.remove(&position)
    }

    /// Atomically detaches a unit from its current cell and attaches it at
    /// `destination`, updating its stored position. Returns false if the
    /// unit is not on the board.
    pub fn move_unit(&mut self, id: UnitId, destination: Position) -> bool {
        match self.take(id) {
            Some(mut unit) => {
                unit.position = destination;
                let evicted = self.units.insert(destination, unit);
                debug_assert!(evicted.is_none(), "move clobbered an occupied cell");
                debug_assert!(self.occupancy_consistent());
                true
            }
            None => false,
        }
    }

    /// Applies a conflict-free movement assignment in two phases: every
    /// winner is detached first, then every winner is attached at its
    /// destination. The result is independent of iteration order even when
    /// one winner vacates a cell another winner enters.
    pub fn apply_moves(&mut self, assignment: &BTreeMap<Position, UnitId>) {
        let mut movers = Vec::with_capacity(assignment.len());
        for (&destination, &id) in assignment {
            if let Some(unit) = self.take(id) {
                movers.push((destination, unit));
            }
        }
        for (destination, mut unit) in movers {
            unit.position = destination;
            let evicted = self.units.insert(destination, unit);
            debug_assert!(evicted.is_none(), "movement winners must not collide");
        }
        debug_assert!(self.occupancy_consistent());
    }

    /// Subtracts `damage` from the occupant of `cell`; a unit reaching zero
    /// or negative health is permanently removed. Empty cells are ignored.
    pub fn apply_damage(&mut self, cell: Position, damage: i32) {
        if let Some(unit) = self.units.get_mut(&cell) {
            unit.health -= damage;
            if unit.health <= 0 {
                let _ = self.units.remove(&cell);
            }
        }
    }

    /// Per-cell attack intensity delivered on behalf of `clan`: the summed
    /// attack power over the absolute attack range of every unit of `clan`,
    /// plus opposing units flagged for friendly fire.
    pub fn attack_grid(&self, clan: Clan) -> BTreeMap<Position, i32> {
        let mut grid = BTreeMap::new();
        for unit in self.units.values() {
            let stats = unit.archetype.stats();
            let contributes = unit.clan == clan || stats.friendly_fire;
            if !contributes {
                continue;
            }
            for cell in unit.attack_range() {
                *grid.entry(cell).or_insert(0) += stats.attack;
            }
        }
        grid
    }

    /// Per-cell defense intensity for `clan`: guardian defense over each
    /// unit's absolute defense range, plus self defense on its own cell.
    /// Contributions from different units accumulate.
    pub fn defense_grid(&self, clan: Clan) -> BTreeMap<Position, i32> {
        let mut grid = BTreeMap::new();
        for unit in self.units.values() {
            if unit.clan != clan {
                continue;
            }
            let stats = unit.archetype.stats();
            for cell in unit.defense_range() {
                *grid.entry(cell).or_insert(0) += stats.guardian_defense;
            }
            if stats.self_defense > 0 {
                *grid.entry(unit.position).or_insert(0) += stats.self_defense;
            }
        }
        grid
    }

    /// Net damage delivered on behalf of `clan`, per defended cell.
    ///
    /// Starts from [`attack_grid`](Self::attack_grid), keeps only cells
    /// occupied by an opposing unit, subtracts the opponent's defense grid,
    /// drops strictly negative cells (zero survives), and finally applies
    /// the cooperative bonus from the count of opposing-clan units in the
    /// defender's Moore neighborhood: exactly two grants +1, three or more
    /// grant +2.
    pub fn attack_result(&self, clan: Clan) -> BTreeMap<Position, i32> {
        let attack = self.attack_grid(clan);
        let defense = self.defense_grid(clan.opponent());
        let mut result = BTreeMap::new();
        for (cell, power) in attack {
            let defender = match self.units.get(&cell) {
                Some(unit) if unit.clan != clan => unit,
                _ => continue,
            };
            let mut damage = power - defense.get(&cell).copied().unwrap_or(0);
            if damage < 0 {
                continue;
            }
            match self.opposing_neighbor_count(cell, defender.clan) {
                2 => damage += 1,
                n if n >= 3 => damage += 2,
                _ => {}
            }
            let _ = result.insert(cell, damage);
        }
        result
    }

    /// In-bounds cells of the 8-cell Moore neighborhood around `cell`.
    pub fn moore_neighbors(&self, cell: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = cell + Position::new(dx, dy);
                if neighbor.in_bounds(self.rows, self.cols) {
                    neighbors.push(neighbor);
                }
            }
        }
        neighbors
    }

    /// Counts Moore neighbors of `cell` occupied by a unit opposing `clan`.
    pub fn opposing_neighbor_count(&self, cell: Position, clan: Clan) -> usize {
        self.moore_neighbors(cell)
            .into_iter()
            .filter(|n| matches!(self.units.get(n), Some(u) if u.clan != clan))
            .count()
    }

    /// Read-only occupancy snapshot, keyed by cell in deterministic order.
    pub fn snapshot(&self) -> BTreeMap<Position, UnitView> {
        self.units
            .iter()
            .map(|(&cell, unit)| {
                (
                    cell,
                    UnitView {
                        id: unit.id,
                        kind: unit.archetype,
                        clan: unit.clan,
                        position: unit.position,
                        facing: unit.facing,
                        health: unit.health,
                        marching: unit.marching,
                    },
                )
            })
            .collect()
    }

    /// Re-faces a unit. Returns false if the unit is not on the board.
    pub fn set_facing(&mut self, id: UnitId, facing: Position) -> Result<bool, DirectionError> {
        if !facing.is_canonical_direction() {
            return Err(DirectionError::InvalidDirection(facing));
        }
        Ok(self.with_unit(id, |unit| unit.facing = facing))
    }

    /// Sets a unit's marching flag. Returns false if the unit is missing.
    pub fn set_marching(&mut self, id: UnitId, marching: bool) -> bool {
        self.with_unit(id, |unit| unit.marching = marching)
    }

    /// Overrides a unit's movement priority.
    pub fn set_priority(&mut self, id: UnitId, priority: i32) -> bool {
        self.with_unit(id, |unit| unit.priority = priority)
    }

    /// Assigns a unit to a selection group.
    pub fn set_group(&mut self, id: UnitId, group: u32) -> bool {
        self.with_unit(id, |unit| unit.group = group)
    }

    /// Re-faces every unit in `group`; returns the number affected.
    pub fn set_group_facing(
        &mut self,
        group: u32,
        facing: Position,
    ) -> Result<usize, DirectionError> {
        if !facing.is_canonical_direction() {
            return Err(DirectionError::InvalidDirection(facing));
        }
        let mut count = 0;
        for unit in self.units.values_mut() {
            if unit.group == group {
                unit.facing = facing;
                count += 1;
            }
        }
        Ok(count)
    }

    /// Toggles the marching flag for every unit in `group`; returns the
    /// number affected.
    pub fn toggle_group_marching(&mut self, group: u32) -> usize {
        let mut count = 0;
        for unit in self.units.values_mut() {
            if unit.group == group {
                unit.marching = !unit.marching;
                count += 1;
            }
        }
        count
    }

    fn with_unit(&mut self, id: UnitId, f: impl FnOnce(&mut Unit)) -> bool {
        match self.units.values_mut().find(|u| u.id == id) {
            Some(unit) => {
                f(unit);
                true
            }
            None => false,
        }
    }

    fn occupancy_consistent(&self) -> bool {
        self.units.iter().all(|(cell, unit)| unit.position == *cell)
    }
}

//! Board representation and combat-state types.
//!
//! Contains the core data structures for positions and directions, unit
//! archetypes, units, and the battlefield occupancy map.

pub mod archetype;
pub mod field;
pub mod position;
pub mod unit;

pub use archetype::{Archetype, ArchetypeStats, ALL_ARCHETYPES};
pub use field::{Battlefield, PlacementError, UnitView};
pub use position::{
    DirectionError, Position, BACKWARD, CANONICAL_DIRECTIONS, FORWARD, LEFT, RIGHT,
};
pub use unit::{Clan, Unit, UnitId};

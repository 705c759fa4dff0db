//! Units and clan membership.
//!
//! A [`Unit`] combines an archetype reference with live state: position,
//! facing, health, and the marching flag. Range geometry is derived from the
//! current position and facing on every read and is never cached.

use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::position::{DirectionError, Position};

/// One of the two factions on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clan {
    Ally,
    Enemy,
}

impl Clan {
    /// Returns the opposing clan.
    pub const fn opponent(self) -> Clan {
        match self {
            Clan::Ally => Clan::Enemy,
            Clan::Enemy => Clan::Ally,
        }
    }

    /// Returns the lowercase name used by the command protocol.
    pub const fn name(self) -> &'static str {
        match self {
            Clan::Ally => "ally",
            Clan::Enemy => "enemy",
        }
    }

    /// Parses a clan from its lowercase protocol name.
    pub fn from_name(s: &str) -> Option<Clan> {
        match s {
            "ally" => Some(Clan::Ally),
            "enemy" => Some(Clan::Enemy),
            _ => None,
        }
    }
}

/// Opaque unit identifier, unique for the lifetime of a battlefield.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

/// A unit on the battlefield.
///
/// `facing` is kept canonical by construction and by the battlefield's
/// facing setters; range accessors assert that invariant in debug builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub archetype: Archetype,
    pub clan: Clan,
    pub position: Position,
    pub facing: Position,
    pub health: i32,
    pub marching: bool,
    pub group: u32,
    pub priority: i32,
}

impl Unit {
    /// Creates a unit with full health, marching, and the archetype's
    /// default priority. Rejects non-canonical facings.
    pub fn new(
        id: UnitId,
        archetype: Archetype,
        clan: Clan,
        position: Position,
        facing: Position,
    ) -> Result<Unit, DirectionError> {
        if !facing.is_canonical_direction() {
            return Err(DirectionError::InvalidDirection(facing));
        }
        Ok(Unit {
            id,
            archetype,
            clan,
            position,
            facing,
            health: archetype.stats().base_health,
            marching: true,
            group: 1,
            priority: archetype.stats().priority,
        })
    }

    /// Board-absolute cells threatened by this unit, recomputed from the
    /// current position and facing.
    pub fn attack_range(&self) -> Vec<Position> {
        self.rotated_range(self.archetype.stats().attack_offsets)
    }

    /// Board-absolute cells shielded by this unit's guardian defense.
    pub fn defense_range(&self) -> Vec<Position> {
        self.rotated_range(self.archetype.stats().defense_offsets)
    }

    /// The cell one step ahead when marching, or `None` when halted.
    pub fn move_destination(&self) -> Option<Position> {
        if self.marching {
            Some(self.position + self.facing)
        } else {
            None
        }
    }

    fn rotated_range(&self, offsets: &[Position]) -> Vec<Position> {
        debug_assert!(self.facing.is_canonical_direction());
        offsets
            .iter()
            .filter_map(|&offset| offset.rotate(self.facing).ok())
            .map(|offset| self.position + offset)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position::{BACKWARD, FORWARD, RIGHT};

    fn militia(position: Position, facing: Position) -> Unit {
        Unit::new(UnitId(1), Archetype::Militia, Clan::Ally, position, facing).unwrap()
    }

    #[test]
    fn clan_opponent_flips() {
        assert_eq!(Clan::Ally.opponent(), Clan::Enemy);
        assert_eq!(Clan::Enemy.opponent(), Clan::Ally);
    }

    #[test]
    fn clan_name_roundtrip() {
        for clan in [Clan::Ally, Clan::Enemy] {
            assert_eq!(Clan::from_name(clan.name()), Some(clan));
        }
        assert_eq!(Clan::from_name("neutral"), None);
    }

    #[test]
    fn new_unit_defaults() {
        let unit = militia(Position::new(2, 3), FORWARD);
        assert_eq!(unit.health, 5);
        assert_eq!(unit.priority, 1);
        assert_eq!(unit.group, 1);
        assert!(unit.marching);
    }

    #[test]
    fn new_unit_rejects_bad_facing() {
        let result = Unit::new(
            UnitId(1),
            Archetype::Militia,
            Clan::Ally,
            Position::new(0, 0),
            Position::new(1, 1),
        );
        assert_eq!(
            result,
            Err(DirectionError::InvalidDirection(Position::new(1, 1)))
        );
    }

    #[test]
    fn attack_range_facing_forward() {
        let unit = militia(Position::new(2, 3), FORWARD);
        assert_eq!(
            unit.attack_range(),
            vec![Position::new(1, 3), Position::new(3, 3), Position::new(2, 4)]
        );
    }

    #[test]
    fn attack_range_rotates_with_facing() {
        // Facing east: the left flank offset now points forward-of-board.
        let unit = militia(Position::new(2, 3), RIGHT);
        assert_eq!(
            unit.attack_range(),
            vec![Position::new(2, 4), Position::new(2, 2), Position::new(3, 3)]
        );
    }

    #[test]
    fn attack_range_tracks_mutation() {
        let mut unit = militia(Position::new(2, 3), FORWARD);
        let before = unit.attack_range();
        unit.position = Position::new(5, 5);
        unit.facing = BACKWARD;
        let after = unit.attack_range();
        assert_ne!(before, after);
        assert_eq!(
            after,
            vec![Position::new(6, 5), Position::new(4, 5), Position::new(5, 4)]
        );
    }

    #[test]
    fn move_destination_follows_facing() {
        let mut unit = militia(Position::new(2, 3), FORWARD);
        assert_eq!(unit.move_destination(), Some(Position::new(2, 4)));
        unit.facing = RIGHT;
        assert_eq!(unit.move_destination(), Some(Position::new(3, 3)));
        unit.marching = false;
        assert_eq!(unit.move_destination(), None);
    }

    #[test]
    fn guardian_defense_range_rotates() {
        let unit = Unit::new(
            UnitId(2),
            Archetype::Guardian,
            Clan::Ally,
            Position::new(3, 3),
            RIGHT,
        )
        .unwrap();
        // Forward arc rotated to point east.
        assert_eq!(
            unit.defense_range(),
            vec![
                Position::new(4, 3),
                Position::new(4, 4),
                Position::new(4, 2),
                Position::new(5, 4),
                Position::new(5, 2),
            ]
        );
    }
}

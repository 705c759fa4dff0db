//! Unit archetypes and their immutable stat tables.
//!
//! Behavioral differences between unit kinds are data, not dispatch: every
//! kind is an [`Archetype`] variant pointing at a `const` stats record with
//! its attack power, forward-relative range geometry, defense values, and
//! movement priority.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Immutable per-kind stats shared by every unit of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeStats {
    /// Health assigned at construction.
    pub base_health: i32,
    /// Attack power contributed to each cell of the attack range.
    pub attack: i32,
    /// Forward-relative offsets threatened by the unit.
    pub attack_offsets: &'static [Position],
    /// Forward-relative offsets shielded with `guardian_defense`.
    pub defense_offsets: &'static [Position],
    /// Defense applied to the unit's own occupied cell.
    pub self_defense: i32,
    /// Defense projected onto each cell of the defense range.
    pub guardian_defense: i32,
    /// Whether the unit's attack also feeds the opposing clan's attack grid.
    pub friendly_fire: bool,
    /// Default movement priority; higher wins contested destinations.
    pub priority: i32,
}

const MILITIA: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 1,
    attack_offsets: &[Position::new(-1, 0), Position::new(1, 0), Position::new(0, 1)],
    defense_offsets: &[],
    self_defense: 0,
    guardian_defense: 0,
    friendly_fire: false,
    priority: 1,
};

const SWORD: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 1,
    attack_offsets: &[Position::new(0, 1), Position::new(-1, 0), Position::new(1, 0)],
    defense_offsets: &[],
    self_defense: 0,
    guardian_defense: 0,
    friendly_fire: false,
    priority: 1,
};

const SPEAR: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 2,
    attack_offsets: &[Position::new(0, 1), Position::new(0, 2)],
    defense_offsets: &[],
    self_defense: 0,
    guardian_defense: 0,
    friendly_fire: false,
    priority: 1,
};

const CAPTAIN: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 1,
    attack_offsets: &[Position::new(0, 1)],
    defense_offsets: &[],
    self_defense: 1,
    guardian_defense: 0,
    friendly_fire: false,
    priority: 2,
};

const SHIELD: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 0,
    attack_offsets: &[],
    defense_offsets: &[Position::new(0, -1)],
    self_defense: 2,
    guardian_defense: 2,
    friendly_fire: false,
    priority: 1,
};

const GUARDIAN: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 0,
    attack_offsets: &[],
    defense_offsets: &[
        Position::new(0, 1),
        Position::new(-1, 1),
        Position::new(1, 1),
        Position::new(-1, 2),
        Position::new(1, 2),
    ],
    self_defense: 0,
    guardian_defense: 1,
    friendly_fire: false,
    priority: 1,
};

const WARRIOR: ArchetypeStats = ArchetypeStats {
    base_health: 5,
    attack: 1,
    attack_offsets: &[
        Position::new(0, 1),
        Position::new(0, 2),
        Position::new(-1, 0),
        Position::new(1, 0),
        Position::new(1, 1),
        Position::new(-1, 1),
    ],
    defense_offsets: &[],
    self_defense: 0,
    guardian_defense: 0,
    friendly_fire: true,
    priority: 1,
};

/// A unit kind. The variant selects a row in the immutable stats table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Militia,
    Sword,
    Spear,
    Captain,
    Shield,
    Guardian,
    Warrior,
}

/// All archetypes, in stats-table order.
pub const ALL_ARCHETYPES: [Archetype; 7] = [
    Archetype::Militia,
    Archetype::Sword,
    Archetype::Spear,
    Archetype::Captain,
    Archetype::Shield,
    Archetype::Guardian,
    Archetype::Warrior,
];

impl Archetype {
    /// Returns the immutable stats for this kind.
    pub const fn stats(self) -> &'static ArchetypeStats {
        match self {
            Archetype::Militia => &MILITIA,
            Archetype::Sword => &SWORD,
            Archetype::Spear => &SPEAR,
            Archetype::Captain => &CAPTAIN,
            Archetype::Shield => &SHIELD,
            Archetype::Guardian => &GUARDIAN,
            Archetype::Warrior => &WARRIOR,
        }
    }

    /// Returns the lowercase name used by the command protocol.
    pub const fn name(self) -> &'static str {
        match self {
            Archetype::Militia => "militia",
            Archetype::Sword => "sword",
            Archetype::Spear => "spear",
            Archetype::Captain => "captain",
            Archetype::Shield => "shield",
            Archetype::Guardian => "guardian",
            Archetype::Warrior => "warrior",
        }
    }

    /// Parses an archetype from its lowercase protocol name.
    pub fn from_name(s: &str) -> Option<Archetype> {
        ALL_ARCHETYPES.into_iter().find(|a| a.name() == s)
    }

    /// Single-character tag used by the grid renderer.
    pub const fn tag(self) -> char {
        match self {
            Archetype::Militia => 'M',
            Archetype::Sword => 'X',
            Archetype::Spear => 'S',
            Archetype::Captain => 'C',
            Archetype::Shield => 'H',
            Archetype::Guardian => 'G',
            Archetype::Warrior => 'W',
        }
    }
}

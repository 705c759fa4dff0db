//! JSON scenario files.
//!
//! A scenario is a JSON array of spawn descriptors applied to the board in
//! file order. Descriptors are staged and committed only when every
//! placement validates, so a typo in the file surfaces as an error and
//! leaves the board untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Archetype, Battlefield, Clan, PlacementError, Position, UnitId};

/// One unit placement in a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    pub kind: Archetype,
    pub clan: Clan,
    pub x: i32,
    pub y: i32,
    pub facing: Position,
    #[serde(default)]
    pub group: Option<u32>,
}

/// Failure to read, parse, or apply a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("descriptor {index}: {source}")]
    Placement {
        index: usize,
        source: PlacementError,
    },
}

/// Reads a scenario file and spawns every descriptor onto the board.
/// Returns the assigned ids in file order.
pub fn load_scenario(
    field: &mut Battlefield,
    path: impl AsRef<Path>,
) -> Result<Vec<UnitId>, ScenarioError> {
    let text = fs::read_to_string(path)?;
    let descriptors: Vec<SpawnDescriptor> = serde_json::from_str(&text)?;
    apply_descriptors(field, &descriptors)
}

/// Spawns a parsed descriptor list onto the board. All placements are
/// staged first; an invalid descriptor leaves the board unchanged.
pub fn apply_descriptors(
    field: &mut Battlefield,
    descriptors: &[SpawnDescriptor],
) -> Result<Vec<UnitId>, ScenarioError> {
    let mut staged = field.clone();
    let mut ids = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        let position = Position::new(descriptor.x, descriptor.y);
        let id = staged
            .insert(descriptor.kind, descriptor.clan, position, descriptor.facing)
            .map_err(|source| ScenarioError::Placement { index, source })?;
        if let Some(group) = descriptor.group {
            let _ = staged.set_group(id, group);
        }
        ids.push(id);
    }
    *field = staged;
    Ok(ids)
}

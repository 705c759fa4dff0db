//! Simultaneous movement resolution.
//!
//! Turns the multimap of destination -> requesting units into a
//! conflict-free assignment with at most one winner per destination. The
//! pipeline runs in a strict order: boundary filter, occupied-cell filter,
//! priority arbitration, the reciprocal-swap filter, and a final stranded
//! filter dropping winners whose destination occupant ends up not moving.
//! Dropped requests are silently discarded; no request failure aborts the
//! batch.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::{Battlefield, Position, UnitId};

/// A single unit's movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub unit: UnitId,
    pub from: Position,
    pub priority: i32,
}

/// Destination -> requesting units, ordered for deterministic arbitration.
pub type RequestMap = BTreeMap<Position, Vec<MoveRequest>>;

/// Gathers every marching unit's forward destination into a request map.
/// Requester lists are sorted by unit id so a seeded rng resolves ties
/// reproducibly.
pub fn collect_requests(field: &Battlefield) -> RequestMap {
    let mut requests: RequestMap = BTreeMap::new();
    for unit in field.units() {
        if let Some(destination) = unit.move_destination() {
            requests.entry(destination).or_default().push(MoveRequest {
                unit: unit.id,
                from: unit.position,
                priority: unit.priority,
            });
        }
    }
    for requesters in requests.values_mut() {
        requesters.sort_by_key(|r| r.unit);
    }
    requests
}

/// Drops destinations that fall outside the board.
pub fn filter_out_of_bounds(requests: &mut RequestMap, rows: i32, cols: i32) {
    requests.retain(|destination, _| destination.in_bounds(rows, cols));
}

/// Drops destinations occupied by a non-marching unit. A marching occupant
/// does not block entry here; if its own request is later dropped, the
/// stranded filter removes the entrant at the end of the pipeline.
pub fn filter_blocked(requests: &mut RequestMap, field: &Battlefield) {
    requests.retain(|destination, _| match field.unit_at(*destination) {
        Some(occupant) => occupant.marching,
        None => true,
    });
}

/// Reduces each destination's requester list to a single winner: only
/// maximum-priority requesters survive, and a remaining tie is broken
/// uniformly at random.
pub fn arbitrate(requests: RequestMap, rng: &mut SmallRng) -> BTreeMap<Position, MoveRequest> {
    let mut winners = BTreeMap::new();
    for (destination, requesters) in requests {
        let top = match requesters.iter().map(|r| r.priority).max() {
            Some(p) => p,
            None => continue,
        };
        let contenders: Vec<&MoveRequest> =
            requesters.iter().filter(|r| r.priority == top).collect();
        let chosen = if contenders.len() == 1 {
            contenders[0]
        } else {
            contenders[rng.gen_range(0..contenders.len())]
        };
        let _ = winners.insert(destination, *chosen);
    }
    winners
}

/// Removes both sides of reciprocal pairs: a winner into an occupied cell
/// whose marching occupant is itself the winner into the first unit's
/// origin. Units may not pass through each other.
pub fn filter_swaps(winners: &mut BTreeMap<Position, MoveRequest>, field: &Battlefield) {
    let mut cancelled: BTreeSet<Position> = BTreeSet::new();
    for (&destination, request) in winners.iter() {
        if cancelled.contains(&destination) {
            continue;
        }
        let occupant = match field.unit_at(destination) {
            Some(unit) if unit.marching => unit,
            _ => continue,
        };
        if let Some(reverse) = winners.get(&request.from) {
            if reverse.unit == occupant.id {
                let _ = cancelled.insert(destination);
                let _ = cancelled.insert(request.from);
            }
        }
    }
    for destination in cancelled {
        let _ = winners.remove(&destination);
    }
}

/// Drops winners whose destination is occupied by a unit that is not itself
/// moving. A marching occupant passes the blocked filter on the premise that
/// it vacates, but its own request may have been dropped later in the
/// pipeline; removing one stranded winner can strand the next in a chain, so
/// this runs to a fixed point.
pub fn filter_stranded(winners: &mut BTreeMap<Position, MoveRequest>, field: &Battlefield) {
    loop {
        let movers: BTreeSet<UnitId> = winners.values().map(|r| r.unit).collect();
        let stranded: Vec<Position> = winners
            .keys()
            .filter(|&&destination| {
                matches!(field.unit_at(destination), Some(occupant) if !movers.contains(&occupant.id))
            })
            .copied()
            .collect();
        if stranded.is_empty() {
            break;
        }
        for destination in stranded {
            let _ = winners.remove(&destination);
        }
    }
}

/// Runs the full pipeline over a request map and returns the conflict-free
/// destination -> unit assignment.
pub fn resolve_moves(
    mut requests: RequestMap,
    field: &Battlefield,
    rng: &mut SmallRng,
) -> BTreeMap<Position, UnitId> {
    filter_out_of_bounds(&mut requests, field.rows(), field.cols());
    filter_blocked(&mut requests, field);
    let mut winners = arbitrate(requests, rng);
    filter_swaps(&mut winners, field);
    filter_stranded(&mut winners, field);
    winners
        .into_iter()
        .map(|(destination, request)| (destination, request.unit))
        .collect()
}

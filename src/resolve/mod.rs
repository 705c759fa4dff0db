//! Movement resolution pipeline.

pub mod movement;

pub use movement::{
    arbitrate, collect_requests, filter_blocked, filter_out_of_bounds, filter_stranded,
    filter_swaps, resolve_moves, MoveRequest, RequestMap,
};

//! Skirmish engine library.
//!
//! Exposes the board representation, movement resolver, turn engine, patrol
//! collaborator, and protocol modules for use by integration tests and the
//! binary entry point.

pub mod board;
pub mod engine;
pub mod patrol;
pub mod protocol;
pub mod resolve;

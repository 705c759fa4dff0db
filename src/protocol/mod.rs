//! Session command protocol.
//!
//! This module implements the line-command parser for the main loop, text
//! rendering for the board and the combat grids, and JSON scenario loading.

pub mod parser;
pub mod render;
pub mod scenario;

pub use parser::{parse_command, parse_direction, Command, CommandError};
pub use render::{render_field, render_intensity};
pub use scenario::{apply_descriptors, load_scenario, ScenarioError, SpawnDescriptor};

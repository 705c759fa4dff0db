//! Line-command parser.
//!
//! Parses incoming session commands from raw text into structured
//! `Command` variants that the binary main loop can dispatch on.

use thiserror::Error;

use crate::board::{Archetype, Clan, Position, BACKWARD, FORWARD, LEFT, RIGHT};

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place a new unit: `spawn <kind> <clan> <x> <y> <dir> [g<N>]`.
    Spawn {
        kind: Archetype,
        clan: Clan,
        position: Position,
        facing: Position,
        group: Option<u32>,
    },

    /// Re-face every unit in a group: `face <group> <dir>`.
    Face { group: u32, facing: Position },

    /// Toggle the marching flag for a group: `march <group>`.
    March { group: u32 },

    /// Run one movement trigger.
    StepMove,

    /// Run one combat trigger.
    StepCombat,

    /// Print the ASCII board.
    Show,

    /// Print a clan's attack, defense, and result grids: `grids <clan>`.
    Grids { clan: Clan },

    /// Print the unit roster as JSON.
    Snapshot,

    /// Reseed the engine rng: `seed <n>`.
    Seed { seed: u64 },

    /// Spawn units from a JSON scenario file: `load <path>`.
    Load { path: String },

    /// Install the enemy patrol on the movement cadence:
    /// `patrol <interval> <wave-size>`. An interval of zero disables it.
    Patrol { interval: u64, wave: usize },

    /// Terminate the session.
    Quit,
}

/// Rejection reasons for a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: '{0}'")]
    Unknown(String),

    #[error("malformed {command}: expected '{usage}'")]
    Malformed {
        command: &'static str,
        usage: &'static str,
    },

    #[error("unknown archetype: '{0}'")]
    UnknownArchetype(String),

    #[error("unknown clan: '{0}'")]
    UnknownClan(String),

    #[error("unknown direction: '{0}'")]
    UnknownDirection(String),

    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}

/// Parses a single line of input into a `Command`.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = tokens.first() else {
        return Err(CommandError::Empty);
    };

    match head {
        "quit" => Ok(Command::Quit),
        "show" => Ok(Command::Show),
        "snapshot" => Ok(Command::Snapshot),

        "spawn" => parse_spawn(&tokens),
        "face" => parse_face(&tokens),
        "march" => parse_march(&tokens),
        "step" => parse_step(&tokens),
        "grids" => parse_grids(&tokens),
        "seed" => parse_seed(&tokens),
        "load" => parse_load(&tokens),
        "patrol" => parse_patrol(&tokens),

        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Parses a direction token. Accepts the long names and one-letter forms.
pub fn parse_direction(token: &str) -> Result<Position, CommandError> {
    match token {
        "forward" | "f" => Ok(FORWARD),
        "right" | "r" => Ok(RIGHT),
        "backward" | "b" => Ok(BACKWARD),
        "left" | "l" => Ok(LEFT),
        other => Err(CommandError::UnknownDirection(other.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(token: &str) -> Result<T, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidNumber(token.to_string()))
}

/// Parses `spawn <kind> <clan> <x> <y> <dir> [g<N>]`.
fn parse_spawn(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() < 6 || tokens.len() > 7 {
        return Err(CommandError::Malformed {
            command: "spawn",
            usage: "spawn <kind> <clan> <x> <y> <dir> [g<N>]",
        });
    }

    let kind = Archetype::from_name(tokens[1])
        .ok_or_else(|| CommandError::UnknownArchetype(tokens[1].to_string()))?;
    let clan = Clan::from_name(tokens[2])
        .ok_or_else(|| CommandError::UnknownClan(tokens[2].to_string()))?;
    let x = parse_number::<i32>(tokens[3])?;
    let y = parse_number::<i32>(tokens[4])?;
    let facing = parse_direction(tokens[5])?;

    let group = match tokens.get(6) {
        Some(tag) => match tag.strip_prefix('g') {
            Some(digits) => Some(parse_number::<u32>(digits)?),
            None => {
                return Err(CommandError::Malformed {
                    command: "spawn",
                    usage: "spawn <kind> <clan> <x> <y> <dir> [g<N>]",
                })
            }
        },
        None => None,
    };

    Ok(Command::Spawn {
        kind,
        clan,
        position: Position::new(x, y),
        facing,
        group,
    })
}

/// Parses `face <group> <dir>`.
fn parse_face(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 3 {
        return Err(CommandError::Malformed {
            command: "face",
            usage: "face <group> <dir>",
        });
    }
    let group = parse_number::<u32>(tokens[1])?;
    let facing = parse_direction(tokens[2])?;
    Ok(Command::Face { group, facing })
}

/// Parses `march <group>`.
fn parse_march(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 2 {
        return Err(CommandError::Malformed {
            command: "march",
            usage: "march <group>",
        });
    }
    let group = parse_number::<u32>(tokens[1])?;
    Ok(Command::March { group })
}

/// Parses `step move` and `step combat`.
fn parse_step(tokens: &[&str]) -> Result<Command, CommandError> {
    match tokens.get(1) {
        Some(&"move") => Ok(Command::StepMove),
        Some(&"combat") => Ok(Command::StepCombat),
        _ => Err(CommandError::Malformed {
            command: "step",
            usage: "step move|combat",
        }),
    }
}

/// Parses `grids <clan>`.
fn parse_grids(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 2 {
        return Err(CommandError::Malformed {
            command: "grids",
            usage: "grids <clan>",
        });
    }
    let clan = Clan::from_name(tokens[1])
        .ok_or_else(|| CommandError::UnknownClan(tokens[1].to_string()))?;
    Ok(Command::Grids { clan })
}

/// Parses `seed <n>`.
fn parse_seed(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 2 {
        return Err(CommandError::Malformed {
            command: "seed",
            usage: "seed <n>",
        });
    }
    let seed = parse_number::<u64>(tokens[1])?;
    Ok(Command::Seed { seed })
}

/// Parses `load <path>`.
fn parse_load(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 2 {
        return Err(CommandError::Malformed {
            command: "load",
            usage: "load <path>",
        });
    }
    Ok(Command::Load {
        path: tokens[1].to_string(),
    })
}

/// Parses `patrol <interval> <wave-size>`.
fn parse_patrol(tokens: &[&str]) -> Result<Command, CommandError> {
    if tokens.len() != 3 {
        return Err(CommandError::Malformed {
            command: "patrol",
            usage: "patrol <interval> <wave-size>",
        });
    }
    let interval = parse_number::<u64>(tokens[1])?;
    let wave = parse_number::<usize>(tokens[2])?;
    Ok(Command::Patrol { interval, wave })
}

//! Skirmish -- a grid combat step resolver driven by line commands.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Movement and combat advance only on explicit `step` commands.

use std::io::{self, BufRead, Write};

use skirmish::board::Clan;
use skirmish::engine::TurnEngine;
use skirmish::patrol::EnemyPatrol;
use skirmish::protocol::{
    load_scenario, parse_command, render_field, render_intensity, Command,
};

const ROWS: i32 = 8;
const COLS: i32 = 8;

/// Runs the main command loop, reading from stdin and writing responses
/// to stdout.
fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = TurnEngine::new(ROWS, COLS);

    for line in stdin.lock().lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Ok(c) => c,
            Err(e) => {
                if !line.trim().is_empty() {
                    eprintln!("{}", e);
                }
                continue;
            }
        };

        match cmd {
            Command::Spawn {
                kind,
                clan,
                position,
                facing,
                group,
            } => match engine.spawn(kind, clan, position, facing) {
                Ok(id) => {
                    if let Some(group) = group {
                        let _ = engine.field_mut().set_group(id, group);
                    }
                    writeln!(out, "spawned {}", id.0)?;
                }
                Err(e) => eprintln!("{}", e),
            },
            Command::Face { group, facing } => match engine.field_mut().set_group_facing(group, facing) {
                Ok(count) => writeln!(out, "faced {}", count)?,
                Err(e) => eprintln!("{}", e),
            },
            Command::March { group } => {
                let count = engine.field_mut().toggle_group_marching(group);
                writeln!(out, "marching {}", count)?;
            }
            Command::StepMove => {
                let moves = engine.resolve_movement();
                writeln!(out, "moved {}", moves.len())?;
            }
            Command::StepCombat => {
                let report = engine.resolve_combat();
                writeln!(out, "damage {}", report.total_damage())?;
            }
            Command::Show => {
                write!(out, "{}", render_field(engine.field()))?;
            }
            Command::Grids { clan } => {
                print_grids(&mut out, &engine, clan)?;
            }
            Command::Snapshot => {
                let views: Vec<_> = engine.field().snapshot().into_values().collect();
                match serde_json::to_string(&views) {
                    Ok(json) => writeln!(out, "{}", json)?,
                    Err(e) => eprintln!("{}", e),
                }
            }
            Command::Seed { seed } => {
                engine.reseed(seed);
                writeln!(out, "seeded")?;
            }
            Command::Load { path } => match load_scenario(engine.field_mut(), &path) {
                Ok(ids) => writeln!(out, "loaded {}", ids.len())?,
                Err(e) => eprintln!("{}", e),
            },
            Command::Patrol { interval, wave } => {
                engine.set_collaborator(interval, Box::new(EnemyPatrol::new(wave)));
                writeln!(out, "patrol {}", interval)?;
            }
            Command::Quit => break,
        }
        out.flush()?;
    }
    out.flush()
}

/// Writes a clan's attack, defense, and net-result grids.
fn print_grids(out: &mut impl Write, engine: &TurnEngine, clan: Clan) -> io::Result<()> {
    let field = engine.field();
    writeln!(out, "attack {}", clan.name())?;
    write!(
        out,
        "{}",
        render_intensity(&field.attack_grid(clan), field.rows(), field.cols())
    )?;
    writeln!(out, "defense {}", clan.name())?;
    write!(
        out,
        "{}",
        render_intensity(&field.defense_grid(clan), field.rows(), field.cols())
    )?;
    writeln!(out, "result {}", clan.name())?;
    write!(
        out,
        "{}",
        render_intensity(&field.attack_result(clan), field.rows(), field.cols())
    )?;
    Ok(())
}

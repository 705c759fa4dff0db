//! Text rendering for the board and the combat grids.
//!
//! Rows are printed top first, so the highest `y` appears on the first line
//! and the origin sits at the bottom left.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::board::{Battlefield, Clan, Position};

/// Renders the occupancy map with threat overlays.
///
/// Unit cells print as `*T h*` (archetype tag and current health). Empty
/// cells threatened by exactly one clan print `# a #` or `# e #`, cells
/// threatened by both print `# * #`, and quiet cells print `  o  `.
pub fn render_field(field: &Battlefield) -> String {
    let ally = field.attack_grid(Clan::Ally);
    let enemy = field.attack_grid(Clan::Enemy);

    let mut out = String::new();
    for y in (0..field.rows()).rev() {
        for x in 0..field.cols() {
            let cell = Position::new(x, y);
            if x > 0 {
                out.push(' ');
            }
            if let Some(unit) = field.unit_at(cell) {
                let _ = write!(out, "*{} {}*", unit.archetype.tag(), unit.health);
            } else {
                let threat = match (ally.contains_key(&cell), enemy.contains_key(&cell)) {
                    (true, true) => "# * #",
                    (true, false) => "# a #",
                    (false, true) => "# e #",
                    (false, false) => "  o  ",
                };
                out.push_str(threat);
            }
        }
        out.push('\n');
    }
    out
}

/// Renders a per-cell grid of magnitudes. Cells absent from the map print
/// as a dot.
pub fn render_intensity(grid: &BTreeMap<Position, i32>, rows: i32, cols: i32) -> String {
    let mut out = String::new();
    for y in (0..rows).rev() {
        for x in 0..cols {
            match grid.get(&Position::new(x, y)) {
                Some(value) => {
                    let _ = write!(out, "{:>3}", value);
                }
                None => out.push_str("  ."),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Archetype, BACKWARD, FORWARD};

    #[test]
    fn field_renders_units_and_threat_overlays() {
        let mut field = Battlefield::new(3, 3);
        field
            .insert(Archetype::Spear, Clan::Ally, Position::new(0, 0), FORWARD)
            .unwrap();
        field
            .insert(Archetype::Militia, Clan::Enemy, Position::new(2, 2), BACKWARD)
            .unwrap();

        // Spear threatens (0,1) and (0,2); militia threatens (1,2), (2,1),
        // and its backward cell off its own row.
        let text = render_field(&field);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "# a # # e # *M 5*");
        assert_eq!(lines[1], "# a #   o   # e #");
        assert_eq!(lines[2], "*S 5*   o     o  ");
    }

    #[test]
    fn overlapping_threat_renders_as_star() {
        let mut field = Battlefield::new(3, 3);
        field
            .insert(Archetype::Spear, Clan::Ally, Position::new(1, 0), FORWARD)
            .unwrap();
        field
            .insert(Archetype::Spear, Clan::Enemy, Position::new(1, 2), BACKWARD)
            .unwrap();

        let text = render_field(&field);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  o   # * #   o  ");
    }

    #[test]
    fn intensity_grid_prints_values_top_row_first() {
        let mut grid = BTreeMap::new();
        grid.insert(Position::new(0, 1), 3);
        grid.insert(Position::new(1, 0), 12);

        let text = render_intensity(&grid, 2, 2);
        assert_eq!(text, "  3  .\n  . 12\n");
    }

    #[test]
    fn empty_field_renders_all_quiet() {
        let field = Battlefield::new(2, 2);
        assert_eq!(render_field(&field), "  o     o  \n  o     o  \n");
    }
}

//! ASCII board dump.
//!
//! Renders a simulation snapshot for quick terminal review:
//!
//! | Glyph | Meaning |
//! |---|---|
//! | `.` | empty ground |
//! | `#` | blocked terrain |
//! | `*` | path marker of the selected unit |
//! | `C` `F` `W` | command unit, fighter, worker of team 1 |
//! | `c` `f` `w` | the same for every other team |
//! | `S` | unclaimed structure |
//! | `1`..`9` | structure claimed by that team |
//! | `+` | structure claimed by team 10 or above |
//!
//! A unit standing on a structure hides it.

use std::fmt::Write as _;

use skirmish_core::grid::TileState;
use skirmish_core::players::{TeamId, WorldView};
use skirmish_core::simulation::Simulation;

/// Glyph for a unit of `team`.
fn unit_char(glyph: char, team: TeamId) -> char {
    if team.0 == 1 {
        glyph.to_ascii_uppercase()
    } else {
        glyph.to_ascii_lowercase()
    }
}

fn structure_char(claimant: Option<TeamId>) -> char {
    match claimant {
        None => 'S',
        Some(team) => char::from_digit(team.0, 10).unwrap_or('+'),
    }
}

/// Render the board as one line per row.
pub fn render_board(view: &WorldView<'_>) -> String {
    let grid = view.grid();
    let mut out = String::with_capacity(((grid.cols() + 1) * grid.rows()) as usize);

    for tile in grid.tiles() {
        let glyph = if let Some(unit) = tile.occupant.and_then(|id| view.unit(id)) {
            unit_char(unit.kind.glyph(), unit.team)
        } else if let Some(structure) = tile
            .structure
            .and_then(|id| view.structures().find(|s| s.id == id))
        {
            structure_char(structure.claimant)
        } else {
            match tile.state {
                TileState::Empty => '.',
                TileState::Blocked => '#',
                TileState::PathMarker => '*',
            }
        };
        out.push(glyph);
        if tile.coord.col + 1 == grid.cols() {
            out.push('\n');
        }
    }
    out
}

/// One status line per team plus the match state.
pub fn render_summary(sim: &Simulation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "tick {} | {} | {} units | {} structures",
        sim.tick_count(),
        sim.status(),
        sim.units().count(),
        sim.structures().count()
    );
    for player in sim.players() {
        let claimed = sim
            .structures()
            .filter(|s| s.is_claimed_by(player.id))
            .count();
        let _ = writeln!(
            out,
            "  team {}: {} resources, {} units, {} structures ({})",
            player.id,
            player.resources,
            player.roster.len(),
            claimed,
            player.policy_name().unwrap_or("human")
        );
    }
    out
}

/// Board plus summary.
pub fn render_snapshot(sim: &Simulation) -> String {
    let mut out = render_board(&sim.view());
    out.push_str(&render_summary(sim));
    out
}

//! Test fixtures and helpers.
//!
//! Boards are drawn as ASCII so scenarios read like the situation they
//! test:
//!
//! | Glyph | Meaning |
//! |---|---|
//! | `.` | empty ground |
//! | `#` | blocked terrain |
//! | `C` `F` `W` | red command unit, fighter (combatant), worker |
//! | `c` `f` `w` | blue command unit, fighter, worker |
//! | `S` | unclaimed structure producing combatants |
//! | `1` `2` | structure claimed by red / blue, producing combatants |
//!
//! Units are created in row-major order, so ids are predictable.

use fixed::types::I32F32;
use skirmish_core::config::SimConfig;
use skirmish_core::grid::{Grid, TileCoord, TileState};
use skirmish_core::math::Fixed;
use skirmish_core::players::TeamId;
use skirmish_core::scheduler::TimerFires;
use skirmish_core::simulation::Simulation;
use skirmish_core::structures::StructureId;
use skirmish_core::units::{UnitId, UnitKind};

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Shorthand for a tile coordinate.
#[must_use]
pub const fn tc(row: u32, col: u32) -> TileCoord {
    TileCoord::new(row, col)
}

/// Default tunables with a fixed hit chance.
#[must_use]
pub fn config_with_hit_chance(seed: u64, hit_chance: Fixed) -> SimConfig {
    SimConfig {
        hit_chance,
        ..SimConfig::with_seed(seed)
    }
}

/// Only the movement timer.
pub const MOVE: TimerFires = TimerFires {
    mine: false,
    spawn: false,
    movement: true,
    ai: false,
};

/// Only the spawn timer.
pub const SPAWN: TimerFires = TimerFires {
    mine: false,
    spawn: true,
    movement: false,
    ai: false,
};

/// Parse an ASCII board into terrain only. Unit glyphs become empty ground.
///
/// # Panics
///
/// Panics on an empty layout or ragged rows.
#[must_use]
pub fn parse_grid(layout: &[&str]) -> Grid {
    assert!(!layout.is_empty(), "layout needs at least one row");
    let cols = layout[0].chars().count();
    let mut grid = Grid::new(layout.len() as u32, cols as u32);
    for (row, line) in layout.iter().enumerate() {
        assert_eq!(line.chars().count(), cols, "ragged row {row}");
        for (col, glyph) in line.chars().enumerate() {
            if glyph == '#' {
                grid.set_state(tc(row as u32, col as u32), TileState::Blocked);
            }
        }
    }
    grid
}

/// A two-team simulation built from an ASCII board.
#[derive(Debug)]
pub struct Scenario {
    /// The simulation, with both teams human-controlled.
    pub sim: Simulation,
    /// Upper-case team.
    pub red: TeamId,
    /// Lower-case team.
    pub blue: TeamId,
}

impl Scenario {
    /// Build a scenario with default tunables.
    #[must_use]
    pub fn parse(layout: &[&str], seed: u64) -> Self {
        Self::with_config(layout, SimConfig::with_seed(seed))
    }

    /// Build a scenario with explicit tunables.
    ///
    /// # Panics
    ///
    /// Panics on unknown glyphs or if the layout cannot be placed.
    #[must_use]
    pub fn with_config(layout: &[&str], config: SimConfig) -> Self {
        let grid = parse_grid(layout);
        let mut sim = Simulation::new(config, grid).expect("valid fixture config");
        let red = sim.add_player(None).expect("red player");
        let blue = sim.add_player(None).expect("blue player");

        for (row, line) in layout.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                let at = tc(row as u32, col as u32);
                let team = if glyph.is_ascii_uppercase() { red } else { blue };
                match glyph {
                    '.' | '#' => {}
                    'C' | 'c' => {
                        sim.spawn_unit(team, UnitKind::CommandCenter, at)
                            .expect("place command unit");
                    }
                    'F' | 'f' => {
                        sim.spawn_unit(team, UnitKind::Combatant, at)
                            .expect("place fighter");
                    }
                    'W' | 'w' => {
                        sim.spawn_unit(team, UnitKind::Worker, at)
                            .expect("place worker");
                    }
                    'S' => {
                        sim.add_structure(at, None, UnitKind::Combatant)
                            .expect("place structure");
                    }
                    '1' => {
                        sim.add_structure(at, Some(red), UnitKind::Combatant)
                            .expect("place red structure");
                    }
                    '2' => {
                        sim.add_structure(at, Some(blue), UnitKind::Combatant)
                            .expect("place blue structure");
                    }
                    other => panic!("unknown glyph {other:?} at {at:?}"),
                }
            }
        }

        Self { sim, red, blue }
    }

    /// The unit standing on `at`.
    ///
    /// # Panics
    ///
    /// Panics if the tile is empty.
    #[must_use]
    pub fn unit_at(&self, at: TileCoord) -> UnitId {
        self.sim
            .grid()
            .occupant(at)
            .unwrap_or_else(|| panic!("no unit on {at:?}"))
    }

    /// The structure bound to `at`.
    ///
    /// # Panics
    ///
    /// Panics if the tile has no structure.
    #[must_use]
    pub fn structure_at(&self, at: TileCoord) -> StructureId {
        self.sim
            .grid()
            .structure_at(at)
            .unwrap_or_else(|| panic!("no structure on {at:?}"))
    }

    /// Step `n` ticks with the given timer fires.
    pub fn step_n(&mut self, n: usize, fires: TimerFires) {
        for _ in 0..n {
            self.sim.step(fires);
        }
    }
}

/// Feed `frames` more frames of the simulated clock into `sim`.
///
/// The clock continues from the simulation's tick count, so repeated calls
/// keep the timers' cadence.
pub fn advance_frames(sim: &mut Simulation, frames: u64, frame_ms: u64) {
    let start = sim.tick_count();
    for frame in 1..=frames {
        sim.tick((start + frame) * frame_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid_walls() {
        let grid = parse_grid(&["#..", ".#.", "..#"]);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert!(!grid.is_traversable(tc(0, 0)));
        assert!(grid.is_traversable(tc(0, 1)));
        assert!(!grid.is_traversable(tc(2, 2)));
    }

    #[test]
    fn test_scenario_places_teams() {
        let scenario = Scenario::parse(&["C.S", "..2", "f.w"], 1);
        let red = scenario.sim.player(scenario.red).unwrap();
        let blue = scenario.sim.player(scenario.blue).unwrap();
        assert_eq!(red.roster.len(), 1);
        assert_eq!(blue.roster.len(), 2);

        let fighter = scenario.unit_at(tc(2, 0));
        assert_eq!(scenario.sim.unit(fighter).unwrap().kind, UnitKind::Combatant);
        assert_eq!(scenario.sim.unit(fighter).unwrap().team, scenario.blue);

        let claimed = scenario.structure_at(tc(1, 2));
        assert_eq!(
            scenario.sim.structure(claimed).unwrap().claimant,
            Some(scenario.blue)
        );
        assert!(scenario.sim.check_invariants().is_ok());
    }

    #[test]
    fn test_advance_frames_keeps_cadence() {
        let mut scenario = Scenario::parse(&["C...c"], 1);
        advance_frames(&mut scenario.sim, 10, 50);
        advance_frames(&mut scenario.sim, 10, 50);
        assert_eq!(scenario.sim.tick_count(), 20);
        // 1000 ms of simulated time: two mining fires for each command unit.
        let red = scenario.sim.player(scenario.red).unwrap();
        assert_eq!(red.resources, 2);
    }
}

//! Adjacency combat and structure capture.
//!
//! Combat is probabilistic and simultaneous: every combatant resolves its
//! own attack each tick, and damage only removes units during the deferred
//! cleanup after all units have acted. Capture is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::grid::{Grid, TileState};
use crate::math::roll;
use crate::players::TeamId;
use crate::structures::{Structure, StructureId};
use crate::units::{Unit, UnitId};

/// Result of one attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackEvent {
    /// Acting unit.
    pub attacker: UnitId,
    /// Randomly chosen adjacent enemy.
    pub target: UnitId,
    /// Damage applied (zero on a miss).
    pub damage: i32,
}

impl AttackEvent {
    /// The roll landed.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.damage > 0
    }
}

/// A structure changing hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Captured structure.
    pub structure: StructureId,
    /// Previous claimant.
    pub previous: Option<TeamId>,
    /// New claimant.
    pub team: TeamId,
    /// Unit whose adjacency caused the capture.
    pub by: UnitId,
}

/// Enemy units on the four orthogonal neighbours of `attacker`.
///
/// Returned in neighbour order (left, right, up, down) so the random pick
/// is reproducible for a given seed.
#[must_use]
pub fn adjacent_enemies(
    grid: &Grid,
    units: &BTreeMap<UnitId, Unit>,
    attacker: &Unit,
) -> Vec<UnitId> {
    grid.neighbors4(attacker.tile)
        .filter_map(|coord| grid.occupant(coord))
        .filter(|id| units.get(id).is_some_and(|u| u.team != attacker.team))
        .collect()
}

/// Pick one adjacent enemy uniformly and roll to hit it.
///
/// Returns `None` when there is nothing to attack. Targets already at zero
/// health are still valid: removal happens after every unit has acted.
pub fn resolve_attack<R: Rng>(
    rng: &mut R,
    config: &SimConfig,
    grid: &Grid,
    units: &mut BTreeMap<UnitId, Unit>,
    attacker_id: UnitId,
) -> Option<AttackEvent> {
    let attacker = units.get(&attacker_id)?;
    if !attacker.kind.is_combatant() {
        return None;
    }

    let targets = adjacent_enemies(grid, units, attacker);
    if targets.is_empty() {
        return None;
    }

    let target = targets[rng.gen_range(0..targets.len())];
    let damage = if roll(rng, config.hit_chance) {
        config.attack_damage
    } else {
        0
    };

    if damage > 0 {
        if let Some(victim) = units.get_mut(&target) {
            victim.health -= damage;
        }
    }

    Some(AttackEvent {
        attacker: attacker_id,
        target,
        damage,
    })
}

/// Capture every adjacent structure not already held by the attacker's team.
///
/// `captured` carries the structures taken earlier in the same tick; they
/// are skipped so a structure changes hands at most once per tick.
pub fn capture_adjacent(
    config: &SimConfig,
    grid: &mut Grid,
    structures: &mut BTreeMap<StructureId, Structure>,
    attacker: &Unit,
    captured: &mut BTreeSet<StructureId>,
) -> Vec<CaptureEvent> {
    if !attacker.kind.is_combatant() {
        return Vec::new();
    }

    let candidates: Vec<StructureId> = grid
        .neighbors4(attacker.tile)
        .filter_map(|coord| grid.structure_at(coord))
        .collect();

    let mut events = Vec::new();
    for id in candidates {
        if captured.contains(&id) {
            continue;
        }
        let Some(structure) = structures.get_mut(&id) else {
            tracing::error!(structure = %id, "Tile references a missing structure");
            continue;
        };
        if structure.is_claimed_by(attacker.team) {
            continue;
        }

        let previous = structure.claimant;
        structure.capture(attacker.team, config.captured_kind, config.spawn_cycles);
        grid.set_state(structure.tile, TileState::Empty);
        captured.insert(id);

        tracing::info!(
            structure = %id,
            team = %attacker.team,
            previous = ?previous,
            "Structure captured"
        );
        events.push(CaptureEvent {
            structure: id,
            previous,
            team: attacker.team,
            by: attacker.id,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileCoord;
    use crate::math::Fixed;
    use crate::units::UnitKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn place(
        grid: &mut Grid,
        units: &mut BTreeMap<UnitId, Unit>,
        id: u32,
        team: u32,
        kind: UnitKind,
        row: u32,
        col: u32,
    ) {
        let coord = TileCoord::new(row, col);
        units.insert(UnitId(id), Unit::new(UnitId(id), TeamId(team), kind, coord));
        grid.set_occupant(coord, Some(UnitId(id)));
    }

    #[test]
    fn test_adjacent_enemies_ignores_friends_and_diagonals() {
        let mut grid = Grid::new(5, 5);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::Combatant, 2, 2);
        place(&mut grid, &mut units, 2, 1, UnitKind::Combatant, 2, 1);
        place(&mut grid, &mut units, 3, 2, UnitKind::Worker, 2, 3);
        place(&mut grid, &mut units, 4, 2, UnitKind::Worker, 1, 1);

        let attacker = units[&UnitId(1)].clone();
        assert_eq!(
            adjacent_enemies(&grid, &units, &attacker),
            vec![UnitId(3)]
        );
    }

    #[test]
    fn test_certain_hit_applies_damage() {
        let mut grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::Combatant, 1, 1);
        place(&mut grid, &mut units, 2, 2, UnitKind::Combatant, 1, 2);
        let config = SimConfig {
            hit_chance: Fixed::ONE,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let event = resolve_attack(&mut rng, &config, &grid, &mut units, UnitId(1));

        assert_eq!(
            event,
            Some(AttackEvent {
                attacker: UnitId(1),
                target: UnitId(2),
                damage: 1
            })
        );
        assert_eq!(
            units[&UnitId(2)].health,
            UnitKind::Combatant.starting_health() - 1
        );
    }

    #[test]
    fn test_certain_miss_leaves_target() {
        let mut grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::Combatant, 1, 1);
        place(&mut grid, &mut units, 2, 2, UnitKind::Worker, 0, 1);
        let config = SimConfig {
            hit_chance: Fixed::ZERO,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let event = resolve_attack(&mut rng, &config, &grid, &mut units, UnitId(1));
        assert!(event.is_some_and(|e| !e.is_hit()));
        assert_eq!(units[&UnitId(2)].health, UnitKind::Worker.starting_health());
    }

    #[test]
    fn test_non_combatants_do_not_attack() {
        let mut grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::CommandCenter, 1, 1);
        place(&mut grid, &mut units, 2, 2, UnitKind::Combatant, 1, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let event = resolve_attack(&mut rng, &SimConfig::default(), &grid, &mut units, UnitId(1));
        assert!(event.is_none());
    }

    #[test]
    fn test_capture_once_per_tick() {
        let mut grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::Combatant, 0, 1);
        place(&mut grid, &mut units, 2, 2, UnitKind::Combatant, 2, 1);

        let tile = TileCoord::new(1, 1);
        let mut structures = BTreeMap::new();
        structures.insert(
            StructureId(1),
            Structure::new(StructureId(1), tile, None, UnitKind::Combatant, 1),
        );
        grid.set_structure(tile, Some(StructureId(1)));

        let config = SimConfig::default();
        let mut captured = BTreeSet::new();
        let first = units[&UnitId(1)].clone();
        let second = units[&UnitId(2)].clone();

        let events = capture_adjacent(&config, &mut grid, &mut structures, &first, &mut captured);
        assert_eq!(events.len(), 1);
        assert_eq!(structures[&StructureId(1)].claimant, Some(TeamId(1)));
        assert_eq!(structures[&StructureId(1)].produces, config.captured_kind);

        let events = capture_adjacent(&config, &mut grid, &mut structures, &second, &mut captured);
        assert!(events.is_empty());
        assert_eq!(structures[&StructureId(1)].claimant, Some(TeamId(1)));
    }

    #[test]
    fn test_own_structure_is_not_recaptured() {
        let mut grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        place(&mut grid, &mut units, 1, 1, UnitKind::Combatant, 0, 1);
        let tile = TileCoord::new(1, 1);
        let mut structures = BTreeMap::new();
        structures.insert(
            StructureId(1),
            Structure::new(StructureId(1), tile, Some(TeamId(1)), UnitKind::Worker, 1),
        );
        grid.set_structure(tile, Some(StructureId(1)));

        let mut captured = BTreeSet::new();
        let attacker = units[&UnitId(1)].clone();
        let events = capture_adjacent(
            &SimConfig::default(),
            &mut grid,
            &mut structures,
            &attacker,
            &mut captured,
        );
        assert!(events.is_empty());
        assert_eq!(structures[&StructureId(1)].produces, UnitKind::Worker);
    }
}

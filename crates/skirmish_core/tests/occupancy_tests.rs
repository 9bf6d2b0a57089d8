//! Board occupancy and routing properties.

use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;
use skirmish_core::config::SimConfig;
use skirmish_core::grid::{Grid, TileCoord};
use skirmish_core::pathfinding::{find_path, is_valid_route};
use skirmish_core::scheduler::TimerFires;
use skirmish_core::simulation::Simulation;
use skirmish_test_utils::determinism::strategies::{
    arb_coord, arb_grid_and_endpoints, arb_unit_kind,
};
use skirmish_test_utils::fixtures::{tc, Scenario, MOVE};

/// Breadth-first distance over free tiles, for checking optimality.
fn bfs_distance(grid: &Grid, start: TileCoord, goal: TileCoord) -> Option<usize> {
    let mut dist = HashMap::from([(start, 0usize)]);
    let mut queue = VecDeque::from([start]);
    while let Some(at) = queue.pop_front() {
        if at == goal {
            return dist.get(&at).copied();
        }
        let next = dist[&at] + 1;
        for n in grid.neighbors4(at) {
            if grid.tile(n).is_some_and(|t| t.is_free()) && !dist.contains_key(&n) {
                dist.insert(n, next);
                queue.push_back(n);
            }
        }
    }
    None
}

#[test]
fn dead_units_free_their_tiles_in_one_pass() {
    let mut scenario = Scenario::parse(&["CWWWWc", ".wwww."], 1);
    let doomed: Vec<_> = scenario
        .sim
        .units()
        .filter(|u| u.kind == skirmish_core::units::UnitKind::Worker)
        .map(|u| u.id)
        .collect();
    for id in &doomed {
        scenario.sim.unit_mut(*id).unwrap().health = 0;
    }

    let events = scenario.sim.step(TimerFires::NONE);

    assert_eq!(events.deaths, doomed);
    assert_eq!(scenario.sim.units().count(), 2);
    for col in 1..5 {
        assert_eq!(scenario.sim.grid().occupant(tc(0, col)), None);
        assert_eq!(scenario.sim.grid().occupant(tc(1, col)), None);
    }
    assert!(scenario.sim.check_invariants().is_ok());
}

#[test]
fn units_swapping_places_wait_instead_of_overlapping() {
    let mut scenario = Scenario::parse(&["CW.Wc"], 1);
    let left = scenario.unit_at(tc(0, 1));
    let right = scenario.unit_at(tc(0, 3));
    scenario.sim.issue_move_order(left, tc(0, 2)).unwrap();
    scenario.sim.issue_move_order(right, tc(0, 2)).unwrap();

    let events = scenario.sim.step(MOVE);

    // The lower id moves first and takes the tile; the other stalls.
    assert_eq!(events.moves.len(), 1);
    assert_eq!(events.stalls, vec![right]);
    assert_eq!(scenario.sim.unit(left).unwrap().tile, tc(0, 2));
    assert_eq!(scenario.sim.unit(right).unwrap().tile, tc(0, 3));
    assert!(scenario.sim.check_invariants().is_ok());
}

#[test]
fn route_is_not_replanned_around_new_obstacles() {
    let mut scenario = Scenario::parse(&["C.....", "......", ".....c"], 1);
    let commander = scenario.unit_at(tc(0, 0));
    scenario.sim.issue_move_order(commander, tc(0, 4)).unwrap();
    let planned: Vec<_> = scenario.sim.unit(commander).unwrap().path.iter().copied().collect();
    scenario
        .sim
        .spawn_unit(scenario.red, skirmish_core::units::UnitKind::Worker, tc(0, 2))
        .unwrap();

    scenario.step_n(5, MOVE);

    let unit = scenario.sim.unit(commander).unwrap();
    assert_eq!(unit.tile, tc(0, 1));
    assert_eq!(unit.blocked_steps, 4);
    assert_eq!(unit.path.iter().copied().collect::<Vec<_>>(), planned[1..]);
}

proptest! {
    #[test]
    fn prop_paths_are_valid_and_shortest(
        (grid, start, goal) in arb_grid_and_endpoints(12, 25),
    ) {
        let path = find_path(&grid, start, goal);
        if path.is_empty() {
            let reachable = start != goal
                && grid.is_traversable(start)
                && bfs_distance(&grid, start, goal).is_some();
            prop_assert!(!reachable, "no path but {:?} -> {:?} is reachable", start, goal);
        } else {
            prop_assert!(is_valid_route(&grid, start, &path));
            prop_assert_eq!(path.last(), Some(&goal));
            prop_assert_eq!(Some(path.len()), bfs_distance(&grid, start, goal));
        }
    }

    #[test]
    fn prop_open_board_paths_are_manhattan(
        rows in 2u32..16,
        cols in 2u32..16,
        seed in any::<u64>(),
    ) {
        let grid = Grid::new(rows, cols);
        let start = tc((seed % u64::from(rows)) as u32, ((seed >> 8) % u64::from(cols)) as u32);
        let goal = tc(((seed >> 16) % u64::from(rows)) as u32, ((seed >> 24) % u64::from(cols)) as u32);
        let path = find_path(&grid, start, goal);
        prop_assert_eq!(path.len() as u32, start.manhattan(goal));
    }

    #[test]
    fn prop_occupancy_holds_every_tick(
        placements in proptest::collection::vec((arb_coord(8, 8), arb_unit_kind(), any::<bool>()), 2..20),
        targets in proptest::collection::vec(arb_coord(8, 8), 20),
        seed in any::<u64>(),
    ) {
        let mut sim = Simulation::new(SimConfig::with_seed(seed), Grid::new(8, 8)).unwrap();
        let red = sim.add_player(None).unwrap();
        let blue = sim.add_player(None).unwrap();

        let mut placed = Vec::new();
        for (at, kind, is_red) in placements {
            let team = if is_red { red } else { blue };
            if let Ok(id) = sim.spawn_unit(team, kind, at) {
                placed.push(id);
            }
        }
        for (id, target) in placed.iter().zip(targets) {
            let _ = sim.issue_move_order(*id, target);
        }

        for _ in 0..60 {
            sim.step(TimerFires::ALL);
            prop_assert!(sim.check_invariants().is_ok(), "{:?}", sim.check_invariants());
            for unit in sim.units() {
                prop_assert_eq!(sim.grid().occupant(unit.tile), Some(unit.id));
            }
            if sim.status().is_terminal() {
                break;
            }
        }
    }
}

//! Grid-based pathfinding using the A* algorithm.
//!
//! Movement is 4-directional with uniform step cost, so Manhattan distance
//! is an admissible and consistent heuristic. Tiles holding a unit are hard
//! obstacles at call time; the route is a snapshot and is never repaired
//! when the board changes later.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{Grid, TileCoord};

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    coord: TileCoord,
    /// f_score = g_score + heuristic.
    f_score: u32,
    /// Discovery order. Earlier discoveries win ties.
    sequence: u64,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so compare reversed for min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Check whether a tile may appear on a route.
fn is_passable(grid: &Grid, coord: TileCoord) -> bool {
    grid.tile(coord).is_some_and(|t| t.is_free())
}

/// Find a shortest route from `start` to `goal`.
///
/// The returned tiles exclude `start` and end at `goal`; consecutive tiles
/// are orthogonally adjacent. An empty route means "no movement needed or
/// possible": either endpoint is off the board or blocked, the goal is
/// occupied, `start == goal`, or the goal is unreachable.
#[must_use]
pub fn find_path(grid: &Grid, start: TileCoord, goal: TileCoord) -> Vec<TileCoord> {
    if start == goal || !grid.is_traversable(start) || !is_passable(grid, goal) {
        return Vec::new();
    }

    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut came_from: HashMap<TileCoord, TileCoord> = HashMap::new();
    let mut g_score: HashMap<TileCoord, u32> = HashMap::new();
    let mut closed: HashSet<TileCoord> = HashSet::new();
    let mut sequence = 0u64;

    g_score.insert(start, 0);
    open_set.push(AStarNode {
        coord: start,
        f_score: start.manhattan(goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return reconstruct_path(&came_from, start, goal);
        }
        if !closed.insert(current.coord) {
            continue;
        }

        let current_g = g_score.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in grid.neighbors4(current.coord) {
            if closed.contains(&neighbor) || !is_passable(grid, neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_score.insert(neighbor, tentative_g);

                sequence += 1;
                open_set.push(AStarNode {
                    coord: neighbor,
                    f_score: tentative_g + neighbor.manhattan(goal),
                    sequence,
                });
            }
        }
    }

    Vec::new()
}

/// Walk `came_from` back from the goal, dropping the start tile.
fn reconstruct_path(
    came_from: &HashMap<TileCoord, TileCoord>,
    start: TileCoord,
    goal: TileCoord,
) -> Vec<TileCoord> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// Check that a route is a contiguous walk from `start` over traversable tiles.
#[must_use]
pub fn is_valid_route(grid: &Grid, start: TileCoord, path: &[TileCoord]) -> bool {
    let mut previous = start;
    for &step in path {
        if !previous.is_adjacent(step) || !grid.is_traversable(step) {
            return false;
        }
        previous = step;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileState;
    use crate::units::UnitId;

    fn tc(row: u32, col: u32) -> TileCoord {
        TileCoord::new(row, col)
    }

    #[test]
    fn test_straight_path_is_shortest() {
        let grid = Grid::new(10, 10);
        let path = find_path(&grid, tc(0, 0), tc(5, 5));

        assert_eq!(path.len(), 10);
        assert_eq!(path.last(), Some(&tc(5, 5)));
        assert!(is_valid_route(&grid, tc(0, 0), &path));
    }

    #[test]
    fn test_path_around_wall() {
        let mut grid = Grid::new(10, 10);
        for row in 2..8 {
            grid.set_state(tc(row, 5), TileState::Blocked);
        }

        let path = find_path(&grid, tc(5, 2), tc(5, 8));

        assert!(!path.is_empty());
        assert!(is_valid_route(&grid, tc(5, 2), &path));
        for step in &path {
            assert!(grid.is_traversable(*step), "route enters blocked {step:?}");
        }
        // Detour over row 1 or row 8 costs six extra steps.
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_no_path_exists() {
        let mut grid = Grid::new(10, 10);
        for row in 0..10 {
            grid.set_state(tc(row, 5), TileState::Blocked);
        }
        assert!(find_path(&grid, tc(5, 2), tc(5, 8)).is_empty());
    }

    #[test]
    fn test_same_tile_is_empty() {
        let grid = Grid::new(5, 5);
        assert!(find_path(&grid, tc(2, 2), tc(2, 2)).is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let grid = Grid::new(5, 5);
        assert!(find_path(&grid, tc(0, 0), tc(9, 9)).is_empty());
        assert!(find_path(&grid, tc(9, 9), tc(0, 0)).is_empty());
    }

    #[test]
    fn test_blocked_endpoints_are_empty() {
        let mut grid = Grid::new(5, 5);
        grid.set_state(tc(0, 0), TileState::Blocked);
        grid.set_state(tc(4, 4), TileState::Blocked);
        assert!(find_path(&grid, tc(0, 0), tc(2, 2)).is_empty());
        assert!(find_path(&grid, tc(2, 2), tc(4, 4)).is_empty());
    }

    #[test]
    fn test_occupied_tiles_are_obstacles() {
        let mut grid = Grid::new(3, 5);
        // Occupy the whole middle column except the bottom row.
        grid.set_occupant(tc(0, 2), Some(UnitId(1)));
        grid.set_occupant(tc(1, 2), Some(UnitId(2)));

        let path = find_path(&grid, tc(0, 0), tc(0, 4));
        assert!(path.iter().all(|c| grid.occupant(*c).is_none()));
        assert!(path.contains(&tc(2, 2)));
        assert_eq!(path.len(), 8);

        grid.set_occupant(tc(2, 2), Some(UnitId(3)));
        assert!(find_path(&grid, tc(0, 0), tc(0, 4)).is_empty());
    }

    #[test]
    fn test_occupied_goal_is_empty() {
        let mut grid = Grid::new(3, 3);
        grid.set_occupant(tc(2, 2), Some(UnitId(9)));
        assert!(find_path(&grid, tc(0, 0), tc(2, 2)).is_empty());
    }

    #[test]
    fn test_start_occupied_by_mover_is_fine() {
        let mut grid = Grid::new(3, 3);
        grid.set_occupant(tc(0, 0), Some(UnitId(1)));
        assert_eq!(find_path(&grid, tc(0, 0), tc(0, 2)), vec![tc(0, 1), tc(0, 2)]);
    }

    #[test]
    fn test_path_markers_are_traversable() {
        let mut grid = Grid::new(1, 4);
        grid.mark_path(&[tc(0, 1), tc(0, 2)]);
        assert_eq!(find_path(&grid, tc(0, 0), tc(0, 3)).len(), 3);
    }

    #[test]
    fn test_determinism() {
        let mut grid = Grid::new(20, 20);
        for row in 5..15 {
            grid.set_state(tc(row, 10), TileState::Blocked);
        }

        let path1 = find_path(&grid, tc(10, 5), tc(10, 15));
        let path2 = find_path(&grid, tc(10, 5), tc(10, 15));
        let path3 = find_path(&grid, tc(10, 5), tc(10, 15));

        assert_eq!(path1, path2);
        assert_eq!(path2, path3);
    }

    #[test]
    fn test_route_validator_rejects_gaps() {
        let grid = Grid::new(5, 5);
        assert!(!is_valid_route(&grid, tc(0, 0), &[tc(0, 2)]));
        assert!(is_valid_route(&grid, tc(0, 0), &[tc(0, 1), tc(1, 1)]));
    }
}

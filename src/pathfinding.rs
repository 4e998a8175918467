//! Pathfinding module.
//!
//! This module contains the breadth-first shortest-path search the ghosts use to walk the maze and
//! the nearest-open-cell lookup used to turn arbitrary anchor points into reachable goals.

use std::collections::VecDeque;

use crate::grid::{Cell, Grid};

/// Finds the shortest 4-directional path between two cells.
///
/// This function runs a breadth-first search from `start` over the open cells of the grid,
/// expanding neighbours in the fixed order `+x`, `-x`, `+y`, `-y` so that among several shortest
/// paths the same one is always returned. The search stops as soon as `goal` is dequeued.
///
/// The result always starts with `start`. When `goal` is reachable it ends with `goal`; when it is
/// not (including when `goal` is a wall or either cell lies outside the grid) the result is the
/// single-element path `[start]`, which callers read as "stay where you are". Whether `start`
/// itself is a wall is not checked.
#[must_use]
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Vec<Cell> {
    let (Some(start_idx), Some(goal_idx)) = (grid.index(start), grid.index(goal)) else {
        return vec![start];
    };

    let size = grid.cols() * grid.rows();
    let mut seen = vec![false; size];
    let mut previous: Vec<Option<Cell>> = vec![None; size];
    if let Some(flag) = seen.get_mut(start_idx) {
        *flag = true;
    }

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }

        for neighbour in grid.neighbours(current) {
            if grid.is_wall(neighbour) {
                continue;
            }
            let Some(idx) = grid.index(neighbour) else {
                continue;
            };
            match seen.get_mut(idx) {
                Some(flag) if !*flag => *flag = true,
                _ => continue,
            }
            if let Some(link) = previous.get_mut(idx) {
                *link = Some(current);
            }
            queue.push_back(neighbour);
        }
    }

    if !seen.get(goal_idx).copied().unwrap_or(false) {
        return vec![start];
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        let Some(prev) = grid
            .index(cursor)
            .and_then(|idx| previous.get(idx).copied().flatten())
        else {
            break;
        };
        path.push(prev);
        cursor = prev;
    }
    path.reverse();

    path
}

/// Picks an open cell, optionally the one closest to a reference point.
///
/// Without a reference point, this returns the first open cell of the grid interior in row-major
/// order. With one, it returns the open cell with the smallest Manhattan distance to it, preferring
/// the earliest cell in row-major order on ties; the reference point may lie outside the grid.
/// Grids without any suitable cell fall back to `(1, 1)`, clamped into the grid.
#[must_use]
pub fn pick_nearest_open_cell(grid: &Grid, near: Option<Cell>) -> Cell {
    let found = match near {
        None => grid.cells().find(|cell| {
            cell.x >= 1
                && cell.y >= 1
                && cell.x + 1 < grid.cols()
                && cell.y + 1 < grid.rows()
                && grid.is_open(*cell)
        }),
        Some(near) => grid
            .cells()
            .filter(|cell| grid.is_open(*cell))
            .fold(None, |best: Option<Cell>, cell| match best {
                Some(best) if best.manhattan(near) <= cell.manhattan(near) => Some(best),
                _ => Some(cell),
            }),
    };

    found.unwrap_or_else(|| fallback_cell(grid))
}

/// Returns `(1, 1)` clamped into the grid bounds.
fn fallback_cell(grid: &Grid) -> Cell {
    Cell::new(1.min(grid.cols() - 1), 1.min(grid.rows() - 1))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::maze::generate_maze;

    /// Computes step distances from `from` to every cell with an independent breadth-first search.
    fn distances(grid: &Grid, from: Cell) -> Vec<Vec<Option<usize>>> {
        let mut dist = vec![vec![None; grid.cols()]; grid.rows()];
        if let Some(slot) = dist.get_mut(from.y).and_then(|row| row.get_mut(from.x)) {
            *slot = Some(0);
        }
        let mut queue = VecDeque::from([(from, 0)]);

        while let Some((cell, steps)) = queue.pop_front() {
            let around = [
                (cell.x.wrapping_sub(1), cell.y),
                (cell.x + 1, cell.y),
                (cell.x, cell.y.wrapping_sub(1)),
                (cell.x, cell.y + 1),
            ];
            for (x, y) in around {
                let next = Cell::new(x, y);
                if grid.is_wall(next) {
                    continue;
                }
                if let Some(slot) = dist.get_mut(y).and_then(|row| row.get_mut(x)) {
                    if slot.is_none() {
                        *slot = Some(steps + 1);
                        queue.push_back((next, steps + 1));
                    }
                }
            }
        }

        dist
    }

    /// Looks up a distance in the table built by [`distances`].
    fn distance_to(table: &[Vec<Option<usize>>], cell: Cell) -> Option<usize> {
        table.get(cell.y).and_then(|row| row.get(cell.x)).copied().flatten()
    }

    /// Asserts every structural property a returned path must have.
    fn assert_valid_path(grid: &Grid, path: &[Cell], start: Cell, goal: Cell) {
        assert_eq!(path.first().copied(), Some(start), "path must begin at start");
        assert_eq!(path.last().copied(), Some(goal), "path must end at goal");
        for cell in path {
            assert!(grid.is_open(*cell), "path cell {cell} must be open");
        }
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert_eq!(from.manhattan(*to), 1, "{from} -> {to} must be one step");
            }
        }
        let mut unique = path.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), path.len(), "path must not revisit cells");
    }

    #[test]
    fn test_find_path_straight_corridor() {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]);

        let path = find_path(&grid, Cell::new(1, 1), Cell::new(3, 1));

        assert_eq!(
            path,
            vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]
        );
    }

    #[test]
    fn test_find_path_start_equals_goal() {
        let grid = generate_maze(30, 14);
        let hub = grid.hub();

        assert_eq!(find_path(&grid, hub, hub), vec![hub]);
    }

    #[test]
    fn test_find_path_goal_is_wall() {
        let grid = generate_maze(30, 14);
        let start = Cell::new(1, 1);

        assert_eq!(find_path(&grid, start, Cell::new(0, 0)), vec![start]);
    }

    #[test]
    fn test_find_path_unreachable_goal() {
        let grid = Grid::from_rows(&["#####", "#.#.#", "#####"]);
        let start = Cell::new(1, 1);

        assert_eq!(find_path(&grid, start, Cell::new(3, 1)), vec![start]);
    }

    #[test]
    fn test_find_path_out_of_bounds_goal() {
        let grid = Grid::from_rows(&["...", "...", "..."]);
        let start = Cell::new(1, 1);

        assert_eq!(find_path(&grid, start, Cell::new(7, 1)), vec![start]);
    }

    #[test]
    fn test_find_path_tie_break_prefers_east_first() {
        let grid = Grid::from_rows(&["...", "...", "..."]);

        let path = find_path(&grid, Cell::new(0, 0), Cell::new(1, 1));

        assert_eq!(
            path,
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_find_path_is_deterministic() {
        let grid = generate_maze(30, 14);
        let start = Cell::new(1, 1);
        let goal = Cell::new(28, 12);

        assert_eq!(find_path(&grid, start, goal), find_path(&grid, start, goal));
    }

    #[test]
    fn test_find_path_corner_to_hub() {
        let grid = generate_maze(30, 14);
        let start = pick_nearest_open_cell(&grid, Some(Cell::new(2, 2)));
        let goal = grid.hub();

        let path = find_path(&grid, start, goal);

        assert_valid_path(&grid, &path, start, goal);
        let table = distances(&grid, start);
        assert_eq!(Some(path.len() - 1), distance_to(&table, goal));
    }

    #[test]
    fn test_find_path_from_wall_start_reaches_hub() {
        let grid = generate_maze(30, 14);
        let start = Cell::new(2, 2);
        let goal = grid.hub();
        assert!(grid.is_wall(start), "the corner anchor is a wall in this layout");

        let path = find_path(&grid, start, goal);

        assert_eq!(path.first().copied(), Some(start));
        assert_eq!(path.last().copied(), Some(goal));
        for cell in path.iter().skip(1) {
            assert!(grid.is_open(*cell), "path cell {cell} after the start must be open");
        }
        for pair in path.windows(2) {
            if let [from, to] = pair {
                assert_eq!(from.manhattan(*to), 1, "{from} -> {to} must be one step");
            }
        }
        let table = distances(&grid, start);
        assert_eq!(Some(path.len() - 1), distance_to(&table, goal));
    }

    #[test]
    fn test_pick_nearest_without_reference() {
        let grid = generate_maze(30, 14);

        assert_eq!(pick_nearest_open_cell(&grid, None), Cell::new(1, 1));
    }

    #[test]
    fn test_pick_nearest_returns_open_reference() {
        let grid = generate_maze(30, 14);
        let hub = grid.hub();

        assert_eq!(pick_nearest_open_cell(&grid, Some(hub)), hub);
    }

    #[test]
    fn test_pick_nearest_resolves_wall_reference() {
        let grid = Grid::from_rows(&["#####", "#.###", "###.#", "#####"]);

        assert_eq!(
            pick_nearest_open_cell(&grid, Some(Cell::new(2, 1))),
            Cell::new(1, 1)
        );
        assert_eq!(
            pick_nearest_open_cell(&grid, Some(Cell::new(3, 1))),
            Cell::new(3, 2)
        );
        assert_eq!(
            pick_nearest_open_cell(&grid, Some(Cell::new(9, 9))),
            Cell::new(3, 2)
        );
    }

    #[test]
    fn test_pick_nearest_tie_prefers_row_major_order() {
        let grid = Grid::from_rows(&["#####", "#.#.#", "#####"]);

        assert_eq!(
            pick_nearest_open_cell(&grid, Some(Cell::new(2, 1))),
            Cell::new(1, 1)
        );
    }

    #[test]
    fn test_pick_nearest_falls_back_on_solid_grid() {
        let grid = Grid::from_rows(&["###", "###", "###"]);

        assert_eq!(pick_nearest_open_cell(&grid, None), Cell::new(1, 1));
        assert_eq!(
            pick_nearest_open_cell(&grid, Some(Cell::new(0, 0))),
            Cell::new(1, 1)
        );

        let single = Grid::from_rows(&["#"]);
        assert_eq!(pick_nearest_open_cell(&single, None), Cell::new(0, 0));
    }

    proptest! {
        #[test]
        fn test_paths_are_valid_and_shortest(
            cols in 10_usize..40,
            rows in 10_usize..24,
            seed_a in 0_usize..10_000,
            seed_b in 0_usize..10_000,
        ) {
            let grid = generate_maze(cols, rows);
            let open = grid.open_cells();
            let start = open.get(seed_a % open.len()).copied().expect("index is within bounds");
            let goal = open.get(seed_b % open.len()).copied().expect("index is within bounds");

            let path = find_path(&grid, start, goal);
            assert_valid_path(&grid, &path, start, goal);

            let table = distances(&grid, start);
            prop_assert_eq!(Some(path.len() - 1), distance_to(&table, goal));
            prop_assert_eq!(&path, &find_path(&grid, start, goal));
        }

        #[test]
        fn test_wall_goals_keep_agents_in_place(
            cols in 10_usize..40,
            rows in 10_usize..24,
            seed_a in 0_usize..10_000,
            seed_b in 0_usize..10_000,
        ) {
            let grid = generate_maze(cols, rows);
            let open = grid.open_cells();
            let walls = grid.wall_cells();
            let start = open.get(seed_a % open.len()).copied().expect("index is within bounds");
            let goal = walls.get(seed_b % walls.len()).copied().expect("index is within bounds");

            prop_assert_eq!(find_path(&grid, start, goal), vec![start]);
        }
    }
}

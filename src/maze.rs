//! Maze generation module.
//!
//! This module carves a fixed, proportionally placed corridor layout into a grid and then repairs
//! its connectivity so that every open cell can be reached from the hub.

use std::collections::VecDeque;

use tracing::debug;

use crate::grid::{Cell, Grid};

/// Width of each of the four corner rooms.
const ROOM_WIDTH: isize = 4;

/// Height of each of the four corner rooms.
const ROOM_HEIGHT: isize = 2;

/// Arm length of the plus-shaped hub around the central cell.
const HUB_ARM: isize = 2;

/// Generates a connected corridor maze of the given dimensions.
///
/// The layout is fully determined by the dimensions: a border ring, three vertical and two
/// horizontal spines, periodic pockets, a plus-shaped hub around the central cell and four corner
/// rooms. Afterwards, every open cell the hub cannot reach is joined back to it with a straight
/// corridor, so the result is always connected. Dimensions of at least ten cells are recommended;
/// smaller grids still generate, only with a less recognisable shape.
#[must_use]
pub fn generate_maze(cols: usize, rows: usize) -> Grid {
    let mut grid = Grid::filled(cols, rows);
    let cols = signed(grid.cols());
    let rows = signed(grid.rows());

    // border ring
    for x in 1..cols - 1 {
        grid.carve(x, 1);
        grid.carve(x, rows - 2);
    }
    for y in 1..rows - 1 {
        grid.carve(1, y);
        grid.carve(cols - 2, y);
    }

    // spines
    for spine_x in [cols * 25 / 100, cols * 50 / 100, cols * 75 / 100] {
        for y in 2..rows - 2 {
            grid.carve(spine_x, y);
        }
    }
    for spine_y in [rows * 33 / 100, rows * 66 / 100] {
        for x in 2..cols - 2 {
            grid.carve(x, spine_y);
        }
    }

    // pockets
    for x in (3..cols - 3).step_by(4) {
        grid.carve(x, 2);
        grid.carve(x, rows - 3);
    }
    for y in (3..rows - 3).step_by(3) {
        grid.carve(2, y);
        grid.carve(cols - 3, y);
    }

    let hub = grid.hub();
    let (hub_x, hub_y) = (signed(hub.x), signed(hub.y));
    for offset in -HUB_ARM..=HUB_ARM {
        grid.carve(hub_x + offset, hub_y);
        grid.carve(hub_x, hub_y + offset);
    }

    for (left, top) in [
        (3, 3),
        (cols - 7, 3),
        (3, rows - 5),
        (cols - 7, rows - 5),
    ] {
        carve_room(&mut grid, left, top);
    }

    let carved = repair_connectivity(&mut grid);
    debug!(
        cols = grid.cols(),
        rows = grid.rows(),
        carved,
        "generated maze"
    );

    grid
}

/// Checks whether every open cell of the grid is reachable from its hub.
#[must_use]
pub fn is_connected(grid: &Grid) -> bool {
    let reachable = flood_fill(grid, grid.hub());

    grid.open_cells().into_iter().all(|cell| {
        grid.index(cell)
            .and_then(|idx| reachable.get(idx).copied())
            .unwrap_or(false)
    })
}

/// Opens a rectangle of cells with its top-left corner at the given coordinates.
fn carve_room(grid: &mut Grid, left: isize, top: isize) {
    for y in top..top + ROOM_HEIGHT {
        for x in left..left + ROOM_WIDTH {
            grid.carve(x, y);
        }
    }
}

/// Breadth-first flood fill over open cells.
///
/// The returned flags are indexed like the grid storage. The starting cell is always marked, even
/// when it is a wall, so that a fill from the hub behaves the same on any grid.
pub(crate) fn flood_fill(grid: &Grid, from: Cell) -> Vec<bool> {
    let mut reachable = vec![false; grid.cols() * grid.rows()];
    let Some(slot) = grid.index(from).and_then(|idx| reachable.get_mut(idx)) else {
        return reachable;
    };
    *slot = true;

    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        for neighbour in grid.neighbours(current) {
            if grid.is_wall(neighbour) {
                continue;
            }
            let Some(seen) = grid.index(neighbour).and_then(|idx| reachable.get_mut(idx)) else {
                continue;
            };
            if *seen {
                continue;
            }
            *seen = true;
            queue.push_back(neighbour);
        }
    }

    reachable
}

/// Joins every open cell the hub cannot reach back to the hub.
///
/// The reachable set is computed once up front. Each unreached cell then gets a corridor carved
/// horizontally to the hub column and vertically to the hub row, even if an earlier corridor
/// already connected it, and regardless of which walls the corridor cuts through. Returns the
/// number of cells that were opened.
pub(crate) fn repair_connectivity(grid: &mut Grid) -> usize {
    let hub = grid.hub();
    let reachable = flood_fill(grid, hub);
    let isolated: Vec<Cell> = grid
        .open_cells()
        .into_iter()
        .filter(|cell| {
            !grid
                .index(*cell)
                .and_then(|idx| reachable.get(idx).copied())
                .unwrap_or(false)
        })
        .collect();

    let mut carved = 0;
    for cell in isolated {
        let mut cursor = cell;
        while cursor.x != hub.x {
            cursor.x = if cursor.x < hub.x {
                cursor.x + 1
            } else {
                cursor.x - 1
            };
            carved += open_counted(grid, cursor);
        }
        while cursor.y != hub.y {
            cursor.y = if cursor.y < hub.y {
                cursor.y + 1
            } else {
                cursor.y - 1
            };
            carved += open_counted(grid, cursor);
        }
    }

    carved
}

/// Opens a cell and returns `1` if it was a wall before, `0` otherwise.
fn open_counted(grid: &mut Grid, cell: Cell) -> usize {
    let was_wall = grid.is_wall(cell);
    grid.open(cell);
    usize::from(was_wall)
}

/// Converts a grid dimension to signed arithmetic for the layout math.
fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

//! Grid model module.
//!
//! This module contains the cell coordinate type and the fixed-size wall/open occupancy map that
//! the maze generator produces and every other consumer only reads from.

use std::fmt;

/// Grid coordinate.
///
/// A cell is identified purely by its position; `x` grows to the right and `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column index of the cell.
    pub x: usize,
    /// Row index of the cell.
    pub y: usize,
}

impl Cell {
    /// Builds a new cell from a column and a row index.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the Manhattan distance between two cells.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size occupancy map.
///
/// This structure stores one wall flag per cell in row-major order. The dimensions are fixed at
/// construction and the only way to open cells is through the crate-private carving used by the
/// maze generator, so a grid handed out by [`generate_maze`](crate::generate_maze) never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    cols: usize,
    /// Number of rows.
    rows: usize,
    /// Wall flags, `true` meaning blocked, stored row after row.
    walls: Vec<bool>,
}

impl Grid {
    /// Creates a grid where every cell is a wall.
    ///
    /// Zero dimensions are raised to one so that the hub always exists.
    pub(crate) fn filled(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        Self {
            cols,
            rows,
            walls: vec![true; cols * rows],
        }
    }

    /// Builds a grid from rows of text, where `#` marks a wall and anything else is open.
    ///
    /// Rows shorter than the first one are padded with walls. This is mostly useful to describe
    /// hand-made layouts in tests.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::filled(cols, rows.len());

        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                if symbol != '#' {
                    grid.open(Cell::new(x, y));
                }
            }
        }

        grid
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the connectivity anchor of the grid, its central cell.
    #[must_use]
    pub const fn hub(&self) -> Cell {
        Cell::new(self.cols / 2, self.rows / 2)
    }

    /// Checks whether a cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    /// Checks whether a cell is blocked. Cells outside the grid read as walls.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.index(cell)
            .and_then(|idx| self.walls.get(idx).copied())
            .unwrap_or(true)
    }

    /// Checks whether a cell is inside the grid and traversable.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        !self.is_wall(cell)
    }

    /// Returns every open cell in row-major order.
    #[must_use]
    pub fn open_cells(&self) -> Vec<Cell> {
        self.cells().filter(|cell| self.is_open(*cell)).collect()
    }

    /// Returns every wall cell in row-major order.
    #[must_use]
    pub fn wall_cells(&self) -> Vec<Cell> {
        self.cells().filter(|cell| self.is_wall(*cell)).collect()
    }

    /// Iterates over every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| Cell::new(x, y)))
    }

    /// Returns the in-bounds orthogonal neighbours of a cell.
    ///
    /// The order is always east, west, south, north (`+x`, `-x`, `+y`, `-y`); the pathfinder relies
    /// on it to break ties between equally short paths the same way every time.
    #[must_use]
    pub fn neighbours(&self, cell: Cell) -> Vec<Cell> {
        let candidates = [
            cell.x.checked_add(1).map(|x| Cell::new(x, cell.y)),
            cell.x.checked_sub(1).map(|x| Cell::new(x, cell.y)),
            cell.y.checked_add(1).map(|y| Cell::new(cell.x, y)),
            cell.y.checked_sub(1).map(|y| Cell::new(cell.x, y)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(|neighbour| self.contains(*neighbour))
            .collect()
    }

    /// Returns the row-major storage index of a cell, if it is in bounds.
    pub(crate) const fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y * self.cols + cell.x)
        } else {
            None
        }
    }

    /// Opens a cell. Cells outside the grid are ignored.
    pub(crate) fn open(&mut self, cell: Cell) {
        if let Some(wall) = self.index(cell).and_then(|idx| self.walls.get_mut(idx)) {
            *wall = false;
        }
    }

    /// Opens the cell at signed coordinates, ignoring anything that falls outside the grid.
    pub(crate) fn carve(&mut self, x: isize, y: isize) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            self.open(Cell::new(x, y));
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let symbol = if self.is_wall(Cell::new(x, y)) { '#' } else { '.' };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_grid_is_all_walls() {
        let grid = Grid::filled(4, 3);

        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.rows(), 3);
        assert!(grid.open_cells().is_empty(), "a filled grid has no open cells");
        assert_eq!(grid.wall_cells().len(), 12);
    }

    #[test]
    fn test_filled_grid_raises_zero_dimensions() {
        let grid = Grid::filled(0, 0);

        assert_eq!(grid.cols(), 1);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.hub(), Cell::new(0, 0));
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);

        assert_eq!(grid.open_cells(), vec![Cell::new(1, 1)]);
        assert!(grid.is_wall(Cell::new(0, 0)));
        assert!(grid.is_open(Cell::new(1, 1)));
    }

    #[test]
    fn test_out_of_bounds_reads_as_wall() {
        let grid = Grid::from_rows(&["..", ".."]);

        assert!(!grid.contains(Cell::new(2, 0)));
        assert!(grid.is_wall(Cell::new(2, 0)));
        assert!(grid.is_wall(Cell::new(0, 9)));
    }

    #[test]
    fn test_carve_ignores_out_of_range() {
        let mut grid = Grid::filled(3, 3);
        grid.carve(-1, 1);
        grid.carve(1, 5);
        grid.carve(2, 2);

        assert_eq!(grid.open_cells(), vec![Cell::new(2, 2)]);
    }

    #[test]
    fn test_neighbours_order_and_bounds() {
        let grid = Grid::filled(3, 3);

        assert_eq!(
            grid.neighbours(Cell::new(1, 1)),
            vec![
                Cell::new(2, 1),
                Cell::new(0, 1),
                Cell::new(1, 2),
                Cell::new(1, 0)
            ]
        );
        assert_eq!(
            grid.neighbours(Cell::new(0, 0)),
            vec![Cell::new(1, 0), Cell::new(0, 1)]
        );
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(&["#.", ".#"]);

        assert_eq!(grid.to_string(), "#.\n.#\n");
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Cell::new(1, 4).manhattan(Cell::new(3, 1)), 5);
        assert_eq!(Cell::new(2, 2).manhattan(Cell::new(2, 2)), 0);
    }
}

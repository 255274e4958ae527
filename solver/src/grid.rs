use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::find::{Map, MapStorage};

/// A single maze cell: either a wall or an open cell with the cost paid when
/// stepping into it. Open cells always cost at least 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open(usize),
}

impl Cell {
    /// Maps a raw non-negative cost to a cell: 0 means wall.
    pub fn from_cost(cost: usize) -> Self {
        if cost == 0 {
            Cell::Wall
        } else {
            Cell::Open(cost)
        }
    }

    pub fn cost(self) -> usize {
        match self {
            Cell::Wall => 0,
            Cell::Open(cost) => cost,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "X",
                Cell::Open(1) => " ",
                Cell::Open(_) => "$",
            }
        )
    }
}

/// A cell position, row-major.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A rectangular maze of weighted cells.
///
/// The cell matrix is validated on construction and never changes shape
/// afterwards; [`Grid::scale_up`] only repeats existing cells.
#[derive(Debug, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Builds a grid from a cell matrix, deriving the dimensions from its
    /// shape. The matrix must be non-empty and rectangular.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let rows = cells.len();
        let columns = cells.first().map_or(0, Vec::len);
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        for (row, cells) in cells.iter().enumerate() {
            if cells.len() != columns {
                return Err(GridError::RaggedRow {
                    row,
                    found: cells.len(),
                    expected: columns,
                });
            }
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Builds a grid from declared dimensions and a raw cost matrix, where a
    /// cost of 0 marks a wall. The matrix must match the declared shape.
    pub fn from_costs(
        rows: usize,
        columns: usize,
        costs: Vec<Vec<usize>>,
    ) -> Result<Self, GridError> {
        if costs.len() != rows {
            return Err(GridError::RowCountMismatch {
                found: costs.len(),
                expected: rows,
            });
        }
        for (row, costs) in costs.iter().enumerate() {
            if costs.len() != columns {
                return Err(GridError::RaggedRow {
                    row,
                    found: costs.len(),
                    expected: columns,
                });
            }
        }
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        let cells = costs
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from_cost).collect())
            .collect();
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether the point lies inside the grid.
    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// The cost of stepping into the cell, or 0 for walls.
    ///
    /// The point must be contained in the grid.
    pub fn cost(&self, point: Point) -> usize {
        self.cells[point.row][point.col].cost()
    }

    /// Whether the point is inside the grid and not a wall.
    pub fn is_open(&self, point: Point) -> bool {
        self.contains(point) && self.cells[point.row][point.col] != Cell::Wall
    }

    /// Scales the grid by the given factor, i.e. to make it twice as large,
    /// pass 2. Repeats each existing cell in a factor-by-factor block.
    pub fn scale_up(&mut self, factor: usize) {
        let mut cells = vec![vec![Cell::Wall; self.columns * factor]; self.rows * factor];

        for row in 0..self.rows {
            for col in 0..self.columns {
                for r in 0..factor {
                    for c in 0..factor {
                        cells[row * factor + r][col * factor + c] = self.cells[row][col];
                    }
                }
            }
        }

        self.rows *= factor;
        self.columns *= factor;
        self.cells = cells;
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Map for Grid {
    type Node = Point;
    type Storage<T: Default + Copy + 'static> = CellStorage<T>;

    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = (Point, usize)> {
        let mut moves = Vec::with_capacity(4);

        if self.cells[node.row][node.col] == Cell::Wall {
            return moves.into_iter();
        }

        // Candidate moves in a fixed order (down, right, up, left); the order
        // only decides which of several equal-cost routes wins.
        let mut points = Vec::with_capacity(4);
        if node.row + 1 < self.rows {
            points.push(Point {
                row: node.row + 1,
                col: node.col,
            });
        }
        if node.col + 1 < self.columns {
            points.push(Point {
                row: node.row,
                col: node.col + 1,
            });
        }
        if node.row > 0 {
            points.push(Point {
                row: node.row - 1,
                col: node.col,
            });
        }
        if node.col > 0 {
            points.push(Point {
                row: node.row,
                col: node.col - 1,
            });
        }

        // Stepping into a cell pays that cell's cost; walls are not moves.
        for point in points {
            if let Cell::Open(cost) = self.cells[point.row][point.col] {
                moves.push((point, cost));
            }
        }

        moves.into_iter()
    }

    fn create_storage<T: Default + Copy + 'static>(&self) -> CellStorage<T> {
        CellStorage(vec![vec![Default::default(); self.columns]; self.rows])
    }
}

/// A MapStorage that uses a rectangular grid of cells (a vec in a vec)
// TODO: change from vec of vec to one single vec -> better cache friendlyness!
#[derive(Debug)]
pub struct CellStorage<T>(Vec<Vec<T>>);

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Node = Point;

    fn get(&self, node: Point) -> T {
        self.0[node.row][node.col]
    }

    fn get_mut(&mut self, node: Point) -> &mut T {
        &mut self.0[node.row][node.col]
    }
}

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Open,
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "X",
                Cell::Open => " ",
            }
        )
    }
}

/// A position in the maze, `x` grows to the right and `y` grows downwards
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{x: {}, y: {}}}", self.x, self.y)
    }
}

/// Anything that can tell walls from open cells on a rectangular grid
pub trait GridSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Only valid for `x < width` and `y < height`
    fn is_open(&self, x: usize, y: usize) -> bool;

    fn is_wall(&self, x: usize, y: usize) -> bool {
        !self.is_open(x, y)
    }
}

/// A GridSource implementation that stores a rectangular grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl MazeGrid {
    /// Create a grid with every cell set to a wall
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![vec![Cell::Wall; columns]; rows],
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Opens every cell on the straight line between `from` and `to`, which must share a row or a
    /// column
    pub fn carve(&mut self, from: Point, to: Point) {
        if from.y == to.y {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.cells[from.y][x] = Cell::Open;
            }
        } else if from.x == to.x {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                self.cells[y][from.x] = Cell::Open;
            }
        }
    }
}

impl GridSource for MazeGrid {
    fn width(&self) -> usize {
        self.columns
    }

    fn height(&self) -> usize {
        self.rows
    }

    fn is_open(&self, x: usize, y: usize) -> bool {
        self.cells[y][x] == Cell::Open
    }
}

impl Display for MazeGrid {
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

/// Parses a text maze where `#` is a wall and `.` or a space is open. Blank lines are skipped.
impl FromStr for MazeGrid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();

        for (row, line) in s.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let parsed = line
                .trim_end_matches('\r')
                .chars()
                .map(|c| match c {
                    '#' => Ok(Cell::Wall),
                    '.' | ' ' => Ok(Cell::Open),
                    _ => Err(anyhow::anyhow!("Invalid cell {:?} in row {}", c, row)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            cells.push(parsed);
        }

        let columns = cells.first().map_or(0, |r| r.len());
        if let Some(row) = cells.iter().position(|r| r.len() != columns) {
            return Err(anyhow::anyhow!(
                "Row {} has {} cells, expected {}",
                row,
                cells[row].len(),
                columns
            ));
        }

        Ok(MazeGrid {
            rows: cells.len(),
            columns,
            cells,
        })
    }
}

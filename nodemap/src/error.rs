use crate::{grid::Point, node::Direction};

/// Reasons a grid cannot be turned into a solvable node map
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMaze {
    #[error("maze must be at least 3x3 cells, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("no opening found in the top row")]
    NoStart,

    #[error("expected a single opening in the top row, found {count}")]
    MultipleStarts { count: usize },

    #[error("no opening found in the bottom row")]
    NoEnd,

    #[error("expected a single opening in the bottom row, found {count}")]
    MultipleEnds { count: usize },

    #[error("entrance at {position} does not lead into the maze")]
    BlockedEntrance { position: Point },

    #[error("node at {position} is open {direction} but nothing connects there")]
    DanglingOpening {
        position: Point,
        direction: Direction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("invalid maze: {0}")]
    InvalidMaze(#[from] InvalidMaze),

    #[error("no path from {start} to {end}")]
    Unsolvable { start: Point, end: Point },
}

pub mod config;
pub mod error;
pub mod grid;
pub mod node;
pub mod nodemap;
pub mod render;
pub mod solve;
pub mod util;

pub use config::Config;
pub use error::{InvalidMaze, MazeError};
pub use grid::{Cell, GridSource, MazeGrid, Point};
pub use node::{Connection, Direction, Input, Node, NodeId};
pub use nodemap::{ConnectFrom, NodeMap, NodeMapStats};
pub use render::{Gradient, PathProgress, PixelSink, SolutionImage};
pub use solve::{solve, Solution, Solver, SolverState};

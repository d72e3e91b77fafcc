//! Perfect maze generation and solving on orthogonal and hexagonal grids, with optional tunnels.
//!
//! Build a [`Maze`], carve it with one of the [`MazeGenerator`]s and walk it with a
//! [`MazeSolver`], or describe the whole run with a [`MazeSpec`].

pub mod algorithms;
pub mod array;
pub mod dims;
pub mod maze;
pub mod observer;
pub mod registry;

pub use algorithms::{
    default_generators, default_solvers, MazeGenerator, MazeSolver, MazeSpec, Params, Random,
    Report, SpecError,
};
pub use dims::Pos;
pub use maze::{Direction, Maze, MazeError, Topology};
pub use observer::Observer;

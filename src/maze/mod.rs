pub mod cell;
#[allow(clippy::module_inception)]
pub mod maze;
pub mod topology;

pub use cell::{Cell, Wall};
pub use maze::{Maze, MazeError};
pub use topology::{Direction, Topology, NUM_DIR};

pub mod disjoint_set;
pub mod generator;
pub mod solver;
pub mod types;

use std::sync::Arc;

use crate::{array::Array2D, dims::Pos, maze::Maze, registry::Registry};
pub use disjoint_set::DisjointSet;
pub use generator::{DepthFirst, Kruskal, MazeGenerator, Prim};
pub use solver::{BidirectionalBfs, DepthFirstSolver, MazeSolver};
pub use types::*;

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// Builds a fresh solver from its parameters. Solvers carry per-run state, so the registry holds
/// factories rather than instances.
pub type SolverFactory = dyn Fn(&Params) -> Box<dyn MazeSolver> + Send + Sync;

/// Registry of the maze generators.
pub type GeneratorRegistry = Registry<dyn MazeGenerator>;

/// Registry of the maze solvers.
pub type SolverRegistry = Registry<SolverFactory>;

/// Generators under their config names, `kruskal` being the default.
pub fn default_generators() -> GeneratorRegistry {
    let kruskal: Arc<dyn MazeGenerator> = Arc::new(Kruskal);
    let mut registry = GeneratorRegistry::with_default(kruskal.clone());
    registry.register("kruskal".to_string(), kruskal);
    registry.register("prim".to_string(), Arc::new(Prim));
    registry.register("depth_first".to_string(), Arc::new(DepthFirst));
    registry
}

/// Solvers under their config names, `depth_first` being the default.
pub fn default_solvers() -> SolverRegistry {
    let depth_first: Arc<SolverFactory> =
        Arc::new(|params: &Params| -> Box<dyn MazeSolver> {
            Box::new(DepthFirstSolver::from_params(params))
        });
    let bidirectional: Arc<SolverFactory> =
        Arc::new(|_: &Params| -> Box<dyn MazeSolver> { Box::new(BidirectionalBfs::new()) });

    let mut registry = SolverRegistry::with_default(depth_first.clone());
    registry.register("depth_first".to_string(), depth_first);
    registry.register("bidirectional_bfs".to_string(), bidirectional);
    registry
}

/// Visitation bookkeeping for one traversal.
///
/// Anything outside of the grid counts as already visited, so lookups there stop exploration
/// instead of failing.
#[derive(Debug, Clone)]
pub struct VisitTable {
    visited: Array2D<bool>,
    count: usize,
}

impl VisitTable {
    pub fn new(maze: &Maze) -> Self {
        Self {
            visited: Array2D::new_like(false, maze.cells()),
            count: 0,
        }
    }

    pub fn is_visited(&self, pos: Pos) -> bool {
        self.visited.get(pos).copied().unwrap_or(true)
    }

    /// Marks `pos`, returns `true` only for a first visit inside the grid.
    pub fn mark(&mut self, pos: Pos) -> bool {
        match self.visited.get_mut(pos) {
            Some(seen) if !*seen => {
                *seen = true;
                self.count += 1;
                true
            }
            _ => false,
        }
    }

    /// Number of distinct cells marked so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn clear(&mut self) {
        self.visited.fill(false);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Topology;

    #[test]
    fn outside_counts_as_visited() {
        let maze = Maze::new(Topology::Hex, 3, 3).unwrap();
        let mut visited = VisitTable::new(&maze);

        assert!(visited.is_visited(Pos(2, 0)));
        assert!(!visited.mark(Pos(2, 0)));
        assert!(!visited.is_visited(Pos(2, 1)));
        assert_eq!(visited.count(), 0);
    }

    #[test]
    fn marks_once() {
        let maze = Maze::new(Topology::Orthogonal, 2, 2).unwrap();
        let mut visited = VisitTable::new(&maze);

        assert!(visited.mark(Pos(1, 1)));
        assert!(!visited.mark(Pos(1, 1)));
        assert!(visited.is_visited(Pos(1, 1)));
        assert_eq!(visited.count(), 1);

        visited.clear();
        assert!(!visited.is_visited(Pos(1, 1)));
        assert_eq!(visited.count(), 0);
    }

    #[test]
    fn default_registries() {
        let generators = default_generators();
        for name in ["kruskal", "prim", "depth_first"] {
            assert!(generators.is_registered(name));
        }
        assert_eq!(generators.get_default().unwrap().name(), "kruskal");

        let solvers = default_solvers();
        assert!(solvers.is_registered("bidirectional_bfs"));
        let factory = solvers.get("bidirectional_bfs").unwrap();
        assert_eq!(factory(&Params::new()).name(), "bidirectional_bfs");
        assert_eq!((solvers.get_default().unwrap())(&Params::new()).name(), "depth_first");
    }
}

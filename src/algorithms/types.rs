use std::{str::FromStr, sync::Arc};

use hashbrown::HashMap;
use rand::{thread_rng, Rng as _, SeedableRng as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dims::Pos,
    maze::{Maze, MazeError, Topology},
    observer::Observer,
};

use super::{GeneratorRegistry, MazeGenerator, Random, SolverFactory, SolverRegistry};

/// Parameters of a generator or a solver.
/// Values are kept as strings and parsed by the algorithm that reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    map: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.map.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn parsed<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(|s| s.parse())
    }

    pub fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.parsed(key) {
            None | Some(Err(_)) => default,
            Some(Ok(v)) => v,
        }
    }

    pub fn parsed_or_warn<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.parsed(key) {
            None => default,
            Some(Ok(v)) => v,
            Some(Err(_)) => {
                log::warn!("Invalid value for parameter '{}', using default value", key);
                default
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Registered algorithm name with its parameters.
pub type Algorithm = (String, Params);

#[derive(Debug, Error)]
pub enum SpecError {
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("unknown generator '{0}'")]
    UnknownGenerator(String),
    #[error("unknown solver '{0}'")]
    UnknownSolver(String),
    #[error("no default {0} is registered")]
    NoDefault(&'static str),
}

/// Everything needed to build, generate and solve one maze.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MazeSpec {
    #[serde(default)]
    pub topology: Topology,

    pub rows: usize,
    pub columns: usize,

    /// Defaults to the first cell in topology order.
    pub entrance: Option<Pos>,

    /// Defaults to the last cell in topology order.
    pub exit: Option<Pos>,

    /// Pairs of cells joined by a tunnel.
    #[serde(default)]
    pub tunnels: Vec<(Pos, Pos)>,

    /// Seed of the maze.
    ///
    /// Used for deterministic generation and solving. A random one is picked if not given.
    pub seed: Option<u64>,

    /// Generator, the registry default if not given.
    pub generator: Option<Algorithm>,

    /// Solver, the registry default if not given.
    pub solver: Option<Algorithm>,
}

/// Outcome of [`MazeSpec::run`].
#[derive(Debug, Clone)]
pub struct Report {
    pub maze: Maze,
    pub seed: u64,
    pub generator: &'static str,
    pub solver: &'static str,
    pub solved: bool,
    pub cells_explored: usize,
    pub path: Option<Vec<Pos>>,
}

impl MazeSpec {
    /// Creates the uncarved maze with its tunnels, entrance and exit.
    pub fn build(&self) -> Result<Maze, MazeError> {
        let mut maze = Maze::new(self.topology, self.rows, self.columns)?;

        for &(a, b) in &self.tunnels {
            maze.add_tunnel(a, b)?;
        }

        if let Some(entrance) = self.entrance {
            maze.set_entrance(entrance)?;
        }

        if let Some(exit) = self.exit {
            maze.set_exit(exit)?;
        }

        Ok(maze)
    }

    /// Checks the maze can be built and both algorithms resolve.
    pub fn validate(
        &self,
        generators: &GeneratorRegistry,
        solvers: &SolverRegistry,
    ) -> Result<(), SpecError> {
        self.build()?;
        self.resolve_generator(generators)?;
        self.resolve_solver(solvers)?;
        Ok(())
    }

    /// Builds the maze, carves it and runs the solver on it.
    pub fn run(
        &self,
        generators: &GeneratorRegistry,
        solvers: &SolverRegistry,
        observer: &mut dyn Observer,
    ) -> Result<Report, SpecError> {
        let mut maze = self.build()?;
        let (generator, generator_params) = self.resolve_generator(generators)?;
        let (factory, solver_params) = self.resolve_solver(solvers)?;

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Random::seed_from_u64(seed);

        generator.generate(&mut maze, &mut rng, &generator_params);

        let mut solver = factory(&solver_params);
        solver.solve(&maze, &mut rng, observer);

        log::debug!(
            "{}x{} {:?} maze with seed {}: {} then {}, solved: {}",
            self.rows,
            self.columns,
            self.topology,
            seed,
            generator.name(),
            solver.name(),
            solver.is_solved()
        );

        Ok(Report {
            seed,
            generator: generator.name(),
            solver: solver.name(),
            solved: solver.is_solved(),
            cells_explored: solver.cells_explored(),
            path: solver.path().map(<[Pos]>::to_vec),
            maze,
        })
    }

    fn resolve_generator(
        &self,
        generators: &GeneratorRegistry,
    ) -> Result<(Arc<dyn MazeGenerator>, Params), SpecError> {
        match &self.generator {
            Some((name, params)) => generators
                .get(name.as_str())
                .map(|generator| (generator, params.clone()))
                .ok_or_else(|| SpecError::UnknownGenerator(name.clone())),
            None => generators
                .get_default()
                .map(|generator| (generator, Params::new()))
                .ok_or(SpecError::NoDefault("generator")),
        }
    }

    fn resolve_solver(
        &self,
        solvers: &SolverRegistry,
    ) -> Result<(Arc<SolverFactory>, Params), SpecError> {
        match &self.solver {
            Some((name, params)) => solvers
                .get(name.as_str())
                .map(|factory| (factory, params.clone()))
                .ok_or_else(|| SpecError::UnknownSolver(name.clone())),
            None => solvers
                .get_default()
                .map(|factory| (factory, Params::new()))
                .ok_or(SpecError::NoDefault("solver")),
        }
    }
}

use std::fmt;

use rand::{seq::SliceRandom as _, Rng as _};
use smallvec::SmallVec;

use crate::{
    array::Array2D,
    dims::Pos,
    maze::{Direction, Maze, NUM_DIR},
};

use super::{DisjointSet, Params, Random, VisitTable};

/// Carves a perfect maze into a grid whose walls are all present.
///
/// Generators only ever remove walls. Tunnel pairs count as already connected, so the carved
/// passages plus the tunnels form a spanning tree.
pub trait MazeGenerator: fmt::Debug + Sync + Send {
    /// Name the generator is registered under.
    fn name(&self) -> &'static str;

    fn generate(&self, maze: &mut Maze, rng: &mut Random, params: &Params);
}

fn no_rng(params: &Params) -> bool {
    params.parsed_or_warn("no_rng", false)
}

fn start_cell(maze: &Maze, rng: &mut Random, no_rng: bool) -> Option<Pos> {
    if no_rng {
        maze.iter_pos().next()
    } else {
        maze.random_cell(rng)
    }
}

/// Randomized Kruskal's: shuffled edge list joined through a [`DisjointSet`].
#[derive(Debug)]
pub struct Kruskal;

impl MazeGenerator for Kruskal {
    fn name(&self) -> &'static str {
        "kruskal"
    }

    fn generate(&self, maze: &mut Maze, rng: &mut Random, params: &Params) {
        let topology = maze.topology();

        // Every shared wall once; an edge into a tunneled cell ends at its partner.
        let mut edges: Vec<(Pos, Direction, Pos)> = Vec::with_capacity(maze.cell_count() * 3);
        for from in maze.iter_pos() {
            for &dir in topology.directions().iter().filter(|dir| dir.is_canonical()) {
                if let Some(neighbor) = maze.neighbor(from, dir) {
                    let to = maze.tunnel(neighbor).unwrap_or(neighbor);
                    edges.push((from, dir, to));
                }
            }
        }

        if !no_rng(params) {
            edges.shuffle(rng);
        }

        let mut sets = DisjointSet::from_maze(maze);
        let mut carved = 0;
        for (from, dir, to) in edges {
            if sets.union(from, to) && maze.carve(from, dir) {
                carved += 1;
            }
        }

        log::debug!(
            "kruskal carved {} walls, {} sets left",
            carved,
            sets.set_count()
        );
    }
}

/// Randomized Prim's: grows a single tree from one cell, claiming one outside neighbor at a time.
#[derive(Debug)]
pub struct Prim;

impl MazeGenerator for Prim {
    fn name(&self) -> &'static str {
        "prim"
    }

    fn generate(&self, maze: &mut Maze, rng: &mut Random, params: &Params) {
        let no_rng = no_rng(params);
        let Some(start) = start_cell(maze, rng, no_rng) else {
            return;
        };

        let mut outside = Array2D::new_like(true, maze.cells());
        let mut remaining = maze.cell_count();
        let mut inside = Vec::with_capacity(maze.cell_count());

        remaining -= claim(maze, &mut outside, &mut inside, start);

        while remaining > 0 {
            let mut grown = None;

            // Cells that have no outside neighbor left are dropped for good.
            let mut i = 0;
            while i < inside.len() {
                let pick = if no_rng {
                    i
                } else {
                    rng.gen_range(i..inside.len())
                };
                inside.swap(i, pick);
                let cell = inside[i];

                let directions: SmallVec<[Direction; NUM_DIR]> = if no_rng {
                    maze.topology().directions().iter().copied().collect()
                } else {
                    maze.topology().shuffled_directions(rng)
                };

                let found = directions.into_iter().find_map(|dir| {
                    maze.neighbor(cell, dir)
                        .filter(|&next| outside[next])
                        .map(|next| (dir, next))
                });

                match found {
                    Some((dir, next)) => {
                        grown = Some((cell, dir, next));
                        break;
                    }
                    None => {
                        inside.swap_remove(i);
                    }
                }
            }

            let Some((cell, dir, next)) = grown else {
                log::warn!("prim stalled with {} cells unreachable", remaining);
                break;
            };

            maze.carve(cell, dir);
            remaining -= claim(maze, &mut outside, &mut inside, next);
        }

        log::debug!("prim finished, {} cells left outside", remaining);
    }
}

/// Moves `pos` and its tunnel partner into the tree, returns how many cells moved.
fn claim(maze: &Maze, outside: &mut Array2D<bool>, inside: &mut Vec<Pos>, pos: Pos) -> usize {
    let mut moved = 0;
    for pos in maze.with_tunnel(pos) {
        if std::mem::replace(&mut outside[pos], false) {
            inside.push(pos);
            moved += 1;
        }
    }
    moved
}

/// Randomized depth-first search with an explicit stack.
#[derive(Debug)]
pub struct DepthFirst;

impl MazeGenerator for DepthFirst {
    fn name(&self) -> &'static str {
        "depth_first"
    }

    fn generate(&self, maze: &mut Maze, rng: &mut Random, params: &Params) {
        let no_rng = no_rng(params);
        let Some(start) = start_cell(maze, rng, no_rng) else {
            return;
        };

        let mut visited = VisitTable::new(maze);
        let mut stack = Vec::new();

        for pos in maze.with_tunnel(start) {
            visited.mark(pos);
        }
        stack.push(start);

        while let Some(&current) = stack.last() {
            let grid: &Maze = maze;
            let candidates = grid
                .with_tunnel(current)
                .flat_map(|from| {
                    grid.topology()
                        .directions()
                        .iter()
                        .filter_map(move |&dir| grid.neighbor(from, dir).map(|to| (from, dir, to)))
                })
                .filter(|&(_, _, to)| !visited.is_visited(to))
                .collect::<SmallVec<[_; 2 * NUM_DIR]>>();

            let chosen = if no_rng {
                candidates.first()
            } else {
                candidates.choose(rng)
            };

            match chosen {
                Some(&(from, dir, next)) => {
                    maze.carve(from, dir);
                    for pos in maze.with_tunnel(next) {
                        visited.mark(pos);
                    }
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }

        log::debug!("depth first visited {} cells", visited.count());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng as _;

    use super::*;
    use crate::{
        algorithms::{DepthFirstSolver, MazeSolver},
        maze::Topology,
    };

    fn generators() -> [&'static dyn MazeGenerator; 3] {
        [&Kruskal, &Prim, &DepthFirst]
    }

    fn generated(
        generator: &dyn MazeGenerator,
        topology: Topology,
        rows: usize,
        columns: usize,
        seed: u64,
    ) -> Maze {
        let mut maze = Maze::new(topology, rows, columns).unwrap();
        let mut rng = Random::seed_from_u64(seed);
        generator.generate(&mut maze, &mut rng, &Params::new());
        maze
    }

    fn with_tunnels(topology: Topology) -> Maze {
        let mut maze = Maze::new(topology, 6, 7).unwrap();
        let positions = maze.iter_pos().collect::<Vec<_>>();
        let last = positions.len() - 1;
        maze.add_tunnel(positions[0], positions[last]).unwrap();
        maze.add_tunnel(positions[3], positions[20]).unwrap();
        // Geometric neighbors joined by a tunnel as well.
        maze.add_tunnel(positions[1], positions[2]).unwrap();
        maze
    }

    fn walls(maze: &Maze) -> Vec<bool> {
        maze.iter_pos()
            .flat_map(|pos| Direction::ALL.map(|dir| maze.is_carved(pos, dir)))
            .collect()
    }

    fn assert_symmetric(maze: &Maze) {
        for pos in maze.iter_pos() {
            for dir in Direction::ALL {
                if let Some(neighbor) = maze.neighbor(pos, dir) {
                    assert_eq!(
                        maze.is_carved(pos, dir),
                        maze.is_carved(neighbor, dir.opposite()),
                        "wall between {} and {}",
                        pos,
                        neighbor
                    );
                }
            }
        }
    }

    #[test]
    fn all_generators_make_perfect_mazes() {
        for generator in generators() {
            for topology in [Topology::Orthogonal, Topology::Hex] {
                for seed in 0..5 {
                    let maze = generated(generator, topology, 8, 11, seed);
                    assert!(
                        maze.is_perfect(),
                        "{} on {:?} with seed {}",
                        generator.name(),
                        topology,
                        seed
                    );
                    assert_eq!(maze.carved_count(), maze.cell_count() - 1);
                    assert_symmetric(&maze);
                }
            }
        }
    }

    #[test]
    fn tunnels_take_the_place_of_a_wall() {
        for generator in generators() {
            for topology in [Topology::Orthogonal, Topology::Hex] {
                for seed in 0..5 {
                    let mut maze = with_tunnels(topology);
                    let mut rng = Random::seed_from_u64(seed);
                    generator.generate(&mut maze, &mut rng, &Params::new());

                    assert!(maze.is_perfect(), "{} on {:?}", generator.name(), topology);
                    assert_eq!(maze.carved_count(), maze.cell_count() - 1 - 3);
                    assert_symmetric(&maze);
                }
            }
        }
    }

    #[test]
    fn single_cell_and_single_row() {
        for generator in generators() {
            let maze = generated(generator, Topology::Orthogonal, 1, 1, 3);
            assert_eq!(maze.carved_count(), 0);
            assert!(maze.is_perfect());

            let maze = generated(generator, Topology::Hex, 1, 9, 3);
            assert_eq!(maze.carved_count(), 8);
            assert!(maze.is_perfect());
        }
    }

    #[test]
    fn kruskal_small_grid_is_deterministic() {
        let first = generated(&Kruskal, Topology::Orthogonal, 5, 5, 42);
        let second = generated(&Kruskal, Topology::Orthogonal, 5, 5, 42);

        assert_eq!(first.carved_count(), 24);
        assert!(first.is_perfect());
        assert_eq!(walls(&first), walls(&second));

        let mut solver = DepthFirstSolver::new();
        let mut rng = Random::seed_from_u64(42);
        solver.solve(&first, &mut rng, &mut ());
        assert!(solver.is_solved());
        assert!((1..=25).contains(&solver.cells_explored()));
    }

    #[test]
    fn prim_hex_stays_in_bounds() {
        for seed in 0..10 {
            let maze = generated(&Prim, Topology::Hex, 4, 6, seed);
            for pos in maze.iter_pos() {
                let offset = Topology::Hex.column_offset(pos.row());
                assert!(offset <= pos.col() && pos.col() < offset + 6);
                for next in maze.passages(pos) {
                    assert!(maze.is_in(next), "{} leads out to {}", pos, next);
                }
            }
            assert!(maze.is_perfect());
        }
    }

    #[test]
    fn kruskal_joins_distant_tunnel_ends() {
        let mut maze = Maze::new(Topology::Orthogonal, 6, 6).unwrap();
        maze.add_tunnel(Pos(0, 0), Pos(5, 5)).unwrap();
        let mut rng = Random::seed_from_u64(9);
        Kruskal.generate(&mut maze, &mut rng, &Params::new());

        let mut seen = Array2D::new_like(false, maze.cells());
        let mut queue = VecDeque::from([Pos(0, 0)]);
        seen[Pos(0, 0)] = true;
        while let Some(pos) = queue.pop_front() {
            for next in maze.passages(pos) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }

        assert!(seen[Pos(5, 5)]);
        assert!(maze.is_perfect());
    }

    #[test]
    fn no_rng_ignores_the_seed() {
        let params: Params = [("no_rng", "true")].into_iter().collect();
        for generator in generators() {
            let mut a = Maze::new(Topology::Hex, 5, 6).unwrap();
            let mut b = Maze::new(Topology::Hex, 5, 6).unwrap();
            generator.generate(&mut a, &mut Random::seed_from_u64(1), &params);
            generator.generate(&mut b, &mut Random::seed_from_u64(2), &params);

            assert_eq!(walls(&a), walls(&b), "{}", generator.name());
            assert!(a.is_perfect());
        }
    }

    #[test]
    fn invalid_no_rng_falls_back_to_random() {
        let params: Params = [("no_rng", "maybe")].into_iter().collect();
        let mut maze = Maze::new(Topology::Orthogonal, 4, 4).unwrap();
        DepthFirst.generate(&mut maze, &mut Random::seed_from_u64(5), &params);
        assert!(maze.is_perfect());
    }
}

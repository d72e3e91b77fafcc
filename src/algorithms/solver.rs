use std::{collections::VecDeque, fmt};

use rand::seq::SliceRandom as _;
use smallvec::SmallVec;

use crate::{array::Array2D, dims::Pos, maze::Maze, observer::Observer};

use super::{Params, Random, VisitTable};

/// Finds a path from the entrance to the exit of a carved maze.
///
/// A solver never touches the walls. All of its bookkeeping is reset at the start of every
/// [`MazeSolver::solve`], the queries describe the last run.
pub trait MazeSolver: fmt::Debug {
    /// Name the solver is registered under.
    fn name(&self) -> &'static str;

    fn solve(&mut self, maze: &Maze, rng: &mut Random, observer: &mut dyn Observer);

    /// Was the exit reached during the last solve?
    fn is_solved(&self) -> bool;

    /// Distinct visitations during the last solve, tunnel partners included.
    fn cells_explored(&self) -> usize;

    /// Path from the entrance to the exit, tunnel hops included. `None` if unsolved.
    fn path(&self) -> Option<&[Pos]>;
}

/// Marks `pos` together with its tunnel partner, telling the observer about every new cell.
///
/// Returns the partner if it was newly marked.
fn visit_pair(
    maze: &Maze,
    visited: &mut VisitTable,
    observer: &mut dyn Observer,
    pos: Pos,
) -> Option<Pos> {
    if visited.mark(pos) {
        observer.visit(pos);
    }

    let partner = maze.tunnel(pos)?;
    if visited.mark(partner) {
        observer.visit(partner);
        return Some(partner);
    }
    None
}

/// Randomized depth-first search from the entrance, backtracking on dead ends.
#[derive(Debug, Clone, Default)]
pub struct DepthFirstSolver {
    no_rng: bool,
    solved: bool,
    explored: usize,
    path: Vec<Pos>,
}

impl DepthFirstSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `no_rng`: when set, the first open neighbor in direction order is taken.
    pub fn from_params(params: &Params) -> Self {
        Self {
            no_rng: params.parsed_or_warn("no_rng", false),
            ..Self::default()
        }
    }

    /// Expands the stack into a walk, inserting the tunnel hops the stack skips.
    fn trace(maze: &Maze, stack: &[Pos]) -> Vec<Pos> {
        let mut path = Vec::with_capacity(stack.len() + 1);
        for window in stack.windows(2) {
            let (from, to) = (window[0], window[1]);
            path.push(from);
            if !maze.passages(from).contains(&to) {
                path.extend(maze.tunnel(from));
            }
        }
        path.extend(stack.last());

        if let Some(&last) = path.last() {
            if last != maze.exit() {
                path.extend(maze.tunnel(last));
            }
        }
        path
    }
}

impl MazeSolver for DepthFirstSolver {
    fn name(&self) -> &'static str {
        "depth_first"
    }

    fn solve(&mut self, maze: &Maze, rng: &mut Random, observer: &mut dyn Observer) {
        self.solved = false;
        self.explored = 0;
        self.path.clear();

        let exit = maze.exit();
        let mut visited = VisitTable::new(maze);
        let mut stack = vec![maze.entrance()];
        visit_pair(maze, &mut visited, observer, maze.entrance());

        if visited.is_visited(exit) {
            self.solved = true;
        }

        while !self.solved {
            let Some(&current) = stack.last() else {
                break;
            };

            let candidates = maze
                .with_tunnel(current)
                .flat_map(|pos| maze.passages(pos))
                .filter(|&next| !visited.is_visited(next))
                .collect::<SmallVec<[Pos; 8]>>();

            if candidates.contains(&exit) {
                visit_pair(maze, &mut visited, observer, exit);
                stack.push(exit);
                self.solved = true;
                break;
            }

            let next = if self.no_rng {
                candidates.first()
            } else {
                candidates.choose(rng)
            };

            match next {
                Some(&next) => {
                    visit_pair(maze, &mut visited, observer, next);
                    stack.push(next);
                    // The exit may sit at the other end of a tunnel.
                    self.solved = visited.is_visited(exit);
                }
                None => {
                    stack.pop();
                }
            }
        }

        self.explored = visited.count();
        if self.solved {
            self.path = Self::trace(maze, &stack);
        }

        log::debug!(
            "depth first solver {} after {} cells",
            if self.solved { "solved" } else { "gave up" },
            self.explored
        );
    }

    fn is_solved(&self) -> bool {
        self.solved
    }

    fn cells_explored(&self) -> usize {
        self.explored
    }

    fn path(&self) -> Option<&[Pos]> {
        self.solved.then_some(self.path.as_slice())
    }
}

/// One of the two searches of [`BidirectionalBfs`].
#[derive(Debug)]
struct Frontier {
    queue: VecDeque<Pos>,
    visited: VisitTable,
    parents: Array2D<Option<Pos>>,
}

impl Frontier {
    fn new(maze: &Maze, start: Pos) -> Self {
        Self {
            queue: VecDeque::from([start]),
            visited: VisitTable::new(maze),
            parents: Array2D::new_like(None, maze.cells()),
        }
    }

    /// Pops the next cell this side has not visited yet and visits it with its tunnel partner.
    fn advance(&mut self, maze: &Maze, observer: &mut dyn Observer) -> Option<Pos> {
        loop {
            let pos = self.queue.pop_front()?;
            if self.visited.is_visited(pos) {
                continue;
            }

            if let Some(partner) = visit_pair(maze, &mut self.visited, observer, pos) {
                self.parents[partner].get_or_insert(pos);
            }
            return Some(pos);
        }
    }

    /// Which of `pos` and its tunnel partner the other side has already seen.
    fn meeting(&self, maze: &Maze, pos: Pos) -> Option<Pos> {
        maze.with_tunnel(pos)
            .find(|&cell| self.visited.is_visited(cell))
    }

    fn expand(&mut self, maze: &Maze, pos: Pos) {
        for from in maze.with_tunnel(pos) {
            let Some(cell) = maze.cell(from) else {
                continue;
            };

            for (_, next) in cell.open_neighbors() {
                if self.visited.is_visited(next) {
                    continue;
                }
                self.parents[next].get_or_insert(from);
                self.queue.push_back(next);
            }
        }
    }

    /// Walks the parent links from `pos` back to this side's start.
    fn chain(&self, pos: Pos) -> Vec<Pos> {
        let mut chain = vec![pos];
        let mut current = pos;
        while let Some(parent) = self.parents[current] {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

/// Two interleaved breadth-first searches, one from the entrance and one from the exit.
///
/// Every round pops one cell from each side, regardless of the frontier sizes. The search stops
/// as soon as one side pops a cell the other side has visited.
#[derive(Debug, Clone, Default)]
pub struct BidirectionalBfs {
    solved: bool,
    explored: usize,
    path: Vec<Pos>,
}

impl BidirectionalBfs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MazeSolver for BidirectionalBfs {
    fn name(&self) -> &'static str {
        "bidirectional_bfs"
    }

    fn solve(&mut self, maze: &Maze, _: &mut Random, observer: &mut dyn Observer) {
        self.solved = false;
        self.explored = 0;
        self.path.clear();

        let mut head = Frontier::new(maze, maze.entrance());
        let mut tail = Frontier::new(maze, maze.exit());
        let mut meeting = None;

        'search: while !head.queue.is_empty() && !tail.queue.is_empty() {
            for forward in [true, false] {
                let (side, other) = if forward {
                    (&mut head, &tail)
                } else {
                    (&mut tail, &head)
                };

                let Some(pos) = side.advance(maze, observer) else {
                    break 'search;
                };

                if let Some(meet) = other.meeting(maze, pos) {
                    meeting = Some(meet);
                    break 'search;
                }

                side.expand(maze, pos);
            }
        }

        self.explored = head.visited.count() + tail.visited.count();

        if let Some(meet) = meeting {
            let mut path = head.chain(meet);
            path.reverse();
            path.extend(tail.chain(meet).into_iter().skip(1));

            self.path = path;
            self.solved = true;
        }

        log::debug!(
            "bidirectional bfs {} after {} visits",
            if self.solved { "met" } else { "ran dry" },
            self.explored
        );
    }

    fn is_solved(&self) -> bool {
        self.solved
    }

    fn cells_explored(&self) -> usize {
        self.explored
    }

    fn path(&self) -> Option<&[Pos]> {
        self.solved.then_some(self.path.as_slice())
    }
}

use std::{collections::VecDeque, iter};

use rand::Rng as _;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{algorithms::Random, array::Array2D, dims::Pos};

use super::{
    cell::Cell,
    topology::{Direction, Topology, NUM_DIR},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("invalid maze size {rows}x{columns}")]
    InvalidSize { rows: usize, columns: usize },
    #[error("position {0} is outside of the maze")]
    OutOfBounds(Pos),
    #[error("cell {0} cannot tunnel to itself")]
    SelfTunnel(Pos),
    #[error("cell {0} already has a tunnel")]
    AlreadyTunneled(Pos),
}

/// Grid of cells with wired neighbors, walls, tunnels and the entrance/exit pair.
///
/// Generators only ever remove walls; the adjacency itself is fixed at construction.
#[derive(Debug, Clone)]
pub struct Maze {
    pub(crate) cells: Array2D<Cell>,
    pub(crate) entrance: Pos,
    pub(crate) exit: Pos,
}

impl Maze {
    /// Creates a maze with every wall present, entrance at the first and exit at the last cell.
    pub fn new(topology: Topology, rows: usize, columns: usize) -> Result<Maze, MazeError> {
        let fits = rows
            .checked_mul(columns)
            .is_some_and(|count| i32::try_from(count).is_ok());
        if rows == 0 || columns == 0 || !fits {
            return Err(MazeError::InvalidSize { rows, columns });
        }

        let mut cells = Array2D::new(Cell::new(Pos::ZERO), topology, rows, columns);
        let positions = cells.iter_pos().collect::<Vec<_>>();
        for &pos in &positions {
            let cell = &mut cells[pos];
            cell.coord = pos;
            for dir in topology.directions() {
                let neighbor = pos + dir.offset();
                if topology.is_in(neighbor, rows, columns) {
                    cell.neighbors[dir.index()] = Some(neighbor);
                }
            }
        }

        let entrance = positions[0];
        let exit = positions[positions.len() - 1];

        Ok(Maze {
            cells,
            entrance,
            exit,
        })
    }

    pub fn topology(&self) -> Topology {
        self.cells.topology()
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn columns(&self) -> usize {
        self.cells.columns()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_in(&self, pos: Pos) -> bool {
        self.topology().is_in(pos, self.rows(), self.columns())
    }

    pub fn cells(&self) -> &Array2D<Cell> {
        &self.cells
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter_pos()
    }

    pub fn random_cell(&self, rng: &mut Random) -> Option<Pos> {
        if self.cells.is_empty() {
            return None;
        }
        self.cells.idx_to_dim(rng.gen_range(0..self.cells.len()))
    }

    pub fn entrance(&self) -> Pos {
        self.entrance
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn set_entrance(&mut self, pos: Pos) -> Result<(), MazeError> {
        self.check_in(pos)?;
        self.entrance = pos;
        Ok(())
    }

    pub fn set_exit(&mut self, pos: Pos) -> Result<(), MazeError> {
        self.check_in(pos)?;
        self.exit = pos;
        Ok(())
    }

    pub fn neighbor(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        self.cell(pos).and_then(|cell| cell.neighbor(dir))
    }

    pub fn tunnel(&self, pos: Pos) -> Option<Pos> {
        self.cell(pos).and_then(Cell::tunnel)
    }

    /// Links two cells with a tunnel, in both directions.
    pub fn add_tunnel(&mut self, a: Pos, b: Pos) -> Result<(), MazeError> {
        self.check_in(a)?;
        self.check_in(b)?;
        if a == b {
            return Err(MazeError::SelfTunnel(a));
        }

        for pos in [a, b] {
            if self.cells[pos].tunnel.is_some() {
                return Err(MazeError::AlreadyTunneled(pos));
            }
        }

        self.cells[a].tunnel = Some(b);
        self.cells[b].tunnel = Some(a);
        Ok(())
    }

    pub fn tunnels(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.tunnel.map(|other| (cell.coord, other)))
            .filter(|(from, to)| from < to)
    }

    /// `pos` followed by its tunnel partner, if any. Traversals treat the two as one node.
    pub fn with_tunnel(&self, pos: Pos) -> impl Iterator<Item = Pos> {
        iter::once(pos).chain(self.tunnel(pos))
    }

    pub fn tunnel_count(&self) -> usize {
        self.tunnels().count()
    }

    /// Returns the direction from `from` to its geometric neighbor `to`.
    ///
    /// Tunnels are not considered.
    pub fn direction_between(&self, from: Pos, to: Pos) -> Option<Direction> {
        let cell = self.cell(from)?;
        Direction::ALL
            .into_iter()
            .find(|&dir| cell.neighbor(dir) == Some(to))
    }

    pub fn is_carved(&self, pos: Pos, dir: Direction) -> bool {
        self.cell(pos).is_some_and(|cell| cell.is_open(dir))
    }

    /// Removes the wall between `pos` and its neighbor in `dir`, on both sides.
    ///
    /// Returns `false` if there is no neighbor in that direction.
    pub fn carve(&mut self, pos: Pos, dir: Direction) -> bool {
        let Some(neighbor) = self.neighbor(pos, dir) else {
            return false;
        };

        self.cells[pos].remove_wall(dir);
        self.cells[neighbor].remove_wall(dir.opposite());
        log::trace!("carved {} -> {}", pos, neighbor);
        true
    }

    /// Puts every wall back, keeping neighbors and tunnels.
    pub fn reset_walls(&mut self) {
        let positions = self.iter_pos().collect::<Vec<_>>();
        for pos in positions {
            self.cells[pos].restore_walls();
        }
    }

    /// Cells reachable in one step: carved neighbors plus the tunnel partner.
    pub fn passages(&self, pos: Pos) -> SmallVec<[Pos; NUM_DIR + 1]> {
        let Some(cell) = self.cell(pos) else {
            return SmallVec::new();
        };

        let mut passages = cell
            .open_neighbors()
            .map(|(_, neighbor)| neighbor)
            .collect::<SmallVec<[Pos; NUM_DIR + 1]>>();
        passages.extend(cell.tunnel);
        passages
    }

    /// Number of removed walls, each shared wall counted once.
    pub fn carved_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                Direction::ALL
                    .into_iter()
                    .filter(|dir| dir.is_canonical() && cell.is_open(*dir))
                    .count()
            })
            .sum()
    }

    /// Is every cell reachable from the entrance through passages?
    pub fn is_connected(&self) -> bool {
        let mut seen = Array2D::new_like(false, &self.cells);
        let mut queue = VecDeque::from([self.entrance]);
        seen[self.entrance] = true;
        let mut reached = 1;

        while let Some(pos) = queue.pop_front() {
            for next in self.passages(pos) {
                if !seen[next] {
                    seen[next] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }

        reached == self.cell_count()
    }

    /// Carved walls and tunnels form a spanning tree over all cells.
    pub fn is_perfect(&self) -> bool {
        self.carved_count() + self.tunnel_count() + 1 == self.cell_count() && self.is_connected()
    }

    fn check_in(&self, pos: Pos) -> Result<(), MazeError> {
        if self.is_in(pos) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds(pos))
        }
    }
}

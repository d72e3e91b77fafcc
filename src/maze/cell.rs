use crate::dims::Pos;

use super::topology::{Direction, NUM_DIR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wall {
    pub present: bool,
}

impl Wall {
    pub const fn new() -> Wall {
        Wall { present: true }
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}

/// One maze cell with its neighbor slots, walls and optional tunnel partner.
///
/// Neighbor slots outside the grid (or unused by the topology) are `None`. The walls array is
/// parallel to the neighbor slots.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) coord: Pos,
    pub(crate) neighbors: [Option<Pos>; NUM_DIR],
    pub(crate) walls: [Wall; NUM_DIR],
    pub(crate) tunnel: Option<Pos>,
}

impl Cell {
    pub fn new(pos: Pos) -> Cell {
        Cell {
            coord: pos,
            neighbors: [None; NUM_DIR],
            walls: [Wall::new(); NUM_DIR],
            tunnel: None,
        }
    }

    pub fn get_coord(&self) -> Pos {
        self.coord
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Pos> {
        self.neighbors[dir.index()]
    }

    pub fn wall(&self, dir: Direction) -> Wall {
        self.walls[dir.index()]
    }

    pub fn tunnel(&self) -> Option<Pos> {
        self.tunnel
    }

    /// Is there a neighbor in `dir` with the wall towards it removed?
    pub fn is_open(&self, dir: Direction) -> bool {
        self.neighbor(dir).is_some() && !self.walls[dir.index()].present
    }

    pub fn is_closed(&self, dir: Direction) -> bool {
        !self.is_open(dir)
    }

    /// Neighbors reachable through carved walls, in direction order.
    pub fn open_neighbors(&self) -> impl Iterator<Item = (Direction, Pos)> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_open(dir))
            .filter_map(|dir| self.neighbor(dir).map(|pos| (dir, pos)))
    }

    pub(crate) fn remove_wall(&mut self, dir: Direction) {
        self.walls[dir.index()].present = false;
    }

    pub(crate) fn restore_walls(&mut self) {
        self.walls = [Wall::new(); NUM_DIR];
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}

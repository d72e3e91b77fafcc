use std::ops;

use crate::{dims::Pos, maze::Topology};

/// Row-major storage for one value per grid cell.
///
/// Indexing goes through the topology, so hexagonal rows are addressed by their shifted columns.
#[derive(Debug, Clone)]
pub struct Array2D<T> {
    buf: Vec<T>,
    rows: usize,
    columns: usize,
    topology: Topology,
}

impl<T> Array2D<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn dim_to_idx(&self, pos: Pos) -> Option<usize> {
        if !self.topology.is_in(pos, self.rows, self.columns) {
            return None;
        }

        let Pos(row, col) = pos;
        let col = col - self.topology.column_offset(row);
        Some(row as usize * self.columns + col as usize)
    }

    pub fn idx_to_dim(&self, idx: usize) -> Option<Pos> {
        if idx >= self.buf.len() {
            return None;
        }

        let row = (idx / self.columns) as i32;
        let col = (idx % self.columns) as i32 + self.topology.column_offset(row);
        Some(Pos(row, col))
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.dim_to_idx(pos).and_then(|i| self.buf.get(i))
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.dim_to_idx(pos).and_then(|i| self.buf.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// Positions in topology order: rows ascending, then columns ascending.
    pub fn iter_pos(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.buf.len()).filter_map(move |i| self.idx_to_dim(i))
    }
}

impl<T: Clone> Array2D<T> {
    pub fn new(item: T, topology: Topology, rows: usize, columns: usize) -> Self {
        Self {
            buf: vec![item; rows * columns],
            rows,
            columns,
            topology,
        }
    }

    /// Same shape as `other`, every slot set to `item`.
    pub fn new_like<U>(item: T, other: &Array2D<U>) -> Self {
        Self::new(item, other.topology, other.rows, other.columns)
    }

    pub fn fill(&mut self, item: T) {
        self.buf.fill(item);
    }
}

impl<T> ops::Index<Pos> for Array2D<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {}", index))
    }
}

impl<T> ops::IndexMut<Pos> for Array2D<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("Index out of bounds: {}", index))
    }
}

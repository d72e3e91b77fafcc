use crate::{array::Array2D, dims::Pos, maze::Maze};

#[derive(Debug, Clone, Copy)]
struct Node {
    /// `None` for roots.
    parent: Option<usize>,
    /// Member count of the subtree, only meaningful on roots.
    size: usize,
}

/// Union-find over maze cells.
///
/// Nodes live in an arena owned by the set; cells are mapped to arena slots through a grid-shaped
/// index table, so the structure never borrows the maze.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    slots: Array2D<Option<usize>>,
    nodes: Vec<Node>,
    sets: usize,
}

impl DisjointSet {
    /// Empty set, sized for the given maze. No cell is registered yet.
    pub fn new(maze: &Maze) -> Self {
        Self {
            slots: Array2D::new_like(None, maze.cells()),
            nodes: Vec::with_capacity(maze.cell_count()),
            sets: 0,
        }
    }

    /// Registers every cell and joins each tunnel pair up front.
    pub fn from_maze(maze: &Maze) -> Self {
        let mut set = Self::new(maze);
        for pos in maze.iter_pos() {
            set.make_set(pos);
        }

        for (from, to) in maze.tunnels() {
            set.union(from, to);
        }

        set
    }

    /// Creates a singleton set for `pos`. Registering a cell twice is a no-op.
    pub fn make_set(&mut self, pos: Pos) {
        let slot = &mut self.slots[pos];
        if slot.is_some() {
            return;
        }

        *slot = Some(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            size: 1,
        });
        self.sets += 1;
    }

    /// Returns the representative slot of the set containing `pos`.
    ///
    /// # Panics
    /// If `pos` was never registered with [`DisjointSet::make_set`].
    pub fn find(&self, pos: Pos) -> usize {
        let mut current = self.slot(pos);
        while let Some(parent) = self.nodes[current].parent {
            current = parent;
        }
        current
    }

    pub fn same_set(&self, a: Pos, b: Pos) -> bool {
        self.find(a) == self.find(b)
    }

    /// Joins the sets of `a` and `b`, the smaller tree goes under the larger root.
    ///
    /// On equal sizes `b`'s root goes under `a`'s. Returns `false` if both were already in the
    /// same set.
    pub fn union(&mut self, a: Pos, b: Pos) -> bool {
        let a_root = self.find(a);
        let b_root = self.find(b);
        if a_root == b_root {
            return false;
        }

        let (root, child) = if self.nodes[a_root].size < self.nodes[b_root].size {
            (b_root, a_root)
        } else {
            (a_root, b_root)
        };

        self.nodes[child].parent = Some(root);
        self.nodes[root].size += self.nodes[child].size;
        self.sets -= 1;
        true
    }

    /// Number of live (disjoint) sets.
    pub fn set_count(&self) -> usize {
        self.sets
    }

    /// Number of registered cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Size of the set containing `pos`.
    pub fn set_size(&self, pos: Pos) -> usize {
        self.nodes[self.find(pos)].size
    }

    fn slot(&self, pos: Pos) -> usize {
        self.slots[pos].unwrap_or_else(|| panic!("cell {} is not in any set", pos))
    }
}

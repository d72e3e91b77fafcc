use rand::seq::SliceRandom as _;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{algorithms::Random, dims::Pos};

/// Number of direction slots every cell carries, regardless of topology.
pub const NUM_DIR: usize = 6;

/// Neighbor direction, indexed 0 to 5.
///
/// Orthogonal grids use only four of the slots, see [`Direction::NORTH`] and
/// [`Direction::SOUTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    NorthWest = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
}

use Direction::*;

impl Direction {
    pub const ALL: [Direction; NUM_DIR] = [East, NorthEast, NorthWest, West, SouthWest, SouthEast];

    /// Orthogonal north shares the slot of hexagonal north-west.
    pub const NORTH: Direction = NorthWest;
    /// Orthogonal south shares the slot of hexagonal south-east.
    pub const SOUTH: Direction = SouthEast;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 3) % NUM_DIR]
    }

    /// Row and column delta of the neighbor in this direction.
    pub fn offset(self) -> Pos {
        match self {
            East => Pos(0, 1),
            NorthEast => Pos(1, 1),
            NorthWest => Pos(1, 0),
            West => Pos(0, -1),
            SouthWest => Pos(-1, -1),
            SouthEast => Pos(-1, 0),
        }
    }

    /// Directions that always lead to a cell later in topology order.
    ///
    /// Walking only these from every cell lists each adjacency exactly once.
    pub fn is_canonical(self) -> bool {
        self.index() < 3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    #[default]
    Orthogonal,
    Hex,
}

impl Topology {
    /// First addressable column of the given row.
    pub fn column_offset(self, row: i32) -> i32 {
        match self {
            Topology::Orthogonal => 0,
            Topology::Hex => (row + 1) / 2,
        }
    }

    pub fn directions(self) -> &'static [Direction] {
        const ORTHOGONAL: [Direction; 4] = [East, NorthWest, West, SouthEast];

        match self {
            Topology::Orthogonal => &ORTHOGONAL,
            Topology::Hex => &Direction::ALL,
        }
    }

    pub fn has_direction(self, dir: Direction) -> bool {
        self.directions().contains(&dir)
    }

    /// Directions of this topology in a fresh random order.
    pub fn shuffled_directions(self, rng: &mut Random) -> SmallVec<[Direction; NUM_DIR]> {
        let mut dirs = SmallVec::from_slice(self.directions());
        dirs.shuffle(rng);
        dirs
    }

    /// Checks `column_offset(row) <= col < column_offset(row) + columns`.
    pub fn is_in(self, pos: Pos, rows: usize, columns: usize) -> bool {
        let Pos(row, col) = pos;
        if row < 0 || row as usize >= rows {
            return false;
        }

        let offset = self.column_offset(row);
        col >= offset && ((col - offset) as usize) < columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.offset() + dir.opposite().offset(), Pos::ZERO);
        }
    }

    #[test]
    fn orthogonal_uses_four_slots() {
        let dirs = Topology::Orthogonal.directions();
        assert_eq!(dirs.len(), 4);
        assert!(dirs.contains(&Direction::NORTH));
        assert!(dirs.contains(&Direction::SOUTH));
        assert!(!dirs.contains(&NorthEast));
        assert!(!dirs.contains(&SouthWest));
        assert!(Topology::Hex.has_direction(SouthWest));
        assert!(!Topology::Orthogonal.has_direction(NorthEast));
    }

    #[test]
    fn hex_offset_shifts_every_second_row() {
        let hex = Topology::Hex;
        assert_eq!(hex.column_offset(0), 0);
        assert_eq!(hex.column_offset(1), 1);
        assert_eq!(hex.column_offset(2), 1);
        assert_eq!(hex.column_offset(3), 2);

        assert!(hex.is_in(Pos(3, 2), 4, 5));
        assert!(hex.is_in(Pos(3, 6), 4, 5));
        assert!(!hex.is_in(Pos(3, 1), 4, 5));
        assert!(!hex.is_in(Pos(3, 7), 4, 5));
        assert!(!hex.is_in(Pos(4, 2), 4, 5));
    }

    #[test]
    fn orthogonal_bounds() {
        let ortho = Topology::Orthogonal;
        assert!(ortho.is_in(Pos(0, 0), 2, 3));
        assert!(ortho.is_in(Pos(1, 2), 2, 3));
        assert!(!ortho.is_in(Pos(-1, 0), 2, 3));
        assert!(!ortho.is_in(Pos(0, 3), 2, 3));
    }

    #[test]
    fn canonical_directions_point_forward() {
        for dir in Direction::ALL.into_iter().filter(|d| d.is_canonical()) {
            let Pos(dr, dc) = dir.offset();
            assert!(dr > 0 || (dr == 0 && dc > 0));
        }
    }
}

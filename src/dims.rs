use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Grid position as `(row, column)`.
///
/// On hexagonal grids the column is the *addressed* column, i.e. it already includes the row's
/// column offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos(pub i32, pub i32);

impl Pos {
    pub const ZERO: Pos = Pos(0, 0);

    pub fn row(self) -> i32 {
        self.0
    }

    pub fn col(self) -> i32 {
        self.1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, other: Pos) -> Pos {
        Pos(self.0 + other.0, self.1 + other.1)
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, other: Pos) -> Pos {
        Pos(self.0 - other.0, self.1 - other.1)
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, other: Pos) {
        self.0 += other.0;
        self.1 += other.1;
    }
}

impl SubAssign for Pos {
    fn sub_assign(&mut self, other: Pos) {
        self.0 -= other.0;
        self.1 -= other.1;
    }
}

impl From<(i32, i32)> for Pos {
    fn from(tuple: (i32, i32)) -> Self {
        Pos(tuple.0, tuple.1)
    }
}

impl From<Pos> for (i32, i32) {
    fn from(val: Pos) -> Self {
        (val.0, val.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_conversions() {
        let mut pos = Pos(2, 3) + Pos(1, -1);
        assert_eq!(pos, Pos(3, 2));
        pos -= Pos(3, 0);
        assert_eq!(pos, Pos(0, 2));
        pos += Pos(1, 1);
        assert_eq!(pos - Pos(1, 3), Pos::ZERO);

        assert_eq!(Pos::from((4, 5)), Pos(4, 5));
        assert_eq!(<(i32, i32)>::from(Pos(4, 5)), (4, 5));
        assert_eq!(Pos(1, -2).to_string(), "(1, -2)");
    }
}

//! Board coordinates and the direction tables pieces move along.

use std::fmt;

use cornerjump_protocol::{BOARD_SIZE, Coord};
use serde::{Deserialize, Serialize};

/// A step along one axis pair, as `(d_row, d_col)`.
pub type Direction = (i8, i8);

/// Up, down, left, right.
pub const ORTHOGONAL: [Direction; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// The four diagonals.
pub const DIAGONAL: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// All eight compass directions.
pub const ALL_DIRECTIONS: [Direction; 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// A square that is guaranteed to lie on the board.
///
/// The only ways to obtain one are [`Square::new`] and
/// [`Square::try_from`] a wire [`Coord`], both of which bounds-check, so
/// every `Square` in the engine can index the grid directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Returns the square at `(row, col)`, or `None` if it is off the board.
    pub fn new(row: i32, col: i32) -> Option<Self> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// The square `steps` steps away along `dir`, if still on the board.
    pub fn step(self, dir: Direction, steps: i32) -> Option<Self> {
        Self::new(
            self.row as i32 + dir.0 as i32 * steps,
            self.col as i32 + dir.1 as i32 * steps,
        )
    }

    /// `true` for the four corner squares.
    pub fn is_corner(self) -> bool {
        let last = (BOARD_SIZE - 1) as u8;
        (self.row == 0 || self.row == last) && (self.col == 0 || self.col == last)
    }
}

impl TryFrom<Coord> for Square {
    type Error = Coord;

    fn try_from(coord: Coord) -> Result<Self, Self::Error> {
        Self::new(coord.row, coord.col).ok_or(coord)
    }
}

impl From<Square> for Coord {
    fn from(square: Square) -> Self {
        Coord::new(square.row as i32, square.col as i32)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

//! Coordinates, jump directions and the symmetries of the square.
//!
//! The English board is symmetric under all 8 elements of the dihedral group of
//! the square (4 rotations, each optionally mirrored), so every symmetry maps the
//! playable cross onto itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width and height of the grid.
pub const DIM: i32 = 7;

/// A cell position: `x` is the column (`A`..`G`), `y` is the row (`1`..`7`).
///
/// Field order gives the derived `Ord` its x-then-y lexicographic ordering.
/// Off-grid values are representable and every board query treats them as
/// "no such cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The middle cell of the board.
    pub const CENTER: Self = Self::new(3, 3);

    /// Returns true if the coordinate lies inside the 7x7 grid.
    #[inline]
    pub const fn in_grid(self) -> bool {
        self.x >= 0 && self.x < DIM && self.y >= 0 && self.y < DIM
    }

    /// Steps `distance` cells in `direction`.
    ///
    /// Saturates at the `i32` range, so far off-grid inputs stay off the grid.
    #[inline]
    pub const fn step(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(
            self.x.saturating_add(dx.saturating_mul(distance)),
            self.y.saturating_add(dy.saturating_mul(distance)),
        )
    }
}

impl fmt::Display for Coordinate {
    /// Formats in board notation (`D4` is `(3, 3)`); off-grid coordinates fall
    /// back to the raw pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..26).contains(&self.x) && (0..9).contains(&self.y) {
            write!(f, "{}{}", char::from(b'A' + self.x as u8), self.y + 1)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// Orthogonal jump direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in the order legal moves are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step as `(dx, dy)`. Rows grow downward.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One of the 8 symmetries of the square, applied around the board center.
///
/// Organized as 4 rotations, then the same 4 rotations after a left-right
/// mirror:
/// - 0-3: rotate 0, 90, 180, 270 degrees clockwise
/// - 4-7: mirror across the vertical axis, then rotate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetry(u8);

impl Symmetry {
    pub const COUNT: usize = 8;

    pub const IDENTITY: Self = Self(0);

    /// All symmetries, identity first.
    pub const ALL: [Symmetry; Self::COUNT] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    /// Maps an on-grid coordinate to its image.
    pub const fn apply(self, coordinate: Coordinate) -> Coordinate {
        let max = DIM - 1;
        let (x, y) = if self.0 >= 4 {
            (max - coordinate.x, coordinate.y)
        } else {
            (coordinate.x, coordinate.y)
        };
        match self.0 % 4 {
            0 => Coordinate::new(x, y),
            1 => Coordinate::new(max - y, x),
            2 => Coordinate::new(max - x, max - y),
            _ => Coordinate::new(y, max - x),
        }
    }
}

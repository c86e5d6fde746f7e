//! Grid indexing, fingerprint canonicalization and text rendering.
//!
//! The grid is a flat array of `CELL_COUNT` cells in x-major order, so index
//! order and coordinate order agree. Fingerprints are 64-bit masks with bit `i`
//! set when cell `i` holds a marble.

use crate::board::{Board, SlotStatus};
use crate::geometry::{Coordinate, Symmetry, DIM};

/// Number of cells in the 7x7 grid.
pub const CELL_COUNT: usize = (DIM * DIM) as usize;

/// Number of playable (non-blocked) cells on the English board.
pub const PLAYABLE_COUNT: usize = 33;

/// Converts an on-grid coordinate to a linear cell index.
///
/// Index order is x-major: `idx = x * DIM + y`.
#[inline(always)]
pub const fn coord_to_idx(coordinate: Coordinate) -> usize {
    (coordinate.x * DIM + coordinate.y) as usize
}

/// Converts a linear cell index to a coordinate.
#[inline(always)]
pub const fn idx_to_coord(cell_index: usize) -> Coordinate {
    Coordinate::new(cell_index as i32 / DIM, cell_index as i32 % DIM)
}

/// Returns the cell index for a coordinate, or `None` when it is off the grid.
#[inline]
pub const fn cell_index(coordinate: Coordinate) -> Option<usize> {
    if coordinate.in_grid() {
        Some(coord_to_idx(coordinate))
    } else {
        None
    }
}

/// Returns true if the coordinate is one of the 33 cells of the cross.
///
/// The 16 blocked cells are the 2x2 corner squares outside columns and rows 2..=4.
#[inline]
pub const fn is_playable(coordinate: Coordinate) -> bool {
    coordinate.in_grid()
        && ((coordinate.x >= 2 && coordinate.x <= 4) || (coordinate.y >= 2 && coordinate.y <= 4))
}

/// Builds the symmetry lookup table at compile time.
///
/// For each of the 8 symmetries and each cell, stores where that cell ends up.
const fn build_symmetry_table() -> [[u8; CELL_COUNT]; Symmetry::COUNT] {
    let mut table = [[0u8; CELL_COUNT]; Symmetry::COUNT];

    let mut sym = 0;
    while sym < Symmetry::COUNT {
        let mut src = 0;
        while src < CELL_COUNT {
            let image = Symmetry::ALL[sym].apply(idx_to_coord(src));
            table[sym][src] = coord_to_idx(image) as u8;
            src += 1;
        }
        sym += 1;
    }
    table
}

static SYMMETRY_TABLE: [[u8; CELL_COUNT]; Symmetry::COUNT] = build_symmetry_table();

/// Moves every set bit of `mask` to its image under one symmetry.
#[inline]
fn transform_mask(mask: u64, mapping: &[u8; CELL_COUNT]) -> u64 {
    let mut remaining = mask;
    let mut transformed = 0u64;
    while remaining != 0 {
        let source_cell = remaining.trailing_zeros() as usize;
        transformed |= 1u64 << mapping[source_cell];
        // clear the lowest set bit
        remaining &= remaining - 1;
    }
    transformed
}

/// Finds the smallest mask among all 8 symmetric images of `mask`.
///
/// Two boards that are rotations or reflections of each other share this key.
#[inline]
pub fn canonical_mask(mask: u64) -> u64 {
    let mut smallest = mask;

    // try all symmetries except identity (index 0)
    for mapping in &SYMMETRY_TABLE[1..] {
        let transformed = transform_mask(mask, mapping);
        if transformed < smallest {
            smallest = transformed;
        }
    }

    smallest
}

/// Formats a board as a human-readable grid.
///
/// Columns are labelled `A`..`G`, rows `1`..`7`. Marbles show as `O`, empty
/// holes as `X`, blocked cells as blanks. Trailing blanks are trimmed.
pub fn format_board(board: &Board) -> String {
    let mut output = String::from(" ");
    for x in 0..DIM {
        output.push(' ');
        output.push(char::from(b'A' + x as u8));
    }
    output.push('\n');

    for y in 0..DIM {
        let mut line = format!("{}", y + 1);
        for x in 0..DIM {
            let display_char = match board.cell(coord_to_idx(Coordinate::new(x, y))) {
                SlotStatus::Marble => 'O',
                SlotStatus::Empty => 'X',
                SlotStatus::Blocked => ' ',
            };
            line.push(' ');
            line.push(display_char);
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

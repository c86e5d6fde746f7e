//! Board model: slot statuses, moves and the jump rules.
//!
//! A [`Board`] is a small `Copy` value. Applying a move never mutates the
//! board it is called on; it returns the successor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, IllegalMove};
use crate::geometry::{Coordinate, Direction};
use crate::grid::{canonical_mask, cell_index, coord_to_idx, idx_to_coord, is_playable, CELL_COUNT};

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Outside the cross; never changes.
    Blocked,
    Empty,
    Marble,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotStatus::Blocked => "blocked",
            SlotStatus::Empty => "empty",
            SlotStatus::Marble => "marble",
        })
    }
}

/// Rule deciding which one-marble boards count as won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WinCondition {
    /// A single marble left anywhere on the board.
    #[default]
    AnyCell,
    /// A single marble left in the center hole.
    Center,
}

impl WinCondition {
    pub fn is_met(self, board: &Board) -> bool {
        match self {
            WinCondition::AnyCell => board.is_winning_state(),
            WinCondition::Center => {
                board.is_winning_state() && board.status(Coordinate::CENTER) == Some(SlotStatus::Marble)
            }
        }
    }
}

/// Content key of a board, used for deduplication.
///
/// Bit `i` is set when cell `i` holds a marble. The blocked cells never change,
/// so equal fingerprints mean equal boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

/// A jump of the marble at `from` over its neighbour in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Id of the board this move was generated from, if it came from a search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<u64>,
    pub from: Coordinate,
    pub direction: Direction,
}

impl Move {
    pub const fn new(from: Coordinate, direction: Direction) -> Self {
        Self {
            origin: None,
            from,
            direction,
        }
    }

    /// Tags the move with the id of the board it was generated from.
    pub const fn with_origin(mut self, board_id: u64) -> Self {
        self.origin = Some(board_id);
        self
    }

    /// The cell whose marble gets captured.
    pub const fn over(&self) -> Coordinate {
        self.from.step(self.direction, 1)
    }

    /// The cell the jumping marble lands in.
    pub const fn landing(&self) -> Coordinate {
        self.from.step(self.direction, 2)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.direction)
    }
}

/// One game configuration on the English cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [SlotStatus; CELL_COUNT],
}

impl Board {
    /// All 49 cells with the cross shape applied and every hole empty.
    fn empty_cross() -> Self {
        let mut cells = [SlotStatus::Blocked; CELL_COUNT];
        for (idx, cell) in cells.iter_mut().enumerate() {
            if is_playable(idx_to_coord(idx)) {
                *cell = SlotStatus::Empty;
            }
        }
        Self { cells }
    }

    /// The starting position: 32 marbles, center hole empty.
    pub fn standard() -> Self {
        let mut board = Self::empty_cross();
        for cell in board.cells.iter_mut() {
            if *cell == SlotStatus::Empty {
                *cell = SlotStatus::Marble;
            }
        }
        board.cells[coord_to_idx(Coordinate::CENTER)] = SlotStatus::Empty;
        board
    }

    /// A cross with marbles exactly at `marbles` and every other hole empty.
    pub fn from_marbles(marbles: &[Coordinate]) -> Result<Self, BoardError> {
        let mut board = Self::empty_cross();
        for &at in marbles {
            let idx = cell_index(at)
                .filter(|_| is_playable(at))
                .ok_or(BoardError::NotPlayable { at })?;
            if board.cells[idx] == SlotStatus::Marble {
                return Err(BoardError::DuplicateMarble { at });
            }
            board.cells[idx] = SlotStatus::Marble;
        }
        Ok(board)
    }

    /// Builds a board from raw cells, rejecting anything that is not the cross.
    pub fn from_cells(cells: [SlotStatus; CELL_COUNT]) -> Result<Self, BoardError> {
        for (idx, &found) in cells.iter().enumerate() {
            let at = idx_to_coord(idx);
            if is_playable(at) == (found == SlotStatus::Blocked) {
                return Err(BoardError::ShapeMismatch { at, found });
            }
        }
        Ok(Self { cells })
    }

    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> SlotStatus {
        self.cells[idx]
    }

    /// Status of the cell at `at`, or `None` when it is off the grid.
    pub fn status(&self, at: Coordinate) -> Option<SlotStatus> {
        cell_index(at).map(|idx| self.cells[idx])
    }

    /// Every cell with its coordinate, in ascending coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, SlotStatus)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, &status)| (idx_to_coord(idx), status))
    }

    /// Coordinates of all marbles, in ascending coordinate order.
    pub fn marbles(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells()
            .filter(|&(_, status)| status == SlotStatus::Marble)
            .map(|(at, _)| at)
    }

    pub fn marble_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&status| status == SlotStatus::Marble)
            .count()
    }

    /// True when exactly one marble is left, wherever it is.
    ///
    /// See [`WinCondition::Center`] for the classic rule.
    pub fn is_winning_state(&self) -> bool {
        self.marble_count() == 1
    }

    /// Checks a jump and returns the start, middle and landing cell indices.
    fn check_jump(&self, from: Coordinate, direction: Direction) -> Result<[usize; 3], IllegalMove> {
        let start = cell_index(from).ok_or(IllegalMove::OffBoard { at: from })?;
        if self.cells[start] != SlotStatus::Marble {
            return Err(IllegalMove::NoMarble { at: from });
        }

        let over = from.step(direction, 1);
        let landing = from.step(direction, 2);
        let middle = cell_index(over).ok_or(IllegalMove::OffBoard { at: over })?;
        if self.cells[middle] != SlotStatus::Marble {
            return Err(IllegalMove::NothingToJump { at: over });
        }
        let end = cell_index(landing).ok_or(IllegalMove::OffBoard { at: landing })?;
        if self.cells[end] != SlotStatus::Empty {
            return Err(IllegalMove::LandingNotEmpty {
                at: landing,
                found: self.cells[end],
            });
        }

        Ok([start, middle, end])
    }

    /// Copies the board and performs an already checked jump.
    #[inline]
    fn jumped(&self, [start, middle, end]: [usize; 3]) -> Self {
        let mut next = *self;
        next.cells[start] = SlotStatus::Empty;
        next.cells[middle] = SlotStatus::Empty;
        next.cells[end] = SlotStatus::Marble;
        next
    }

    /// Returns true if `mv` can be played on this board.
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.check_jump(mv.from, mv.direction).is_ok()
    }

    /// All legal moves, cells in ascending coordinate order and directions in
    /// `Up, Right, Down, Left` order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.successors().map(|(mv, _)| mv)
    }

    /// Every legal move paired with the board it produces, in
    /// [`legal_moves`](Self::legal_moves) order.
    pub fn successors(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        self.marbles().flat_map(move |from| {
            Direction::ALL.into_iter().filter_map(move |direction| {
                self.check_jump(from, direction)
                    .ok()
                    .map(|cells| (Move::new(from, direction), self.jumped(cells)))
            })
        })
    }

    pub fn has_no_legal_moves(&self) -> bool {
        self.legal_moves().next().is_none()
    }

    /// Plays `mv`, returning the successor board.
    ///
    /// An illegal move is rejected with the reason and `self` is untouched.
    pub fn apply_move(&self, mv: &Move) -> Result<Board, IllegalMove> {
        let cells = self.check_jump(mv.from, mv.direction)?;
        Ok(self.jumped(cells))
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mask = self
            .cells
            .iter()
            .enumerate()
            .filter(|&(_, &status)| status == SlotStatus::Marble)
            .fold(0u64, |mask, (idx, _)| mask | 1u64 << idx);
        Fingerprint(mask)
    }

    /// Fingerprint shared by all rotations and reflections of this board.
    pub fn canonical_fingerprint(&self) -> Fingerprint {
        Fingerprint(canonical_mask(self.fingerprint().0))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

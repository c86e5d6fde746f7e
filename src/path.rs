//! Move histories with shared prefixes, and replaying them.
//!
//! Every frontier entry owns a [`Path`], but siblings share their common
//! prefix: recording a move allocates one link and leaves the parent path
//! untouched.

use std::fmt;
use std::rc::Rc;

use crate::board::{Board, Move};
use crate::error::ReplayError;
use crate::grid::format_board;

#[derive(Debug)]
struct Link {
    mv: Move,
    parent: Option<Rc<Link>>,
}

/// An append-only sequence of moves from a start board.
#[derive(Debug, Clone, Default)]
pub struct Path {
    head: Option<Rc<Link>>,
    len: usize,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path that plays `moves` in order.
    pub fn from_moves(moves: &[Move]) -> Self {
        moves.iter().fold(Self::new(), |path, &mv| path.record(mv))
    }

    /// Returns a new path extended by `mv`; `self` is unchanged.
    pub fn record(&self, mv: Move) -> Self {
        Self {
            head: Some(Rc::new(Link {
                mv,
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recently recorded move.
    pub fn last(&self) -> Option<&Move> {
        self.head.as_deref().map(|link| &link.mv)
    }

    /// The moves in play order.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(link) = cursor {
            moves.push(link.mv);
            cursor = link.parent.as_deref();
        }
        moves.reverse();
        moves
    }

    /// Replays this path from the standard board.
    pub fn replay(&self) -> Result<Vec<Board>, ReplayError> {
        replay(&Board::standard(), &self.moves())
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.moves() == other.moves()
    }
}

impl Eq for Path {}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mv}")?;
        }
        Ok(())
    }
}

/// Applies `moves` in order from `start`.
///
/// Returns every board along the way, starting with `start` itself. Fails on
/// the first move that is not legal against the replayed board.
pub fn replay(start: &Board, moves: &[Move]) -> Result<Vec<Board>, ReplayError> {
    let mut boards = Vec::with_capacity(moves.len() + 1);
    boards.push(*start);
    let mut current = *start;
    for (index, mv) in moves.iter().enumerate() {
        current = current
            .apply_move(mv)
            .map_err(|source| ReplayError { index, source })?;
        boards.push(current);
    }
    Ok(boards)
}

/// Applies `moves` in order from `start` and returns only the final board.
pub fn replay_final(start: &Board, moves: &[Move]) -> Result<Board, ReplayError> {
    moves
        .iter()
        .enumerate()
        .try_fold(*start, |board, (index, mv)| {
            board
                .apply_move(mv)
                .map_err(|source| ReplayError { index, source })
        })
}

/// Formats a replayed path as numbered moves, each followed by the board it
/// produces.
pub fn format_replay(start: &Board, moves: &[Move]) -> Result<String, ReplayError> {
    let boards = replay(start, moves)?;

    let mut output = format!("Start ({} marbles):\n", start.marble_count());
    output.push_str(&format_board(start));
    for (i, (mv, board)) in moves.iter().zip(&boards[1..]).enumerate() {
        output.push_str(&format!("\nMove {}: {}\n", i + 1, mv));
        output.push_str(&format_board(board));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IllegalMove;
    use crate::geometry::{Coordinate, Direction};

    fn opening() -> Vec<Move> {
        vec![
            Move::new(Coordinate::new(3, 1), Direction::Down),
            Move::new(Coordinate::new(1, 2), Direction::Right),
        ]
    }

    #[test]
    fn test_record_leaves_parent_untouched() {
        let root = Path::new();
        let first = root.record(opening()[0]);
        let left = first.record(opening()[1]);
        let right = first.record(Move::new(Coordinate::new(3, 4), Direction::Up));

        assert!(root.is_empty());
        assert_eq!(first.len(), 1);
        assert_eq!(left.moves(), opening());
        assert_eq!(right.len(), 2);
        assert_eq!(right.last(), Some(&Move::new(Coordinate::new(3, 4), Direction::Up)));
        assert_eq!(first.moves(), vec![opening()[0]]);
    }

    #[test]
    fn test_replay_returns_every_board() {
        let boards = Path::from_moves(&opening()).replay().unwrap();
        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0], Board::standard());
        let counts: Vec<usize> = boards.iter().map(Board::marble_count).collect();
        assert_eq!(counts, vec![32, 31, 30]);
        assert_eq!(
            replay_final(&Board::standard(), &opening()).unwrap(),
            boards[2]
        );
    }

    #[test]
    fn test_replay_reports_failing_index() {
        let mut moves = opening();
        // the center was refilled by the first move, so this jump has nowhere to land
        moves.push(Move::new(Coordinate::new(5, 3), Direction::Left));
        let err = replay(&Board::standard(), &moves).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(
            err.source,
            IllegalMove::LandingNotEmpty {
                at: Coordinate::CENTER,
                found: crate::board::SlotStatus::Marble,
            }
        );
    }

    #[test]
    fn test_display_lists_moves() {
        let path = Path::from_moves(&opening());
        assert_eq!(path.to_string(), "D2 DOWN, B3 RIGHT");
    }

    #[test]
    fn test_format_replay() {
        let moves = &opening()[..1];
        insta::assert_snapshot!(format_replay(&Board::standard(), moves).unwrap(), @r"
        Start (32 marbles):
          A B C D E F G
        1     O O O
        2     O O O
        3 O O O O O O O
        4 O O O X O O O
        5 O O O O O O O
        6     O O O
        7     O O O

        Move 1: D2 DOWN
          A B C D E F G
        1     O O O
        2     O X O
        3 O O O X O O O
        4 O O O O O O O
        5 O O O O O O O
        6     O O O
        7     O O O
        ");
    }
}

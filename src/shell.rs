//! Interactive console game.
//!
//! Reads one move token per line (`D2DOWN`, `b4 right`). Bad input is reported
//! and the player is asked again; the game ends on a win, when no jump is left,
//! on `QUIT`, or at end of input.

use std::io::{self, BufRead, Write};

use marbles::grid::format_board;
use marbles::notation::{parse_move, sanitise};
use marbles::{Board, WinCondition};

/// Plays from `board` until the game is over and returns the final board.
pub fn play<R: BufRead, W: Write>(
    mut board: Board,
    win_condition: WinCondition,
    input: R,
    output: &mut W,
) -> io::Result<Board> {
    let mut lines = input.lines();

    loop {
        writeln!(output)?;
        write!(output, "{}", format_board(&board))?;

        if win_condition.is_met(&board) {
            writeln!(output, "You won with a single marble left!")?;
            return Ok(board);
        }
        if board.has_no_legal_moves() {
            writeln!(
                output,
                "No jumps left: {} marbles remain.",
                board.marble_count()
            )?;
            return Ok(board);
        }

        writeln!(output, "Possible jumps:")?;
        for mv in board.legal_moves() {
            writeln!(output, "  {mv}")?;
        }
        writeln!(
            output,
            "Select a marble by typing its location then a direction (e.g. D2DOWN), or QUIT:"
        )?;
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(board);
        };
        let line = line?;
        if sanitise(&line) == "QUIT" {
            return Ok(board);
        }

        let mv = match parse_move(&line) {
            Ok(mv) => mv,
            Err(err) => {
                writeln!(output, "Invalid selection: {err}")?;
                continue;
            }
        };
        match board.apply_move(&mv) {
            Ok(next) => {
                writeln!(output, "Jumped {mv}.")?;
                board = next;
            }
            Err(err) => writeln!(output, "Cannot jump {mv}: {err}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use marbles::{Coordinate, SlotStatus};

    fn run(board: Board, script: &str) -> (Board, String) {
        let mut output = Vec::new();
        let board = play(board, WinCondition::AnyCell, script.as_bytes(), &mut output).unwrap();
        (board, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_bad_input_is_reported_and_game_continues() {
        let (board, output) = run(Board::standard(), "hello\nA1UP\nd2 down\nquit\n");

        assert!(output.contains("Invalid selection: 'E' is not a row digit"));
        assert!(output.contains("Cannot jump A1 UP: A1 has no marble to move"));
        assert!(output.contains("Jumped D2 DOWN."));
        assert_eq!(board.marble_count(), 31);
        assert_eq!(board.status(Coordinate::CENTER), Some(SlotStatus::Marble));
    }

    #[test]
    fn test_game_ends_on_win() {
        let start = Board::from_marbles(&[Coordinate::new(3, 0), Coordinate::new(3, 1)]).unwrap();
        let (board, output) = run(start, "D1DOWN\n");

        assert!(board.is_winning_state());
        assert!(output.contains("You won with a single marble left!"));
    }

    #[test]
    fn test_game_ends_when_stuck() {
        let start = Board::from_marbles(&[Coordinate::new(0, 2), Coordinate::new(6, 4)]).unwrap();
        let (_, output) = run(start, "");
        assert!(output.contains("No jumps left: 2 marbles remain."));
    }

    #[test]
    fn test_end_of_input_stops_the_game() {
        let (board, output) = run(Board::standard(), "");
        assert_eq!(board, Board::standard());
        assert!(output.contains("Possible jumps:\n  B4 RIGHT\n  D2 DOWN\n  D6 UP\n  F4 LEFT\n"));
    }
}

//! Move notation used by the console shell: `D4RIGHT`, `c3 up`, `E5 Left`.
//!
//! The first character is the column letter (`A` is column 0), the second the
//! row digit (`1` is row 0) and the rest the direction keyword. Input is
//! case-insensitive and whitespace is ignored. Letters and digits beyond the
//! board still parse; the resulting off-grid coordinate is rejected later by
//! the move rules.

use std::str::FromStr;

use crate::board::Move;
use crate::error::NotationError;
use crate::geometry::{Coordinate, Direction};

/// Uppercases the input and drops all whitespace.
pub fn sanitise(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn parse_column(found: char) -> Result<i32, NotationError> {
    if found.is_ascii_uppercase() {
        Ok((found as u8 - b'A') as i32)
    } else {
        Err(NotationError::BadColumn { found })
    }
}

fn parse_row(found: char) -> Result<i32, NotationError> {
    found
        .to_digit(10)
        .map(|digit| digit as i32 - 1)
        .ok_or(NotationError::BadRow { found })
}

/// Parses a cell such as `D4`.
pub fn parse_coordinate(input: &str) -> Result<Coordinate, NotationError> {
    let token = sanitise(input);
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => Err(NotationError::Empty),
        (Some(column), Some(row), None) => Ok(Coordinate::new(parse_column(column)?, parse_row(row)?)),
        (Some(_), None, _) => Err(NotationError::TooShort { token: token.clone() }),
        (Some(_), Some(_), Some(_)) => Err(NotationError::TooLong { token: token.clone() }),
    }
}

impl FromStr for Direction {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = sanitise(s);
        Direction::ALL
            .into_iter()
            .find(|direction| direction.keyword() == keyword)
            .ok_or(NotationError::BadDirection { found: keyword })
    }
}

/// Parses a full move token such as `D4RIGHT`.
pub fn parse_move(input: &str) -> Result<Move, NotationError> {
    let token = sanitise(input);
    let mut chars = token.chars();
    let (column, row) = match (chars.next(), chars.next()) {
        (None, _) => return Err(NotationError::Empty),
        (Some(column), Some(row)) if !chars.as_str().is_empty() => (column, row),
        _ => return Err(NotationError::TooShort { token: token.clone() }),
    };

    let from = Coordinate::new(parse_column(column)?, parse_row(row)?);
    let direction = chars.as_str().parse()?;
    Ok(Move::new(from, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_token() {
        assert_eq!(
            parse_move("D2DOWN"),
            Ok(Move::new(Coordinate::new(3, 1), Direction::Down))
        );
        assert_eq!(
            parse_move("  b4 right "),
            Ok(Move::new(Coordinate::new(1, 3), Direction::Right))
        );
        assert_eq!(
            parse_move("f4Left"),
            Ok(Move::new(Coordinate::new(5, 3), Direction::Left))
        );
    }

    #[test]
    fn test_parse_move_errors() {
        assert_eq!(parse_move("   "), Err(NotationError::Empty));
        assert_eq!(
            parse_move("D4"),
            Err(NotationError::TooShort {
                token: "D4".to_string()
            })
        );
        assert_eq!(parse_move("44UP"), Err(NotationError::BadColumn { found: '4' }));
        assert_eq!(parse_move("DXUP"), Err(NotationError::BadRow { found: 'X' }));
        assert_eq!(
            parse_move("D4NORTH"),
            Err(NotationError::BadDirection {
                found: "NORTH".to_string()
            })
        );
    }

    #[test]
    fn test_out_of_range_cells_parse_off_grid() {
        let mv = parse_move("H9UP").unwrap();
        assert_eq!(mv.from, Coordinate::new(7, 8));
        assert!(!mv.from.in_grid());

        let zero_row = parse_move("A0DOWN").unwrap();
        assert_eq!(zero_row.from, Coordinate::new(0, -1));
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("d4"), Ok(Coordinate::CENTER));
        assert_eq!(
            parse_coordinate("D"),
            Err(NotationError::TooShort {
                token: "D".to_string()
            })
        );
    }

    #[test]
    fn test_parse_coordinate_rejects_extra_characters() {
        assert_eq!(
            parse_coordinate("D10"),
            Err(NotationError::TooLong {
                token: "D10".to_string()
            })
        );
        assert_eq!(
            parse_coordinate("d4 up").unwrap_err().to_string(),
            "'D4UP' is too long: a cell is a column letter and a row digit"
        );
    }

    #[test]
    fn test_move_display_round_trips_through_parser() {
        let mv = Move::new(Coordinate::new(2, 4), Direction::Up);
        assert_eq!(mv.to_string(), "C5 UP");
        assert_eq!(parse_move(&mv.to_string()), Ok(mv));
    }
}

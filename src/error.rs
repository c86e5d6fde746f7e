//! Error types for the board model, notation parser, search engine and files.

use std::path::PathBuf;

use crate::board::SlotStatus;
use crate::geometry::Coordinate;
use crate::solver::SearchCounters;

/// Why a move cannot be played on a board.
///
/// Illegal moves are an expected outcome of play, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("{at} is off the board")]
    OffBoard { at: Coordinate },

    #[error("{at} has no marble to move")]
    NoMarble { at: Coordinate },

    #[error("there is no marble at {at} to jump over")]
    NothingToJump { at: Coordinate },

    #[error("landing cell {at} is {found}, not an empty hole")]
    LandingNotEmpty { at: Coordinate, found: SlotStatus },
}

/// Errors building a board from explicit cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{at} is not a playable cell")]
    NotPlayable { at: Coordinate },

    #[error("{at} is listed more than once")]
    DuplicateMarble { at: Coordinate },

    #[error("cell {at} is {found}, which does not match the cross shape")]
    ShapeMismatch { at: Coordinate, found: SlotStatus },
}

/// Errors parsing a move token such as `D4RIGHT`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty input")]
    Empty,

    #[error("'{token}' is too short: expected a column letter, a row digit and a direction")]
    TooShort { token: String },

    #[error("'{token}' is too long: a cell is a column letter and a row digit")]
    TooLong { token: String },

    #[error("'{found}' is not a column letter")]
    BadColumn { found: char },

    #[error("'{found}' is not a row digit")]
    BadRow { found: char },

    #[error("'{found}' is not a direction (expected UP, DOWN, LEFT or RIGHT)")]
    BadDirection { found: String },
}

/// A recorded move that no longer applies when replaying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("move {index} is illegal during replay: {source}")]
pub struct ReplayError {
    /// Zero-based position of the failing move in the path.
    pub index: usize,
    pub source: IllegalMove,
}

/// Non-fatal conditions that stop a traversal early.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("{resource} limit of {limit} exceeded after exploring {} boards", .counters.explored)]
    LimitExceeded {
        resource: &'static str,
        limit: usize,
        counters: SearchCounters,
    },
}

/// Errors saving or loading a checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to read checkpoint {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse checkpoint {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported checkpoint version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("board {id}: expected {expected} cells, got {found}")]
    CellCount {
        id: u64,
        expected: usize,
        found: usize,
    },

    #[error("board {id}: cell {index} is {found}, expected {expected}")]
    CellOrder {
        id: u64,
        index: usize,
        expected: Coordinate,
        found: Coordinate,
    },

    #[error("board {id}: {source}")]
    Board { id: u64, source: BoardError },

    #[error("board {id}: recorded marble count {recorded} but cells hold {actual}")]
    MarbleCount {
        id: u64,
        recorded: usize,
        actual: usize,
    },

    #[error("board {id}: {source}")]
    Replay { id: u64, source: ReplayError },

    #[error("board {id}: replaying its moves does not reproduce its cells")]
    PathMismatch { id: u64 },

    #[error("invalid checkpoint: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_move_display() {
        let err = IllegalMove::LandingNotEmpty {
            at: Coordinate::new(0, 2),
            found: SlotStatus::Marble,
        };
        assert_eq!(err.to_string(), "landing cell A3 is marble, not an empty hole");
    }

    #[test]
    fn test_replay_error_display() {
        let err = ReplayError {
            index: 4,
            source: IllegalMove::NoMarble {
                at: Coordinate::CENTER,
            },
        };
        assert_eq!(
            err.to_string(),
            "move 4 is illegal during replay: D4 has no marble to move"
        );
    }

    #[test]
    fn test_limit_exceeded_display() {
        let err = SearchError::LimitExceeded {
            resource: "frontier",
            limit: 10,
            counters: SearchCounters {
                explored: 7,
                ..SearchCounters::default()
            },
        };
        assert_eq!(
            err.to_string(),
            "frontier limit of 10 exceeded after exploring 7 boards"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("progress_interval must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: progress_interval must be > 0"
        );
    }
}

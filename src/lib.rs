//! English Peg Solitaire Library
//!
//! Provides the board model, jump rules and a deduplicated breadth-first or
//! depth-first search over every position reachable from a start board.

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod notation;
pub mod path;
pub mod persistence;
pub mod solver;

pub use board::{Board, Fingerprint, Move, SlotStatus, WinCondition};
pub use config::{Dedup, ResourceLimits, SearchConfig, Strategy};
pub use error::{
    BoardError, CheckpointError, ConfigError, IllegalMove, NotationError, ReplayError, SearchError,
};
pub use geometry::{Coordinate, Direction};
pub use path::Path;
pub use solver::{BoardId, Node, SearchCounters, SearchReport, Solver, StepOutcome};

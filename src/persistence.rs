//! File I/O for search checkpoints and solution reports.
//!
//! Checkpoint format (`CHECKPOINT_VERSION` = 1), a single JSON object:
//! - `version`: format version
//! - `config`: the search configuration
//! - `next_id`: next board id the solver will hand out
//! - `counters`: explored / winning / stuck / duplicates / max_frontier
//! - `start`: board record of the traversal's start board
//! - `seen`: seen fingerprints as integers
//! - `frontier`: board records in frontier storage order
//! - `winning`: board records of the winning boards found so far
//!
//! A board record holds the board id, all 49 `(coordinate, status)` pairs in
//! coordinate order, the moves from the start board and the marble count.
//! Loading re-validates every record, including replaying its moves, so a
//! damaged file is rejected instead of resuming from an impossible board.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Fingerprint, Move, SlotStatus};
use crate::config::SearchConfig;
use crate::error::CheckpointError;
use crate::geometry::Coordinate;
use crate::grid::{format_board, idx_to_coord, CELL_COUNT};
use crate::path::{self, replay_final};
use crate::solver::{BoardId, Node, SearchCounters, SearchReport, Solver};

pub const CHECKPOINT_VERSION: u32 = 1;

/// Default file name for the text solution report.
pub const SOLUTIONS_TXT: &str = "solutions.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub at: Coordinate,
    pub status: SlotStatus,
}

/// One board with its id and the moves that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub id: BoardId,
    pub cells: Vec<CellRecord>,
    pub moves: Vec<Move>,
    pub marble_count: usize,
}

impl BoardRecord {
    pub fn new(id: BoardId, board: &Board, moves: Vec<Move>) -> Self {
        Self {
            id,
            cells: board
                .cells()
                .map(|(at, status)| CellRecord { at, status })
                .collect(),
            moves,
            marble_count: board.marble_count(),
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::new(node.id, &node.board, node.path.moves())
    }

    /// Rebuilds the board, checking cell order, shape and marble count.
    pub fn to_board(&self) -> Result<Board, CheckpointError> {
        if self.cells.len() != CELL_COUNT {
            return Err(CheckpointError::CellCount {
                id: self.id,
                expected: CELL_COUNT,
                found: self.cells.len(),
            });
        }

        let mut cells = [SlotStatus::Blocked; CELL_COUNT];
        for (index, (cell, record)) in cells.iter_mut().zip(&self.cells).enumerate() {
            let expected = idx_to_coord(index);
            if record.at != expected {
                return Err(CheckpointError::CellOrder {
                    id: self.id,
                    index,
                    expected,
                    found: record.at,
                });
            }
            *cell = record.status;
        }

        let board = Board::from_cells(cells).map_err(|source| CheckpointError::Board {
            id: self.id,
            source,
        })?;
        if board.marble_count() != self.marble_count {
            return Err(CheckpointError::MarbleCount {
                id: self.id,
                recorded: self.marble_count,
                actual: board.marble_count(),
            });
        }
        Ok(board)
    }

    /// Rebuilds the node, checking that its moves lead from `start` to its cells.
    fn to_node(&self, start: &Board) -> Result<Node, CheckpointError> {
        let board = self.to_board()?;
        let replayed = replay_final(start, &self.moves).map_err(|source| CheckpointError::Replay {
            id: self.id,
            source,
        })?;
        if replayed != board {
            return Err(CheckpointError::PathMismatch { id: self.id });
        }
        Ok(Node {
            id: self.id,
            board,
            path: path::Path::from_moves(&self.moves),
        })
    }
}

/// Everything needed to resume a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub config: SearchConfig,
    pub next_id: BoardId,
    pub counters: SearchCounters,
    pub start: BoardRecord,
    pub seen: Vec<Fingerprint>,
    pub frontier: Vec<BoardRecord>,
    pub winning: Vec<BoardRecord>,
}

impl Checkpoint {
    /// Captures the solver's state between steps.
    pub fn capture(solver: &Solver) -> Self {
        let mut seen: Vec<Fingerprint> = solver.seen().collect();
        // stable output for identical states
        seen.sort_unstable();

        Self {
            version: CHECKPOINT_VERSION,
            config: *solver.config(),
            next_id: solver.next_id(),
            counters: solver.counters(),
            start: BoardRecord::new(0, solver.start(), Vec::new()),
            seen,
            frontier: solver.frontier().map(BoardRecord::from_node).collect(),
            winning: solver.winning().iter().map(BoardRecord::from_node).collect(),
        }
    }

    /// Validates every record and rebuilds the solver.
    pub fn into_solver(self) -> Result<Solver, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::Version {
                found: self.version,
                expected: CHECKPOINT_VERSION,
            });
        }
        self.config
            .validate()
            .map_err(|err| CheckpointError::Inconsistent(err.to_string()))?;

        let start = self.start.to_board()?;
        if !self.start.moves.is_empty() {
            return Err(CheckpointError::Inconsistent(
                "start board has recorded moves".to_string(),
            ));
        }

        let frontier = self
            .frontier
            .iter()
            .map(|record| record.to_node(&start))
            .collect::<Result<Vec<_>, _>>()?;
        let winning = self
            .winning
            .iter()
            .map(|record| record.to_node(&start))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(node) = frontier
            .iter()
            .chain(&winning)
            .find(|node| node.id >= self.next_id)
        {
            return Err(CheckpointError::Inconsistent(format!(
                "board id {} is not below next_id {}",
                node.id, self.next_id
            )));
        }
        if let Some(node) = winning
            .iter()
            .find(|node| !self.config.win_condition.is_met(&node.board))
        {
            return Err(CheckpointError::Inconsistent(format!(
                "board {} is recorded as winning but is not",
                node.id
            )));
        }
        if self.counters.winning != winning.len() {
            return Err(CheckpointError::Inconsistent(format!(
                "counters report {} winning boards but {} are recorded",
                self.counters.winning,
                winning.len()
            )));
        }

        let solver = Solver::restore(
            self.config,
            start,
            self.next_id,
            self.counters,
            self.seen,
            frontier,
            winning,
        );
        if let Some(node) = solver.frontier().find(|node| !solver.has_seen(&node.board)) {
            return Err(CheckpointError::Inconsistent(format!(
                "frontier board {} is missing from the seen set",
                node.id
            )));
        }

        let mut ids = FxHashSet::default();
        let mut keys = FxHashSet::default();
        for node in solver.frontier() {
            if !ids.insert(node.id) {
                return Err(CheckpointError::Inconsistent(format!(
                    "board id {} appears more than once",
                    node.id
                )));
            }
            if !keys.insert(solver.key(&node.board)) {
                return Err(CheckpointError::Inconsistent(format!(
                    "frontier board {} is queued twice",
                    node.id
                )));
            }
        }
        if let Some(node) = solver.winning().iter().find(|node| !ids.insert(node.id)) {
            return Err(CheckpointError::Inconsistent(format!(
                "board id {} appears more than once",
                node.id
            )));
        }
        Ok(solver)
    }
}

/// Writes a checkpoint, replacing `path` only once the new file is complete.
pub fn save(path: &Path, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
    let tmp_path = temporary_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer(&mut writer, checkpoint)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    info!(
        path = %path.display(),
        explored = checkpoint.counters.explored,
        frontier = checkpoint.frontier.len(),
        seen = checkpoint.seen.len(),
        "saved checkpoint"
    );
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reads a checkpoint and checks its version.
///
/// The records themselves are validated by [`Checkpoint::into_solver`].
pub fn load(path: &Path) -> Result<Checkpoint, CheckpointError> {
    let file = File::open(path).map_err(|source| CheckpointError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let checkpoint: Checkpoint =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CheckpointError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if checkpoint.version != CHECKPOINT_VERSION {
        return Err(CheckpointError::Version {
            found: checkpoint.version,
            expected: CHECKPOINT_VERSION,
        });
    }
    debug!(path = %path.display(), frontier = checkpoint.frontier.len(), "loaded checkpoint");
    Ok(checkpoint)
}

/// Formats a search report in human-readable text.
pub fn format_report(report: &SearchReport) -> String {
    let counters = &report.counters;
    let mut output = format!(
        "Explored {} boards: {} winning, {} stuck, {} duplicates skipped{}\n",
        counters.explored,
        counters.winning,
        counters.stuck,
        counters.duplicates,
        if report.completed { "" } else { " (stopped early)" }
    );

    for (i, node) in report.winning.iter().enumerate() {
        output.push_str(&format!(
            "\nWinning board {} (id {}, {} moves):\n",
            i + 1,
            node.id,
            node.path.len()
        ));
        output.push_str(&format!("{}\n", node.path));
        output.push_str(&format_board(&node.board));
    }

    output
}

/// Saves a search report in human-readable text format.
pub fn save_report(path: &Path, report: &SearchReport) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", format_report(report))?;
    Ok(())
}

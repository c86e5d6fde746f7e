//! Deduplicated breadth-first / depth-first traversal of the game graph.
//!
//! Key points:
//! - Boards are `Copy` values, so every frontier entry owns its own board
//! - The seen set stores only 64-bit fingerprints (FxHashSet)
//! - A board is marked seen when it is discovered, so it is queued at most once
//! - Move histories share prefixes (see [`Path`])

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Fingerprint};
use crate::config::{Dedup, ResourceLimits, SearchConfig, Strategy};
use crate::error::SearchError;
use crate::path::Path;

/// Identifier handed out by a solver to each board it discovers.
pub type BoardId = u64;

/// A discovered board together with the moves that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: BoardId,
    pub board: Board,
    pub path: Path,
}

/// Running totals for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounters {
    /// Boards popped from the frontier.
    pub explored: usize,
    pub winning: usize,
    /// Boards that are neither winning nor have a legal move.
    pub stuck: usize,
    /// Successors discarded because they were already seen.
    pub duplicates: usize,
    pub max_frontier: usize,
}

/// What a single [`Solver::step`] did with the board it popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Won(BoardId),
    Stuck(BoardId),
    Expanded {
        id: BoardId,
        /// Legal moves on the popped board.
        moves: usize,
        /// Successors that were new and got queued.
        pushed: usize,
    },
}

/// Summary of a traversal.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub counters: SearchCounters,
    /// Size of the seen set.
    pub seen: usize,
    pub winning: Vec<Node>,
    /// True when the frontier was drained; false when a stop condition ended
    /// the run early.
    pub completed: bool,
}

/// Pending boards, drained FIFO or LIFO depending on the strategy.
#[derive(Debug)]
struct Frontier {
    strategy: Strategy,
    nodes: VecDeque<Node>,
}

impl Frontier {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            nodes: VecDeque::new(),
        }
    }

    #[inline]
    fn push(&mut self, node: Node) {
        self.nodes.push_back(node);
    }

    #[inline]
    fn pop(&mut self) -> Option<Node> {
        match self.strategy {
            Strategy::BreadthFirst => self.nodes.pop_front(),
            Strategy::DepthFirst => self.nodes.pop_back(),
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Owns one traversal: frontier, seen set, winning boards and counters.
#[derive(Debug)]
pub struct Solver {
    config: SearchConfig,
    start: Board,
    frontier: Frontier,
    seen: FxHashSet<Fingerprint>,
    winning: Vec<Node>,
    counters: SearchCounters,
    next_id: BoardId,
}

impl Solver {
    /// A solver positioned at the standard starting board.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_start(config, Board::standard())
    }

    /// A solver exploring everything reachable from `start`.
    pub fn with_start(config: SearchConfig, start: Board) -> Self {
        let mut solver = Self {
            config,
            start,
            frontier: Frontier::new(config.strategy),
            seen: FxHashSet::default(),
            winning: Vec::new(),
            counters: SearchCounters::default(),
            next_id: 0,
        };

        let id = solver.allocate_id();
        solver.seen.insert(solver.key(&start));
        solver.frontier.push(Node {
            id,
            board: start,
            path: Path::new(),
        });
        solver.counters.max_frontier = 1;
        solver
    }

    /// Rebuilds a solver from previously saved state.
    pub(crate) fn restore(
        config: SearchConfig,
        start: Board,
        next_id: BoardId,
        counters: SearchCounters,
        seen: impl IntoIterator<Item = Fingerprint>,
        frontier: Vec<Node>,
        winning: Vec<Node>,
    ) -> Self {
        let mut restored = Frontier::new(config.strategy);
        for node in frontier {
            restored.push(node);
        }
        Self {
            config,
            start,
            frontier: restored,
            seen: seen.into_iter().collect(),
            winning,
            counters,
            next_id,
        }
    }

    fn allocate_id(&mut self) -> BoardId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Deduplication key under the configured policy.
    #[inline]
    pub(crate) fn key(&self, board: &Board) -> Fingerprint {
        match self.config.dedup {
            Dedup::Exact => board.fingerprint(),
            Dedup::Symmetric => board.canonical_fingerprint(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the limits and early-stop settings, e.g. after resuming.
    pub fn set_limits(&mut self, limits: ResourceLimits, max_winning: Option<usize>) {
        self.config.limits = limits;
        self.config.max_winning = max_winning;
    }

    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn counters(&self) -> SearchCounters {
        self.counters
    }

    pub fn next_id(&self) -> BoardId {
        self.next_id
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Pending boards in frontier storage order (oldest first).
    pub fn frontier(&self) -> impl Iterator<Item = &Node> + '_ {
        self.frontier.nodes.iter()
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Seen fingerprints, in no particular order.
    pub fn seen(&self) -> impl Iterator<Item = Fingerprint> + '_ {
        self.seen.iter().copied()
    }

    /// True if `board` (or, with symmetric dedup, any of its images) was seen.
    pub fn has_seen(&self, board: &Board) -> bool {
        self.seen.contains(&self.key(board))
    }

    pub fn winning(&self) -> &[Node] {
        &self.winning
    }

    /// True when the frontier is empty or enough winning boards were found.
    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty()
            || self
                .config
                .max_winning
                .is_some_and(|max| self.winning.len() >= max)
    }

    /// Pops one board and classifies or expands it.
    ///
    /// Returns `Ok(None)` once the frontier is empty. A limit error is reported
    /// after the step has completed, so the solver is always consistent and can
    /// be checkpointed or dropped.
    pub fn step(&mut self) -> Result<Option<StepOutcome>, SearchError> {
        let Some(node) = self.frontier.pop() else {
            return Ok(None);
        };
        self.counters.explored += 1;

        let interval = self.config.progress_interval;
        if interval > 0 && self.counters.explored % interval == 0 {
            info!(
                explored = self.counters.explored,
                frontier = self.frontier.len(),
                seen = self.seen.len(),
                winning = self.counters.winning,
                marbles = node.board.marble_count(),
                "search progress"
            );
        }

        if self.config.win_condition.is_met(&node.board) {
            debug!(id = node.id, moves = node.path.len(), "found winning board");
            let id = node.id;
            self.counters.winning += 1;
            self.winning.push(node);
            return Ok(Some(StepOutcome::Won(id)));
        }

        let mut moves = 0;
        let mut pushed = 0;
        for (mv, next) in node.board.successors() {
            moves += 1;
            let key = self.key(&next);
            if !self.seen.insert(key) {
                self.counters.duplicates += 1;
                continue;
            }
            let id = self.allocate_id();
            self.frontier.push(Node {
                id,
                board: next,
                path: node.path.record(mv.with_origin(node.id)),
            });
            pushed += 1;
        }

        if moves == 0 {
            self.counters.stuck += 1;
            return Ok(Some(StepOutcome::Stuck(node.id)));
        }

        self.counters.max_frontier = self.counters.max_frontier.max(self.frontier.len());
        self.check_limits()?;

        Ok(Some(StepOutcome::Expanded {
            id: node.id,
            moves,
            pushed,
        }))
    }

    fn check_limits(&self) -> Result<(), SearchError> {
        let limits = self.config.limits;
        let exceeded = [
            ("frontier", limits.max_frontier, self.frontier.len()),
            ("seen", limits.max_seen, self.seen.len()),
        ]
        .into_iter()
        .find_map(|(resource, limit, current)| {
            limit
                .filter(|&limit| current > limit)
                .map(|limit| (resource, limit))
        });

        match exceeded {
            Some((resource, limit)) => {
                warn!(
                    resource,
                    limit,
                    explored = self.counters.explored,
                    frontier = self.frontier.len(),
                    seen = self.seen.len(),
                    "resource limit exceeded"
                );
                Err(SearchError::LimitExceeded {
                    resource,
                    limit,
                    counters: self.counters,
                })
            }
            None => Ok(()),
        }
    }

    /// Runs at most `max_steps` steps. Returns true once the search is finished.
    pub fn run_for(&mut self, max_steps: usize) -> Result<bool, SearchError> {
        for _ in 0..max_steps {
            if self.is_finished() {
                break;
            }
            self.step()?;
        }
        Ok(self.is_finished())
    }

    /// Runs until the frontier is empty or a stop condition is met.
    pub fn run(&mut self) -> Result<SearchReport, SearchError> {
        info!(
            strategy = ?self.config.strategy,
            dedup = ?self.config.dedup,
            win_condition = ?self.config.win_condition,
            marbles = self.start.marble_count(),
            "starting search"
        );

        while !self.is_finished() {
            self.step()?;
        }

        let report = self.report();
        info!(
            explored = report.counters.explored,
            winning = report.counters.winning,
            stuck = report.counters.stuck,
            duplicates = report.counters.duplicates,
            completed = report.completed,
            "search finished"
        );
        Ok(report)
    }

    /// Snapshot of the results so far.
    pub fn report(&self) -> SearchReport {
        SearchReport {
            counters: self.counters,
            seen: self.seen.len(),
            winning: self.winning.clone(),
            completed: self.frontier.is_empty(),
        }
    }
}

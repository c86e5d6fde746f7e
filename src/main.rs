//! Peg Solitaire Solver
//!
//! Explores every board reachable from the standard English start position,
//! counting winning and stuck boards and recording the moves that lead to each
//! win. Long runs can be checkpointed to disk and resumed; the `play`
//! subcommand offers the same rules as an interactive console game.

mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marbles::persistence::{self, Checkpoint};
use marbles::{path, Board, Dedup, SearchConfig, SearchError, Solver, Strategy, WinCondition};

/// Solves English peg solitaire by exhaustive search.
#[derive(Parser)]
#[command(name = "marbles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the game tree and report winning and stuck boards.
    Solve(SolveArgs),
    /// Play the game interactively in the terminal.
    Play {
        /// Which single-marble boards count as a win.
        #[arg(long, value_enum, default_value_t = WinCondition::AnyCell)]
        win: WinCondition,
    },
    /// Summarise a saved checkpoint.
    Inspect {
        /// Checkpoint file written by `solve --checkpoint`.
        path: PathBuf,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// TOML file with search settings; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frontier order.
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Which single-marble boards count as a win.
    #[arg(long, value_enum)]
    win: Option<WinCondition>,

    /// Treat rotations and reflections of a seen board as duplicates.
    #[arg(long)]
    symmetric: bool,

    /// Stop after this many winning boards.
    #[arg(long)]
    max_wins: Option<usize>,

    /// Abort once the frontier holds more boards than this.
    #[arg(long)]
    max_frontier: Option<usize>,

    /// Abort once more fingerprints than this have been seen.
    #[arg(long)]
    max_seen: Option<usize>,

    /// Save search state to this file periodically and when stopping.
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Explored boards between checkpoints.
    #[arg(long, default_value_t = 1_000_000)]
    checkpoint_every: usize,

    /// Continue the search saved in this checkpoint.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Also write the report to this file (solutions.txt if no path is given).
    #[arg(long, num_args = 0..=1, default_missing_value = persistence::SOLUTIONS_TXT)]
    output: Option<PathBuf>,

    /// Print every board along each winning path.
    #[arg(long)]
    show_paths: bool,
}

impl SolveArgs {
    /// Applies command-line overrides on top of `config`.
    fn apply(&self, mut config: SearchConfig) -> Result<SearchConfig> {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(win) = self.win {
            config.win_condition = win;
        }
        if self.symmetric {
            config.dedup = Dedup::Symmetric;
        }
        if self.max_wins.is_some() {
            config.max_winning = self.max_wins;
        }
        if self.max_frontier.is_some() {
            config.limits.max_frontier = self.max_frontier;
        }
        if self.max_seen.is_some() {
            config.limits.max_seen = self.max_seen;
        }
        config.validate()?;
        Ok(config)
    }

    fn config(&self) -> Result<SearchConfig> {
        let base = match &self.config {
            Some(path) => SearchConfig::from_file(path)?,
            None => SearchConfig::default(),
        };
        self.apply(base)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Solve(args)) => run_solve(&args),
        Some(Command::Play { win }) => run_play(win),
        Some(Command::Inspect { path }) => run_inspect(&path),
        None => run_first_solution(),
    }
}

/// Builds a fresh solver or resumes the one saved in `--resume`.
fn prepare_solver(args: &SolveArgs) -> Result<Solver> {
    let Some(resume) = &args.resume else {
        return Ok(Solver::new(args.config()?));
    };

    let checkpoint = persistence::load(resume)?;
    let mut solver = checkpoint
        .into_solver()
        .with_context(|| format!("cannot resume from {}", resume.display()))?;

    let saved = *solver.config();
    let wanted = args.apply(saved)?;
    if wanted.strategy != saved.strategy
        || wanted.win_condition != saved.win_condition
        || wanted.dedup != saved.dedup
    {
        bail!("--strategy, --win and --symmetric cannot change a resumed search");
    }
    if args.config.is_some() {
        warn!("ignoring --config while resuming; the checkpoint's settings are used");
    }
    solver.set_limits(wanted.limits, wanted.max_winning);

    info!(
        path = %resume.display(),
        explored = solver.counters().explored,
        frontier = solver.frontier_len(),
        "resuming search"
    );
    Ok(solver)
}

fn save_checkpoint(args: &SolveArgs, solver: &Solver) -> Result<()> {
    if let Some(path) = &args.checkpoint {
        persistence::save(path, &Checkpoint::capture(solver))?;
    }
    Ok(())
}

/// Runs the search, checkpointing as it goes, and prints the report.
fn run_solve(args: &SolveArgs) -> Result<()> {
    ensure!(args.checkpoint_every > 0, "--checkpoint-every must be > 0");

    let mut solver = prepare_solver(args)?;
    let config = *solver.config();
    info!(
        strategy = ?config.strategy,
        dedup = ?config.dedup,
        win_condition = ?config.win_condition,
        "starting search"
    );

    loop {
        match solver.run_for(args.checkpoint_every) {
            Ok(true) => break,
            Ok(false) => save_checkpoint(args, &solver)?,
            Err(err @ SearchError::LimitExceeded { .. }) => {
                save_checkpoint(args, &solver)?;
                print!("{}", persistence::format_report(&solver.report()));
                return Err(err.into());
            }
        }
    }
    save_checkpoint(args, &solver)?;

    let report = solver.report();
    info!(
        explored = report.counters.explored,
        winning = report.counters.winning,
        seen = report.seen,
        "search finished"
    );
    print!("{}", persistence::format_report(&report));

    if args.show_paths {
        for node in &report.winning {
            println!("\nReplay of board {}:", node.id);
            print!("{}", path::format_replay(solver.start(), &node.path.moves())?);
        }
    }

    if let Some(output) = &args.output {
        persistence::save_report(output, &report)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}

/// Default mode: depth-first until the first win, then show how to get there.
fn run_first_solution() -> Result<()> {
    let mut solver = Solver::new(SearchConfig {
        strategy: Strategy::DepthFirst,
        max_winning: Some(1),
        ..SearchConfig::default()
    });
    let report = solver.run()?;

    match report.winning.first() {
        Some(node) => {
            println!(
                "Found a solution in {} moves after exploring {} boards:",
                node.path.len(),
                report.counters.explored
            );
            print!("{}", path::format_replay(solver.start(), &node.path.moves())?);
        }
        None => println!(
            "No solution found after exploring {} boards",
            report.counters.explored
        ),
    }
    Ok(())
}

fn run_play(win: WinCondition) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let board = shell::play(Board::standard(), win, stdin.lock(), &mut stdout)?;
    info!(marbles = board.marble_count(), "game over");
    Ok(())
}

fn run_inspect(path: &std::path::Path) -> Result<()> {
    let checkpoint = persistence::load(path)?;
    let config = checkpoint.config;
    let solver = checkpoint.into_solver()?;
    let counters = solver.counters();

    println!("Checkpoint {}", path.display());
    println!(
        "  strategy: {:?}, dedup: {:?}, win: {:?}",
        config.strategy, config.dedup, config.win_condition
    );
    println!("  explored: {}", counters.explored);
    println!("  winning: {}", counters.winning);
    println!("  stuck: {}", counters.stuck);
    println!("  duplicates: {}", counters.duplicates);
    println!("  frontier: {}", solver.frontier_len());
    println!("  seen: {}", solver.seen_len());
    println!("  finished: {}", solver.is_finished());
    Ok(())
}

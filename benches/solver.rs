//! Benchmarks for the peg solitaire solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use marbles::grid::format_board;
use marbles::{Board, Move, SearchConfig, Solver, Strategy};

/// A board a few moves into the game, with a mix of marbles and holes.
fn midgame() -> Board {
    let mut solver = Solver::new(SearchConfig {
        strategy: Strategy::DepthFirst,
        ..SearchConfig::default()
    });
    solver.run_for(10).unwrap();
    let board = solver.frontier().last().unwrap().board;
    board
}

/// Benchmark depth-first search from the standard start to the first win.
fn bench_first_win(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.bench_function("dfs_first_win", |b| {
        b.iter(|| {
            let mut solver = Solver::new(SearchConfig {
                strategy: Strategy::DepthFirst,
                max_winning: Some(1),
                ..SearchConfig::default()
            });
            black_box(solver.run().unwrap())
        })
    });
    group.finish();
}

/// Benchmark enumerating the legal moves of a midgame board.
fn bench_legal_moves(c: &mut Criterion) {
    let board = midgame();

    c.bench_function("legal_moves", |b| {
        b.iter(|| black_box(&board).legal_moves().collect::<Vec<Move>>())
    });
}

/// Benchmark applying a single move.
fn bench_apply_move(c: &mut Criterion) {
    let board = Board::standard();
    let mv = board.legal_moves().next().unwrap();

    c.bench_function("apply_move", |b| {
        b.iter(|| black_box(&board).apply_move(black_box(&mv)))
    });
}

/// Benchmark the exact and symmetry-reduced fingerprints.
fn bench_fingerprints(c: &mut Criterion) {
    let board = midgame();

    c.bench_function("fingerprint", |b| {
        b.iter(|| black_box(&board).fingerprint())
    });
    c.bench_function("canonical_fingerprint", |b| {
        b.iter(|| black_box(&board).canonical_fingerprint())
    });
}

/// Benchmark rendering a board as text.
fn bench_format_board(c: &mut Criterion) {
    let board = midgame();

    c.bench_function("format_board", |b| {
        b.iter(|| format_board(black_box(&board)))
    });
}

criterion_group!(
    benches,
    bench_first_win,
    bench_legal_moves,
    bench_apply_move,
    bench_fingerprints,
    bench_format_board
);
criterion_main!(benches);

//! End-to-end searches over small boards and the standard opening.

use std::collections::HashSet;

use marbles::path::replay;
use marbles::{
    Board, Coordinate, Dedup, SearchConfig, SearchReport, SlotStatus, Solver, Strategy,
    WinCondition,
};

/// Nine marbles in a plus shape centred on D4.
fn plus() -> Board {
    Board::from_marbles(&[
        Coordinate::new(3, 1),
        Coordinate::new(3, 2),
        Coordinate::new(1, 3),
        Coordinate::new(2, 3),
        Coordinate::new(3, 3),
        Coordinate::new(4, 3),
        Coordinate::new(5, 3),
        Coordinate::new(3, 4),
        Coordinate::new(3, 5),
    ])
    .unwrap()
}

fn search(start: Board, config: SearchConfig) -> SearchReport {
    Solver::with_start(config, start).run().unwrap()
}

fn final_cells(report: &SearchReport) -> Vec<Coordinate> {
    let mut cells: Vec<Coordinate> = report
        .winning
        .iter()
        .flat_map(|node| node.board.marbles())
        .collect();
    cells.sort();
    cells
}

#[test]
fn test_plus_board_full_traversal() {
    for strategy in [Strategy::BreadthFirst, Strategy::DepthFirst] {
        let report = search(
            plus(),
            SearchConfig {
                strategy,
                ..SearchConfig::default()
            },
        );

        assert!(report.completed);
        assert_eq!(report.counters.explored, 153);
        assert_eq!(report.counters.winning, 5);
        assert_eq!(report.counters.stuck, 37);
        assert_eq!(report.counters.duplicates, 124);
        assert_eq!(report.seen, 153);
        assert_eq!(
            final_cells(&report),
            vec![
                Coordinate::new(0, 3),
                Coordinate::new(3, 0),
                Coordinate::new(3, 3),
                Coordinate::new(3, 6),
                Coordinate::new(6, 3),
            ]
        );
    }
}

#[test]
fn test_plus_board_center_rule_and_symmetry() {
    let center = search(
        plus(),
        SearchConfig {
            win_condition: WinCondition::Center,
            ..SearchConfig::default()
        },
    );
    assert_eq!(center.counters.winning, 1);
    assert_eq!(center.counters.stuck, 41);
    assert_eq!(final_cells(&center), vec![Coordinate::CENTER]);

    let symmetric = search(
        plus(),
        SearchConfig {
            dedup: Dedup::Symmetric,
            ..SearchConfig::default()
        },
    );
    assert_eq!(symmetric.counters.explored, 31);
    assert_eq!(symmetric.counters.winning, 2);
    assert_eq!(symmetric.counters.stuck, 9);
    assert_eq!(symmetric.counters.duplicates, 21);
}

#[test]
fn test_every_winning_path_replays() {
    let start = plus();
    let report = search(start, SearchConfig::default());

    for node in &report.winning {
        let moves = node.path.moves();
        assert_eq!(moves.len(), 8);

        let boards = replay(&start, &moves).unwrap();
        assert_eq!(boards.len(), moves.len() + 1);
        assert_eq!(boards.last(), Some(&node.board));
        for (i, board) in boards.iter().enumerate() {
            assert_eq!(board.marble_count(), 9 - i);
        }
    }
}

#[test]
fn test_bfs_frontier_stays_layered() {
    let mut solver = Solver::with_start(SearchConfig::default(), plus());

    while solver.step().unwrap().is_some() {
        let counts: Vec<usize> = solver
            .frontier()
            .map(|node| node.board.marble_count())
            .collect();
        assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]));
        if let (Some(first), Some(last)) = (counts.first(), counts.last()) {
            assert!(first - last <= 1);
        }
    }
    assert!(solver.is_finished());
}

#[test]
fn test_reachable_boards_keep_the_cross_shape() {
    let mut seen = HashSet::new();
    let mut pending = vec![plus()];

    while let Some(board) = pending.pop() {
        if !seen.insert(board.fingerprint()) {
            continue;
        }
        for (mv, next) in board.successors() {
            assert_eq!(next.marble_count(), board.marble_count() - 1);
            assert_eq!(next.status(mv.from), Some(SlotStatus::Empty));
            assert_eq!(next.status(mv.over()), Some(SlotStatus::Empty));
            assert_eq!(next.status(mv.landing()), Some(SlotStatus::Marble));
            for x in [0, 1, 5, 6] {
                for y in [0, 1, 5, 6] {
                    let corner = Coordinate::new(x, y);
                    assert_eq!(next.status(corner), Some(SlotStatus::Blocked), "{corner}");
                }
            }
            pending.push(next);
        }
    }
    assert_eq!(seen.len(), 153);
}

#[test]
fn test_searches_are_deterministic() {
    let config = SearchConfig {
        strategy: Strategy::DepthFirst,
        ..SearchConfig::default()
    };
    let first = search(plus(), config);
    let second = search(plus(), config);

    assert_eq!(first.counters, second.counters);
    assert_eq!(first.winning, second.winning);
}

#[test]
fn test_depth_first_finds_a_standard_solution() {
    let mut solver = Solver::new(SearchConfig {
        strategy: Strategy::DepthFirst,
        max_winning: Some(1),
        ..SearchConfig::default()
    });
    let report = solver.run().unwrap();

    assert!(!report.completed);
    assert_eq!(report.counters.explored, 1066);
    assert_eq!(report.seen, 1168);

    let node = &report.winning[0];
    assert_eq!(node.board.marbles().collect::<Vec<_>>(), vec![Coordinate::new(0, 3)]);
    assert_eq!(node.path.len(), 31);

    let boards = node.path.replay().unwrap();
    assert_eq!(boards[0], Board::standard());
    assert_eq!(boards.last(), Some(&node.board));
}

#[test]
#[ignore = "explores every reachable board; takes minutes and several GB"]
fn test_full_breadth_first_traversal_of_standard_board() {
    let report = Solver::new(SearchConfig::default()).run().unwrap();

    assert!(report.completed);
    assert!(report.counters.winning > 0);
    assert_eq!(report.seen, report.counters.explored);
    for node in &report.winning {
        assert_eq!(node.path.len(), 31);
        assert_eq!(node.path.replay().unwrap().last(), Some(&node.board));
    }
}

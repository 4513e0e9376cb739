mod common;

use common::{FailingEvaluator, Tree, TreeEvaluator};
use shakmaty::Color;
use supervised_chess::algos::{alphabeta::AlphaBeta, minimax, orient};
use supervised_chess::core::{error::SearchError, evaluator::Evaluator, position::Position};
use supervised_chess::evaluators::material::MaterialEvaluator;
use supervised_chess::games::chess::ChessBoard;

const INF: f32 = f32::INFINITY;

#[test]
fn textbook_tree() {
    // max over min: A = 3, B <= 2, C = 2
    let mut tree = Tree::two_ply(&[
        vec![3.0, 12.0, 8.0],
        vec![2.0, 4.0, 6.0],
        vec![14.0, 5.0, 2.0],
    ]);
    let mut evaluator = TreeEvaluator::default();

    let mut search = AlphaBeta::new(&mut evaluator, Color::White);
    let (action, score) = search.select_move(&mut tree, 2).unwrap();

    assert_eq!(action, 0);
    assert_eq!(score, 3.0);
    // B is cut after its first leaf
    assert_eq!(search.evaluations(), 7);
    assert_eq!(tree.current(), 0);
}

#[test]
fn same_value_as_exhaustive_minimax() {
    for seed in 0..50 {
        for depth in 1..=4 {
            let mut tree = Tree::random(seed, 4, depth);

            let mut evaluator = TreeEvaluator::default();
            let expected =
                minimax::minimax(&mut tree, depth, &mut evaluator, Color::White).unwrap();
            let exhaustive_calls = evaluator.calls;

            let mut evaluator = TreeEvaluator::default();
            let mut search = AlphaBeta::new(&mut evaluator, Color::White);
            let value = search.minimax(&mut tree, depth, -INF, INF, true).unwrap();

            assert_eq!(value, expected, "seed {} depth {}", seed, depth);
            assert!(evaluator.calls <= exhaustive_calls);
            assert_eq!(tree.current(), 0);
        }
    }
}

#[test]
fn same_move_as_exhaustive_minimax() {
    for seed in 0..50 {
        for turn in [Color::White, Color::Black] {
            let mut tree = Tree::random(seed, 5, 3).with_root_turn(turn);

            let expected =
                minimax::select_move(&mut tree, 3, &mut TreeEvaluator::default()).unwrap();

            let mut evaluator = TreeEvaluator::default();
            let mut search = AlphaBeta::new(&mut evaluator, Color::White);
            let found = search.select_move(&mut tree, 3).unwrap();

            assert_eq!(found, expected, "seed {}", seed);
            assert_eq!(search.perspective(), turn);
        }
    }
}

#[test]
fn first_move_wins_ties() {
    let mut tree = Tree::two_ply(&[
        vec![0.1, 0.5],
        vec![0.5, 0.7],
        vec![0.9, 0.5],
        vec![0.5],
    ]);
    let mut evaluator = TreeEvaluator::default();
    let mut search = AlphaBeta::new(&mut evaluator, Color::White);

    assert_eq!(search.select_move(&mut tree, 2).unwrap(), (1, 0.5));
}

#[test]
fn depth_zero_is_static_evaluation() {
    let mut board =
        ChessBoard::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3")
            .unwrap();
    let expected = MaterialEvaluator.evaluate(&mut board).unwrap();

    for perspective in [Color::White, Color::Black] {
        let mut evaluator = MaterialEvaluator;
        let mut search = AlphaBeta::new(&mut evaluator, perspective);

        for maximizing in [true, false] {
            let value = search.minimax(&mut board, 0, -INF, INF, maximizing).unwrap();
            assert_eq!(value, orient(expected, perspective));
        }
    }
}

#[test]
fn finished_games_are_not_searched() {
    let checkmate = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    let stalemate = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";

    for fen in [checkmate, stalemate] {
        let mut board = ChessBoard::from_fen(fen).unwrap();
        let expected = MaterialEvaluator.evaluate(&mut board).unwrap();

        let mut evaluator = MaterialEvaluator;
        let mut search = AlphaBeta::new(&mut evaluator, Color::White);
        let value = search.minimax(&mut board, 4, -INF, INF, true).unwrap();

        assert_eq!(value, expected);
        assert_eq!(search.nodes(), 1);
        assert_eq!(search.evaluations(), 1);

        assert!(matches!(
            search.select_move(&mut board, 4),
            Err(SearchError::NoLegalMove)
        ));
    }
}

#[test]
fn chess_matches_exhaustive_minimax() {
    let fens = [
        "3qk3/8/8/8/8/8/3N4/4K3 w - - 0 1",
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        "8/8/4k3/3r4/8/2N5/4K3/8 b - - 0 1",
    ];

    for fen in fens {
        let mut board = ChessBoard::from_fen(fen).unwrap();

        for depth in 1..=3 {
            let expected = minimax::select_move(&mut board, depth, &mut MaterialEvaluator).unwrap();

            let mut evaluator = MaterialEvaluator;
            let mut search = AlphaBeta::new(&mut evaluator, board.turn());
            let found = search.select_move(&mut board, depth).unwrap();

            assert_eq!(found, expected, "{} at depth {}", fen, depth);
            assert_eq!(board.fen(), ChessBoard::from_fen(fen).unwrap().fen());
            assert!(board.moves().is_empty());
        }
    }
}

#[test]
fn depth_zero_search_looks_one_ply() {
    let mut tree = Tree::one_ply(&[0.3, 0.8]);
    let mut evaluator = TreeEvaluator::default();
    let mut search = AlphaBeta::new(&mut evaluator, Color::White);

    assert_eq!(search.select_move(&mut tree, 0).unwrap(), (1, 0.8));
}

#[test]
fn failing_evaluator_leaves_the_position() {
    let mut tree = Tree::two_ply(&[
        vec![0.1, 0.2, 0.3],
        vec![0.5, 0.6, 0.7],
        vec![0.8, 0.9, 1.0],
    ]);
    let mut evaluator = FailingEvaluator {
        inner: TreeEvaluator::default(),
        fail_on: 5,
        calls: 0,
    };
    let mut search = AlphaBeta::new(&mut evaluator, Color::White);

    assert!(matches!(
        search.select_move(&mut tree, 2),
        Err(SearchError::Evaluation(_))
    ));
    assert_eq!(tree.current(), 0);
}

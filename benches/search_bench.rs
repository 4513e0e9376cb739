use criterion::{black_box, criterion_group, criterion_main, Criterion};

use supervised_chess::algos::alphabeta::AlphaBeta;
use supervised_chess::algos::greedy::greedy;
use supervised_chess::core::position::Position;
use supervised_chess::evaluators::material::MaterialEvaluator;
use supervised_chess::games::chess::ChessBoard;
use supervised_chess::nn::encoding::encode;

const MIDDLEGAME_FEN: &str = "r1bq1rk1/2p1bppp/p1np1n2/1p2p3/4P3/1BP2N1P/PP1P1PP1/RNBQR1K1 b - - 0 9";

fn bench_encode(c: &mut Criterion) {
    let mut board = ChessBoard::from_fen(MIDDLEGAME_FEN).unwrap();
    c.bench_function("encode_middlegame", |b| {
        b.iter(|| encode(black_box(&mut board)).unwrap())
    });
}

fn bench_greedy(c: &mut Criterion) {
    let mut board = ChessBoard::from_fen(MIDDLEGAME_FEN).unwrap();
    c.bench_function("greedy_material", |b| {
        b.iter(|| greedy(black_box(&mut board), &mut MaterialEvaluator).unwrap())
    });
}

fn bench_alphabeta(c: &mut Criterion) {
    let mut board = ChessBoard::from_fen(MIDDLEGAME_FEN).unwrap();
    let mut evaluator = MaterialEvaluator;

    let mut group = c.benchmark_group("alphabeta_material");
    group.sample_size(10);
    for depth in [2, 3] {
        group.bench_function(format!("depth_{}", depth), |b| {
            b.iter(|| {
                let mut search = AlphaBeta::new(&mut evaluator, board.turn());
                search.select_move(black_box(&mut board), depth).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_greedy, bench_alphabeta);
criterion_main!(benches);

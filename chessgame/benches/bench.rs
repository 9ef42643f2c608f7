use chessgame::Game;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const MIDDLE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

fn perf_count(game: &Game, depth: usize) -> usize {
    if depth == 0 {
        return 1;
    }
    game.possible_moves()
        .into_iter()
        .map(|m| {
            let mut clone = game.clone();
            clone.play(m).unwrap();
            perf_count(&clone, depth - 1)
        })
        .sum()
}

fn perft(c: &mut Criterion) {
    c.bench_function("perft start depth 3", |b| {
        let game = Game::default();
        b.iter(|| perf_count(&game, black_box(3)))
    });
}

fn move_gen(c: &mut Criterion) {
    c.bench_function("move_gen middle game", |b| {
        let game = Game::from_fen(MIDDLE_FEN).unwrap();
        b.iter(|| black_box(&game).possible_moves())
    });
    c.bench_function("move_gen endgame", |b| {
        let game = Game::from_fen(ENDGAME_FEN).unwrap();
        b.iter(|| black_box(&game).possible_moves())
    });
}

fn results(c: &mut Criterion) {
    c.bench_function("result middle game", |b| {
        let game = Game::from_fen(MIDDLE_FEN).unwrap();
        b.iter(|| black_box(&game).result())
    });
    c.bench_function("making a move", |b| {
        let game = Game::from_fen(MIDDLE_FEN).unwrap();
        let mov = chessgame::parse_uci("e5f7").unwrap();
        b.iter_batched(|| game.clone(), |mut g| g.play(black_box(mov)).unwrap(), BatchSize::SmallInput)
    });
}

criterion_group!(benches, perft, move_gen, results);
criterion_main!(benches);

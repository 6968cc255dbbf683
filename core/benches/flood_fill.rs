use criterion::{Criterion, criterion_group, criterion_main};
use mineai_core::*;
use std::hint::black_box;

fn placement(c: &mut Criterion) {
    let config = Difficulty::Hard.config();
    c.bench_function("place_hard", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut board = Board::new(config);
            RejectionSampler::new(seed).place(&mut board).unwrap();
            black_box(board)
        })
    });
}

fn flood_fill(c: &mut Criterion) {
    // a single mine in the corner turns the whole board into one zero region
    let board = Board::with_mines(24, &[(23, 23)]).unwrap();
    c.bench_function("flood_fill_open_board", |b| {
        b.iter(|| {
            let mut board = board.clone();
            black_box(board.open_flood_fill(black_box((0, 0))).unwrap())
        })
    });

    let session = GameSession::new(Difficulty::Hard, RejectionSampler::new(5)).unwrap();
    let board = session.board().clone();
    let start = board
        .coords()
        .find(|&pos| !board[pos].has_mine && board.count_adjacent_mines(pos) == 0)
        .unwrap_or((0, 0));
    c.bench_function("open_hard_zero_cell", |b| {
        b.iter(|| {
            let mut game = session.clone();
            black_box(game.apply_open(Actor::Human, start))
        })
    });
}

criterion_group!(benches, placement, flood_fill);
criterion_main!(benches);

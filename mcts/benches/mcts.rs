//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full searches with varying sweep counts
//! - Sweeps from different game states (opening, midgame, near-terminal)
//! - Move commitment with pruning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use games_tictactoe::TicTacToe;
use mcts::{CommitPolicy, Mcts, MctsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use search_core::Player;

fn bench_search_sweeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_sweeps");

    for sweeps in [100u32, 400, 1600] {
        group.throughput(Throughput::Elements(sweeps as u64));
        group.bench_with_input(
            BenchmarkId::new("tictactoe_opening", sweeps),
            &sweeps,
            |b, &sweeps| {
                let config = MctsConfig::default().with_sweeps(sweeps);
                b.iter(|| {
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let mut engine = Mcts::new(TicTacToe::new(), config.clone());
                    engine.run(&mut rng).unwrap();
                    black_box(engine.tree().len())
                });
            },
        );
    }

    group.finish();
}

fn bench_search_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_positions");

    let positions = [
        ("opening", TicTacToe::new()),
        ("midgame", TicTacToe::new().place(4).place(0).place(8)),
        (
            "near_terminal",
            TicTacToe::from_cells([1, 1, 0, -1, -1, 0, 1, -1, 0], Player::One),
        ),
    ];

    for (name, state) in positions {
        group.bench_function(name, |b| {
            let config = MctsConfig::default().with_sweeps(400);
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                let mut engine = Mcts::new(state.clone(), config.clone());
                engine.run(&mut rng).unwrap();
                black_box(engine.tree().len())
            });
        });
    }

    group.finish();
}

fn bench_commit_with_pruning(c: &mut Criterion) {
    c.bench_function("commit_with_pruning", |b| {
        let config = MctsConfig::default()
            .with_sweeps(800)
            .with_commit_policy(CommitPolicy::HighestReward);

        b.iter(|| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            let mut engine = Mcts::new(TicTacToe::new(), config.clone());
            engine.run(&mut rng).unwrap();
            black_box(engine.play_best_move().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_search_sweeps,
    bench_search_positions,
    bench_commit_with_pruning
);
criterion_main!(benches);

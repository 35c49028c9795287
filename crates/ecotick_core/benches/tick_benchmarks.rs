use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecotick_core::catalog::Catalog;
use ecotick_core::config::EngineConfig;
use ecotick_core::engine::{tick, Engine, EngineState};
use ecotick_core::rng::SeededRng;

fn bench_single_tick(c: &mut Criterion) {
    let catalog = Catalog::default_catalog();
    let config = EngineConfig::default();

    c.bench_function("tick_default_catalog", |b| {
        b.iter_batched(
            || (EngineState::seeded(&catalog, &config), SeededRng::new(42)),
            |(mut state, mut rng)| black_box(tick(&mut state, &catalog, &config, &mut rng)),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_fast_forward(c: &mut Criterion) {
    c.bench_function("fast_forward_200", |b| {
        b.iter(|| {
            let mut engine = Engine::new(Catalog::default_catalog(), EngineConfig::default(), 7);
            black_box(engine.fast_forward(200).len())
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut engine = Engine::new(Catalog::default_catalog(), EngineConfig::default(), 7);
    engine.fast_forward(200);

    c.bench_function("snapshot_after_200_ticks", |b| {
        b.iter(|| black_box(engine.snapshot()))
    });
}

criterion_group!(benches, bench_single_tick, bench_fast_forward, bench_snapshot);
criterion_main!(benches);

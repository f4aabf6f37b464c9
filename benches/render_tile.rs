use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use newton_explorer::core::actions::cancellation::ShutdownToken;
use newton_explorer::core::data::pixel_rect::PixelRect;
use newton_explorer::{ComputeBackend, Engine, EngineConfig, RenderStrategy};

const SIZE: u32 = 256;

fn engine(strategy: RenderStrategy) -> Engine {
    match Engine::new(EngineConfig {
        size: SIZE,
        strategy,
        ..EngineConfig::default()
    }) {
        Ok(engine) => engine,
        Err(err) => panic!("engine setup failed: {err}"),
    }
}

fn bench_full_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_tile_full");
    let rect = PixelRect::square(SIZE).expect("valid rect");
    let cancel = ShutdownToken::new();

    for strategy in [RenderStrategy::Exhaustive, RenderStrategy::BoundaryTrace] {
        let engine = engine(strategy);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{strategy:?}")), &rect, |b, rect| {
            b.iter(|| black_box(engine.render_tile(*rect, &cancel).expect("render")))
        });
    }

    group.finish();
}

fn bench_pan_strip(c: &mut Criterion) {
    let engine = engine(RenderStrategy::Exhaustive);
    let strip = PixelRect::new(0, 0, 16, SIZE).expect("valid rect");
    let cancel = ShutdownToken::new();

    c.bench_function("render_tile_pan_strip", |b| {
        b.iter(|| black_box(engine.render_tile(strip, &cancel).expect("render")))
    });
}

fn bench_deep_zoom(c: &mut Criterion) {
    let mut engine = engine(RenderStrategy::Exhaustive);
    engine.zoom_view(800, 0.75, 0.5).expect("zoom");
    let rect = PixelRect::square(SIZE).expect("valid rect");
    let cancel = ShutdownToken::new();

    c.bench_function("render_tile_deep_zoom", |b| {
        b.iter(|| black_box(engine.render_tile(rect, &cancel).expect("render")))
    });
}

criterion_group!(benches, bench_full_raster, bench_pan_strip, bench_deep_zoom);
criterion_main!(benches);

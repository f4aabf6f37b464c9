use newton_explorer::core::actions::cancellation::ShutdownToken;
use newton_explorer::core::data::pixel_rect::PixelRect;
use newton_explorer::{ComputeBackend, Engine, EngineConfig, RenderStrategy};

fn config(size: u32, max_iterations: u16) -> EngineConfig {
    EngineConfig {
        size,
        max_iterations,
        ..EngineConfig::default()
    }
}

fn render_full(engine: &Engine) -> Vec<u16> {
    engine
        .render_tile(PixelRect::square(engine.size()).unwrap(), &ShutdownToken::new())
        .unwrap()
        .into_samples()
}

#[test]
fn separate_engines_render_identically() {
    let first = Engine::new(config(48, 64)).unwrap();
    let second = Engine::new(config(48, 64)).unwrap();

    assert_eq!(render_full(&first), render_full(&second));
}

#[test]
fn equivalent_formulas_render_identically() {
    let expanded = Engine::new(config(40, 64)).unwrap();
    let factored = Engine::new(EngineConfig {
        formula: "(z - 1) * (z^2 + z + 1)".to_string(),
        ..config(40, 64)
    })
    .unwrap();

    assert_eq!(render_full(&expanded), render_full(&factored));
}

#[test]
fn pan_there_and_back_restores_the_frame() {
    let mut engine = Engine::new(config(40, 64)).unwrap();
    let before = render_full(&engine);
    let center = engine.center_str();

    engine.move_view(0.1, 0.0).unwrap();
    engine.move_view(-0.1, 0.0).unwrap();

    assert_eq!(engine.center_str(), center);
    assert_eq!(render_full(&engine), before);
}

#[test]
fn deep_zoom_around_a_root_still_converges() {
    let mut engine = Engine::new(config(32, 64)).unwrap();

    // Pivot (0.75, 0.5) sits on the root z = 1 at the initial scale of 2.
    engine.zoom_view(800, 0.75, 0.5).unwrap();

    assert!(engine.view().prec() > 128);
    let samples = render_full(&engine);
    assert!(samples.iter().all(|&s| s < 64));
}

#[test]
fn boundary_trace_matches_exhaustive_along_the_border() {
    let exhaustive = Engine::new(config(64, 64)).unwrap();
    let traced = Engine::new(EngineConfig {
        strategy: RenderStrategy::BoundaryTrace,
        ..config(64, 64)
    })
    .unwrap();

    let (full, fast) = (render_full(&exhaustive), render_full(&traced));
    let n = 64;
    for i in 0..n {
        for idx in [i, (n - 1) * n + i, i * n, i * n + n - 1] {
            assert_eq!(full[idx], fast[idx], "border sample {idx}");
        }
    }
}

#[test]
fn settings_errors_leave_the_engine_usable() {
    let mut engine = Engine::new(config(24, 32)).unwrap();
    let before = render_full(&engine);

    assert!(engine.set_formula("z^7 + 1").is_err());
    assert!(engine.set_max_iter(0).is_err());
    assert!(engine.set_size(0).is_err());

    assert_eq!(engine.formula(), "z^3 - 1");
    assert_eq!(engine.max_iter(), 32);
    assert_eq!(engine.size(), 24);
    assert_eq!(render_full(&engine), before);
}

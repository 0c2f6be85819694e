use criterion::{black_box, criterion_group, criterion_main, Criterion};
use energy_map::catalog::{Technology, MAP_CENTER};
use energy_map::config::Settings;
use energy_map::geo::hexagon_vertices;
use energy_map::map::{MapRenderer, Viewport};
use energy_map::scene::{build_scene, Selection};

fn bench_hexagon(c: &mut Criterion) {
    c.bench_function("hexagon_vertices", |b| {
        b.iter(|| hexagon_vertices(black_box(MAP_CENTER), black_box(21.55)))
    });
}

fn bench_scene(c: &mut Criterion) {
    let settings = Settings::default();
    let selection = Selection::all();
    c.bench_function("build_scene_all", |b| {
        b.iter(|| build_scene(black_box(&selection), &settings))
    });
}

fn bench_render(c: &mut Criterion) {
    let settings = Settings::default();
    let scene = build_scene(&Selection::all(), &settings).expect("catalog areas are positive");
    let renderer = MapRenderer::new();
    let viewport = Viewport::new(settings.map.center, settings.map.zoom, 400, 240);

    c.bench_function("render_map_all", |b| {
        b.iter(|| renderer.render(200, 60, black_box(&viewport), &scene, 0.6))
    });

    let single: Selection = [Technology::Wind].into_iter().collect();
    let scene = build_scene(&single, &settings).expect("catalog areas are positive");
    c.bench_function("render_map_wind", |b| {
        b.iter(|| renderer.render(200, 60, black_box(&viewport), &scene, 0.6))
    });
}

criterion_group!(benches, bench_hexagon, bench_scene, bench_render);
criterion_main!(benches);

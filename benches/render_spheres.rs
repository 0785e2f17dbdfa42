use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use miniray::{
    Camera, Color, RenderJob, RenderSettings, Scene, TracerSettings,
    geometry::{ScreenSize, WorldPoint, WorldVector},
    render,
    scene::{Bvh, Geometries, Geometry, Intersectable, Material, PointLight, primitives::Sphere},
};

fn sphere_grid(n: usize) -> Geometries {
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| {
            let x = (i as f64 - n as f64 / 2.0) * 0.5;
            let y = (j as f64 - n as f64 / 2.0) * 0.5;
            Geometry::builder()
                .shape(Sphere::new(WorldPoint::new(x, y, -10.0), 0.2).unwrap())
                .material(Material {
                    kd: Color::new(0.5, 0.5, 0.5),
                    kr: Color::new(0.2, 0.2, 0.2),
                    ..Material::default()
                })
                .build()
        })
        .collect()
}

fn bench_render<O: Intersectable + Clone + Send + Sync + 'static>(
    c: &mut Criterion,
    name: &str,
    object: O,
) {
    let camera = Camera::builder()
        .center(WorldPoint::new(0.0, 0.0, 5.0))
        .forward(WorldVector::new(0.0, 0.0, -1.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .resolution(ScreenSize::new(320, 240))
        .build()
        .unwrap();
    let settings = RenderSettings {
        tile_size: 32.try_into().unwrap(),
        sample_count: 1.try_into().unwrap(),
        tracer: TracerSettings::default(),
    };
    let light = PointLight::builder()
        .intensity(Color::new(1.0, 1.0, 1.0))
        .position(WorldPoint::new(0.0, 10.0, 0.0))
        .build();
    let scene = Scene::builder()
        .object(object)
        .lights(vec![light.into()])
        .build();

    c.bench_function(&format!("render_spheres/{name}"), |b| {
        b.iter_batched(
            || {
                RenderJob::builder()
                    .scene(scene.clone())
                    .camera(camera)
                    .settings(settings)
                    .build()
                    .unwrap()
            },
            |job| {
                let mut render_progress = render(job, |_| {}, |_, _| {}).unwrap();
                render_progress.wait().unwrap();
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    bench_render(c, "flat", sphere_grid(20));
    bench_render(c, "bvh", Bvh::new(sphere_grid(20)));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10).measurement_time(Duration::from_secs(20));
    targets = criterion_benchmark
}
criterion_main!(benches);

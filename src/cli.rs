use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use miniray::{
    BLACK, Camera, Color, RenderJob, RenderSettings, Scene, TracerSettings, WHITE,
    geometry::{Ray, ScreenSize, WorldPoint, WorldVector},
    render,
    scene::{
        AmbientLight, Bvh, DirectionalLight, Geometries, Geometry, Material, PointLight, SpotLight,
        primitives::{Cylinder, Plane, Polygon, Sphere},
    },
};

const OUTPUT_PATH: &str = "render.png";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MINIRAY_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let mesh_path = std::env::args_os().nth(1).map(PathBuf::from);

    let camera = Camera::builder()
        .center(WorldPoint::new(0.0, 2.0, 12.0))
        .forward(WorldVector::new(0.0, -0.1, -1.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .resolution(ScreenSize::new(1024, 768))
        .film_width(36e-3)
        .focal_length(35e-3)
        .f_number(8.0)
        .focus_distance(12.0)
        .build()?;

    let mut geometries = demo_geometries()?;
    if let Some(path) = mesh_path {
        let mesh = Geometries::with_obj(
            &path,
            BLACK,
            Material {
                kd: Color::new(0.6, 0.6, 0.5),
                ks: Color::new(0.3, 0.3, 0.3),
                shininess: 30,
                ..Material::default()
            },
        )
        .with_context(|| format!("Loading {}", path.display()))?;
        geometries.extend(mesh);
    }

    let object = Bvh::new(geometries);
    if tracing::enabled!(tracing::Level::TRACE) {
        object.print_tree();
    }

    let scene = Scene::builder()
        .background(Color::new(0.05, 0.05, 0.1))
        .ambient_light(AmbientLight::new(WHITE, Color::new(0.1, 0.1, 0.1)))
        .object(object)
        .lights(demo_lights()?)
        .build();

    let job = RenderJob::builder()
        .scene(scene)
        .camera(camera)
        .settings(RenderSettings {
            tile_size: 32.try_into()?,
            sample_count: 16.try_into()?,
            tracer: TracerSettings::default(),
        })
        .build()?;

    let bar = ProgressBar::no_length();
    let mut render_progress = render(job, |_| {}, {
        let bar = bar.clone();
        move |_, progress| {
            bar.update(|ps| {
                ps.set_len(progress.total as u64);
                ps.set_pos(progress.finished as u64)
            })
        }
    })?;
    bar.set_length(render_progress.progress().total as u64);

    render_progress.wait()?;
    bar.finish();

    render_progress
        .image()
        .lock()
        .map_err(|_| anyhow!("Render image lock poisoned"))?
        .save(OUTPUT_PATH)
        .with_context(|| format!("Saving {OUTPUT_PATH}"))?;
    tracing::info!(path = OUTPUT_PATH, "Image saved");

    Ok(())
}

fn demo_geometries() -> anyhow::Result<Geometries> {
    let mut geometries = Geometries::new();

    geometries.add(
        Geometry::builder()
            .shape(Plane::new(WorldPoint::new(0.0, -1.0, 0.0), WorldVector::new(0.0, 1.0, 0.0))?)
            .material(Material {
                kd: Color::new(0.4, 0.4, 0.4),
                kr: Color::new(0.3, 0.3, 0.3),
                ..Material::default()
            })
            .build(),
    );

    for i in 0..5 {
        let x = -4.0 + 2.0 * i as f64;
        let hue = i as f64 / 4.0;
        geometries.add(
            Geometry::builder()
                .shape(Sphere::new(WorldPoint::new(x, -0.4, -2.0), 0.6)?)
                .material(Material {
                    kd: Color::new(0.8 * (1.0 - hue), 0.3, 0.8 * hue),
                    ks: Color::new(0.5, 0.5, 0.5),
                    shininess: 50,
                    ..Material::default()
                })
                .build(),
        );
    }

    geometries.add(
        Geometry::builder()
            .shape(Sphere::new(WorldPoint::new(0.0, 0.5, 2.0), 1.5)?)
            .material(Material {
                kd: Color::new(0.05, 0.05, 0.05),
                ks: Color::new(0.8, 0.8, 0.8),
                shininess: 200,
                kt: Color::new(0.7, 0.7, 0.7),
                ..Material::default()
            })
            .build(),
    );

    geometries.add(
        Geometry::builder()
            .shape(Cylinder::new(
                Ray::try_new(WorldPoint::new(-5.0, -1.0, -6.0), WorldVector::new(0.0, 1.0, 0.0))?,
                0.5,
                4.0,
            )?)
            .material(Material {
                kd: Color::new(0.7, 0.6, 0.2),
                ks: Color::new(0.2, 0.2, 0.2),
                shininess: 20,
                ..Material::default()
            })
            .build(),
    );

    geometries.add(
        Geometry::builder()
            .shape(Polygon::new(vec![
                WorldPoint::new(2.0, -1.0, -7.0),
                WorldPoint::new(6.0, -1.0, -7.0),
                WorldPoint::new(6.0, 3.0, -7.0),
                WorldPoint::new(2.0, 3.0, -7.0),
            ])?)
            .material(Material {
                kr: Color::new(0.9, 0.9, 0.9),
                ..Material::default()
            })
            .build(),
    );

    Ok(geometries)
}

fn demo_lights() -> anyhow::Result<Vec<miniray::scene::Light>> {
    let lamp = PointLight::builder()
        .intensity(Color::new(0.8, 0.7, 0.6))
        .position(WorldPoint::new(3.0, 6.0, 4.0))
        .kl(0.02)
        .kq(0.005)
        .build();
    let spot = SpotLight::builder()
        .point(
            PointLight::builder()
                .intensity(Color::new(1.0, 1.0, 1.0))
                .position(WorldPoint::new(-3.0, 5.0, 3.0))
                .kq(0.01)
                .build(),
        )
        .direction(WorldVector::new(0.5, -1.0, -0.8))
        .beam_exponent(4.0)
        .build()?;
    let sun = DirectionalLight::new(Color::new(0.2, 0.2, 0.25), WorldVector::new(-1.0, -1.0, -0.5))?;

    Ok(vec![lamp.into(), spot.into(), sun.into()])
}

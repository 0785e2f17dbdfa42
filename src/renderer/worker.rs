use image::RgbaImage;
use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    geometry::{ScreenBlock, ScreenPoint},
    renderer::RenderJob,
    scene::Intersectable,
    tracer::RayTracer,
    util::{BLACK, Color},
};

pub struct Worker {
    rng: SmallRng,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn render_tile<O: Intersectable>(
        &mut self,
        job: &RenderJob<O>,
        tile: &ScreenBlock,
        buffer: &mut RgbaImage,
    ) {
        let tracer = RayTracer::new(&job.scene, job.settings.tracer);

        for point in tile.internal_points() {
            let pixel = self.render_pixel(job, &tracer, &point);

            let buffer_position = point - tile.min();
            buffer.put_pixel(buffer_position.x, buffer_position.y, color_to_image(pixel));
        }
    }

    fn render_pixel<O: Intersectable>(
        &mut self,
        job: &RenderJob<O>,
        tracer: &RayTracer<O>,
        point: &ScreenPoint,
    ) -> Color {
        let sample_count = job.settings.sample_count.get();
        if sample_count == 1 {
            return tracer.trace_ray(&job.camera.ray_through(point));
        }

        let mut pixel_sum = BLACK;
        for _ in 0..sample_count {
            pixel_sum += tracer.trace_ray(&job.camera.sample_ray(point, &mut self.rng));
        }
        pixel_sum * (1.0 / sample_count as f64)
    }
}

/// Maps a linear color to an opaque 8 bit pixel, channels above 1 are clipped.
pub fn color_to_image(color: Color) -> image::Rgba<u8> {
    let channel = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    image::Rgba([channel(color.r), channel(color.g), channel(color.b), 255])
}

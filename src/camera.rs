use bon::bon;
use rand_distr::Distribution as _;

use crate::geometry::{
    FloatType, GeometryError, Ray, ScreenPoint, ScreenSize, WorldDirection, WorldPoint, WorldVector,
    checked_cross, to_direction,
};

/// Thin lens camera. With infinite f-number it is a pinhole camera.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    center: WorldPoint,

    resolution: ScreenSize,

    up: WorldDirection,
    right: WorldDirection,
    film_origin_offset: WorldVector,

    /// Distance between pixels in meters
    pixel_pitch: FloatType,

    /// Lens radius in meters
    lens_radius: FloatType,
    lens_weight: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        center: WorldPoint,
        forward: WorldVector,
        up: WorldVector,
        resolution: ScreenSize,
        #[builder(default = 36e-3)] film_width: FloatType,
        #[builder(default = 50e-3)] focal_length: FloatType,
        #[builder(default = FloatType::INFINITY)] f_number: FloatType,
        #[builder(default = 1.0)] focus_distance: FloatType,
    ) -> Result<Self, GeometryError> {
        let forward = to_direction(forward)?;
        let up = to_direction(up)?;
        let right = checked_cross(&forward, &up)
            .map_err(|_| GeometryError::invalid_geometry("camera up and forward are parallel"))?;
        let up = WorldDirection::new_normalize(right.cross(forward.as_ref()));

        if resolution.x == 0 || resolution.y == 0 {
            return Err(GeometryError::invalid_geometry(format!(
                "camera resolution must not be empty, got {}x{}",
                resolution.x, resolution.y
            )));
        }
        for (name, value) in [
            ("film width", film_width),
            ("focal length", focal_length),
            ("f-number", f_number),
            ("focus distance", focus_distance),
        ] {
            if !(value > 0.0) {
                return Err(GeometryError::invalid_geometry(format!(
                    "camera {name} must be positive, got {value}"
                )));
            }
        }

        let pixel_pitch = film_width / resolution.x as FloatType;
        let resolution_minus_one = ScreenSize::new(resolution.x - 1, resolution.y - 1);
        let film_origin_uv = resolution_minus_one.cast::<FloatType>() * pixel_pitch / 2.0;
        let film_origin_offset = -forward.as_ref() * focal_length
            + right.as_ref() * film_origin_uv.x
            - up.as_ref() * film_origin_uv.y;

        Ok(Camera {
            center,

            resolution,

            up,
            right,
            film_origin_offset,
            pixel_pitch,
            lens_radius: focal_length / (2.0 * f_number),
            lens_weight: focal_length / focus_distance,
        })
    }
}

impl Camera {
    pub fn resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Ray through the pixel center, from the lens center.
    pub fn ray_through(&self, point: &ScreenPoint) -> Ray {
        self.ray(point.x as FloatType, point.y as FloatType, WorldVector::zeros())
    }

    /// Samples a new ray for the pixel, jittered within the pixel and over the lens.
    pub fn sample_ray(&self, point: &ScreenPoint, rng: &mut impl rand::Rng) -> Ray {
        let film_u = point.x as FloatType + rng.random_range(-0.5..=0.5);
        let film_v = point.y as FloatType + rng.random_range(-0.5..=0.5);

        let lens_uv: [FloatType; 2] = rand_distr::UnitDisc.sample(rng);
        let lens_vector = self.right.as_ref() * (self.lens_radius * lens_uv[0])
            + self.up.as_ref() * (self.lens_radius * lens_uv[1]);

        self.ray(film_u, film_v, lens_vector)
    }

    fn ray(&self, film_u: FloatType, film_v: FloatType, lens_vector: WorldVector) -> Ray {
        let film_point_offset = self.film_origin_offset + self.up.as_ref() * (film_v * self.pixel_pitch)
            - self.right.as_ref() * (film_u * self.pixel_pitch);

        // Aim at the point where the pixel's chief ray crosses the focus plane.
        // The film is behind the lens, so the direction is never zero.
        let direction =
            WorldDirection::new_normalize(-lens_vector * self.lens_weight - film_point_offset);

        Ray::new(self.center + lens_vector, direction)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::{assert, let_assert};
    use rand::{SeedableRng as _, rngs::SmallRng};

    fn camera(f_number: FloatType) -> Camera {
        // X goes right, Y goes away, Z goes up
        Camera::builder()
            .center(WorldPoint::new(0.0, 0.0, 0.0))
            .forward(WorldVector::new(0.0, 1.0, 0.0))
            .up(WorldVector::new(0.0, 0.0, 1.0))
            .resolution(ScreenSize::new(800, 600))
            .film_width(36e-3)
            .focal_length(50e-3)
            .f_number(f_number)
            .focus_distance(2.0)
            .build()
            .unwrap()
    }

    #[test]
    fn left_right_up_down() {
        let camera = camera(FloatType::INFINITY);
        let mut rng = SmallRng::seed_from_u64(1);

        let ray_center = camera.sample_ray(&ScreenPoint::new(400, 300), &mut rng);
        let ray_left = camera.sample_ray(&ScreenPoint::new(0, 300), &mut rng);
        let ray_right = camera.sample_ray(&ScreenPoint::new(799, 300), &mut rng);
        let ray_up = camera.sample_ray(&ScreenPoint::new(400, 0), &mut rng);
        let ray_down = camera.sample_ray(&ScreenPoint::new(400, 599), &mut rng);

        assert!(ray_center.direction.x.abs() < 1e-3);
        assert!(ray_center.direction.z.abs() < 1e-3);
        assert!(ray_left.direction.x < ray_center.direction.x);
        assert!(ray_right.direction.x > ray_center.direction.x);
        assert!(ray_up.direction.z > ray_center.direction.z);
        assert!(ray_down.direction.z < ray_center.direction.z);
    }

    #[test]
    fn pixel_center_ray_is_symmetric() {
        let camera = camera(FloatType::INFINITY);
        let left = camera.ray_through(&ScreenPoint::new(0, 0));
        let right = camera.ray_through(&ScreenPoint::new(799, 599));

        assert!(left.origin == WorldPoint::origin());
        assert!((left.direction.x + right.direction.x).abs() < 1e-12);
        assert!((left.direction.z + right.direction.z).abs() < 1e-12);
        assert!((left.direction.y - right.direction.y).abs() < 1e-12);
    }

    #[test]
    fn lens_rays_meet_at_focus() {
        let camera = camera(2.0);
        let mut rng = SmallRng::seed_from_u64(7);
        let pixel = ScreenPoint::new(400, 300);

        for _ in 0..20 {
            let ray = camera.sample_ray(&pixel, &mut rng);
            // Rays leave from different points of the lens, but stay close at the focus plane
            let t = 2.0 / ray.direction.y;
            let p = ray.point_at(t);
            assert!(p.x.abs() < 0.01, "{p:?}");
            assert!(p.z.abs() < 0.01, "{p:?}");
        }
    }

    #[test]
    fn parallel_up_and_forward() {
        let result = Camera::builder()
            .center(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 0.0, 2.0))
            .up(WorldVector::new(0.0, 0.0, 1.0))
            .resolution(ScreenSize::new(10, 10))
            .build();
        let_assert!(Err(GeometryError::InvalidGeometry { .. }) = result);
    }

    #[test]
    fn empty_resolution() {
        let result = Camera::builder()
            .center(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 1.0, 0.0))
            .up(WorldVector::new(0.0, 0.0, 1.0))
            .resolution(ScreenSize::new(0, 10))
            .build();
        let_assert!(Err(GeometryError::InvalidGeometry { .. }) = result);
    }
}

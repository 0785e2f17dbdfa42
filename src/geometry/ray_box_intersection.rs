use crate::geometry::{FloatType, Ray, WorldBox, WorldVector};

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Checks whether the ray hits the box no further than `max_distance` from its origin.
    fn intersects(&self, ray: &Ray, max_distance: FloatType) -> bool;
}

impl WorldBox {
    /// Componentwise distances along the ray to the near and far slab boundaries.
    fn slab_distances(&self, ray: &Ray) -> (WorldVector, WorldVector) {
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min() - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max() - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (near <= far)
        let near = to_box_min.zip_map(&to_box_max, FloatType::min);
        let far = to_box_min.zip_map(&to_box_max, FloatType::max);

        (near, far)
    }
}

impl RayIntersectionExt for WorldBox {
    /// Returns minimum and maximum distance along the ray, ray intersects is min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        let (near, far) = self.slab_distances(ray);

        let min_t = near.x.max(near.y.max(near.z));
        let max_t = far.x.min(far.y.min(far.z));

        (min_t, max_t)
    }

    fn intersects(&self, ray: &Ray, max_distance: FloatType) -> bool {
        let (near, far) = self.slab_distances(ray);

        let min_t = near.x.max(near.y.max(near.z));
        let max_t = far.x.min(far.y.min(far.z));
        if min_t > max_t || max_t < 0.0 {
            return false;
        }

        // Approximate distance cut-off: per axis displacement to the entry plane.
        // Never larger than the true distance to the entry point.
        let entry_distance_squared: FloatType = near
            .iter()
            .zip(ray.direction.iter())
            .filter(|(t, _)| t.is_finite() && **t > 0.0)
            .map(|(t, d)| (t * d).powi(2))
            .sum();

        entry_distance_squared <= max_distance * max_distance
    }
}

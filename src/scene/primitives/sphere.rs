use arrayvec::ArrayVec;
use nalgebra::Unit;

use crate::geometry::{
    FloatType, GeometryError, Ray, WorldBox, WorldDirection, WorldPoint, WorldVector, finite_point,
};

use super::{in_range, solve_quadratic};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Result<Sphere, GeometryError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::invalid_geometry(format!(
                "sphere radius must be positive and finite, got {radius}"
            )));
        }
        Ok(Sphere {
            center: finite_point(center)?,
            radius,
        })
    }

    pub fn center(&self) -> &WorldPoint {
        &self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    pub fn normal_at(&self, point: &WorldPoint) -> WorldDirection {
        Unit::new_normalize(point - self.center)
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> ArrayVec<FloatType, 2> {
        let oc = ray.origin - self.center;
        let b = 2.0 * oc.dot(ray.direction.as_ref());
        let c = oc.dot(&oc) - self.radius * self.radius;

        let mut roots = solve_quadratic(1.0, b, c);
        roots.retain(|t| in_range(*t, max_distance));
        roots
    }

    pub fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox::new(self.center - r_vec, self.center + r_vec)
    }
}

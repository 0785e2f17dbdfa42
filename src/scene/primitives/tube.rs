use arrayvec::ArrayVec;
use nalgebra::Unit;

use crate::{
    geometry::{FloatType, GeometryError, Ray, WorldDirection, WorldPoint, WorldVector, finite_point},
    util::near_zero,
};

use super::{in_range, solve_quadratic};

/// Infinitely long tube around an axis.
#[derive(Clone, Debug)]
pub struct Tube {
    axis: Ray,
    radius: FloatType,
}

impl Tube {
    pub fn new(axis: Ray, radius: FloatType) -> Result<Tube, GeometryError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::invalid_geometry(format!(
                "tube radius must be positive and finite, got {radius}"
            )));
        }
        finite_point(axis.origin)?;
        Ok(Tube { axis, radius })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    /// Signed distance of the point's projection onto the axis from the axis origin.
    pub(super) fn axial_distance(&self, point: &WorldPoint) -> FloatType {
        self.axis.direction.dot(&(point - self.axis.origin))
    }

    /// Part of the vector perpendicular to the axis.
    fn perpendicular(&self, v: &WorldVector) -> WorldVector {
        v - self.axis.direction.as_ref() * self.axis.direction.dot(v)
    }

    pub fn normal_at(&self, point: &WorldPoint) -> WorldDirection {
        let on_axis = self.axis.point_at(self.axial_distance(point));
        Unit::new_normalize(point - on_axis)
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> ArrayVec<FloatType, 2> {
        let v = self.perpendicular(&ray.direction);
        let a = v.norm_squared();
        if near_zero(a) {
            // Parallel with the axis, either inside or outside the whole way
            return ArrayVec::new();
        }

        let dp = self.perpendicular(&(ray.origin - self.axis.origin));
        let b = 2.0 * v.dot(&dp);
        let c = dp.norm_squared() - self.radius * self.radius;

        let mut roots = solve_quadratic(a, b, c);
        roots.retain(|t| in_range(*t, max_distance));
        roots
    }
}

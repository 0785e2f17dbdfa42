use crate::{
    geometry::{
        FloatType, GeometryError, Ray, WorldDirection, WorldPoint, WorldVector, finite_point,
        to_direction,
    },
    util::near_zero,
};

use super::in_range;

/// Infinite plane given by a point on it and its normal.
#[derive(Clone, Debug)]
pub struct Plane {
    point: WorldPoint,
    normal: WorldDirection,
}

impl Plane {
    pub fn new(point: WorldPoint, normal: WorldVector) -> Result<Plane, GeometryError> {
        Ok(Plane {
            point: finite_point(point)?,
            normal: to_direction(normal)?,
        })
    }

    /// Plane passing through three distinct, non-collinear points.
    /// The normal follows the right hand rule for the order a, b, c.
    pub fn through_points(
        a: WorldPoint,
        b: WorldPoint,
        c: WorldPoint,
    ) -> Result<Plane, GeometryError> {
        let (a, b, c) = (finite_point(a)?, finite_point(b)?, finite_point(c)?);
        if a == b || b == c || a == c {
            return Err(GeometryError::invalid_geometry(
                "plane points must be distinct",
            ));
        }

        let normal = to_direction((b - a).cross(&(c - a))).map_err(|_| {
            GeometryError::invalid_geometry("plane points must not be collinear")
        })?;

        Ok(Plane { point: a, normal })
    }

    pub fn point(&self) -> &WorldPoint {
        &self.point
    }

    pub fn normal(&self) -> &WorldDirection {
        &self.normal
    }

    /// Signed distance of a point from the plane, positive on the side the normal points to.
    pub fn signed_distance(&self, p: &WorldPoint) -> FloatType {
        self.normal.dot(&(p - self.point))
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Option<FloatType> {
        let nv = self.normal.dot(ray.direction.as_ref());
        if near_zero(nv) {
            // Parallel, either always or never touching the plane
            return None;
        }

        let t = self.normal.dot(&(self.point - ray.origin)) / nv;
        in_range(t, max_distance).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn xy_plane() -> Plane {
        Plane::new(WorldPoint::new(0.0, 0.0, 1.0), WorldVector::new(0.0, 0.0, 2.0)).unwrap()
    }

    fn ray(origin: [FloatType; 3], direction: [FloatType; 3]) -> Ray {
        Ray::try_new(origin.into(), direction.into()).unwrap()
    }

    #[test]
    fn normal_is_normalized() {
        assert!(xy_plane().normal().into_inner() == WorldVector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn zero_normal_is_rejected() {
        let_assert!(
            Err(GeometryError::InvalidVector) = Plane::new(WorldPoint::origin(), WorldVector::zeros())
        );
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let_assert!(
            Err(GeometryError::InvalidVector) =
                Plane::new(WorldPoint::origin(), WorldVector::new(FloatType::NAN, 0.0, 0.0))
        );
        let_assert!(
            Err(GeometryError::InvalidGeometry { .. }) =
                Plane::new(WorldPoint::new(0.0, FloatType::INFINITY, 0.0), WorldVector::z())
        );
        let_assert!(
            Err(GeometryError::InvalidGeometry { .. }) = Plane::through_points(
                WorldPoint::origin(),
                WorldPoint::new(1.0, 0.0, 0.0),
                WorldPoint::new(0.0, 0.0, FloatType::NAN),
            )
        );
    }

    #[test]
    fn from_points() {
        let_assert!(
            Ok(plane) = Plane::through_points(
                WorldPoint::new(1.0, 0.0, 0.0),
                WorldPoint::new(0.0, 1.0, 0.0),
                WorldPoint::new(0.0, 0.0, 1.0),
            )
        );
        let expected = WorldVector::new(1.0, 1.0, 1.0).normalize();
        assert!((plane.normal().into_inner() - expected).norm() < 1e-12);
        assert!(plane.signed_distance(&WorldPoint::new(1.0, 1.0, 1.0)) > 0.0);
    }

    #[test_case([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0] ; "same_first_two")]
    #[test_case([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0] ; "same_first_last")]
    #[test_case([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0] ; "collinear")]
    fn degenerate_points(a: [FloatType; 3], b: [FloatType; 3], c: [FloatType; 3]) {
        let_assert!(
            Err(GeometryError::InvalidGeometry { .. }) =
                Plane::through_points(a.into(), b.into(), c.into())
        );
    }

    #[test_case([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], Some(1.0) ; "perpendicular_hit")]
    #[test_case([1.0, 1.0, 0.0], [0.0, 1.0, 1.0], Some(std::f64::consts::SQRT_2) ; "oblique_hit")]
    #[test_case([1.0, 1.0, 0.0], [0.0, 0.0, -1.0], None ; "pointing_away")]
    #[test_case([1.0, 1.0, 0.0], [1.0, 0.0, 0.0], None ; "parallel_outside")]
    #[test_case([1.0, 1.0, 1.0], [1.0, 0.0, 0.0], None ; "parallel_inside")]
    #[test_case([1.0, 1.0, 1.0], [0.0, 0.0, 1.0], None ; "starts_on_plane")]
    #[test_case([0.0, 0.0, 1.0], [0.0, 1.0, 1.0], None ; "starts_at_reference_point")]
    fn intersections(origin: [FloatType; 3], direction: [FloatType; 3], expected: Option<FloatType>) {
        let result = xy_plane().intersect(&ray(origin, direction), FloatType::INFINITY);
        match expected {
            Some(t) => {
                let_assert!(Some(actual) = result);
                assert!((actual - t).abs() < 1e-9);
            }
            None => assert!(result.is_none()),
        }
    }

    #[test]
    fn beyond_max_distance() {
        let plane = xy_plane();
        let r = ray([1.0, 1.0, -5.0], [0.0, 0.0, 1.0]);
        assert!(plane.intersect(&r, 5.9).is_none());
        assert!(plane.intersect(&r, 6.0).is_some());
    }
}

mod aabb;
mod ray_box_intersection;

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;

use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};
use thiserror::Error;

pub type FloatType = f64;

/// Values closer to zero than this are treated as zero.
pub const EPSILON: FloatType = 1e-10;

/// How far secondary rays are pushed off the surface they start on.
pub const SURFACE_OFFSET: FloatType = 1e-4;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;
pub type ScreenBlock = AABB<ScreenPoint>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
/// Normalized, never zero, direction.
pub type WorldDirection = Unit<WorldVector>;
pub type WorldBox = AABB<WorldPoint>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Vector must not be zero")]
    InvalidVector,

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("Invalid bounding box: {min:?} is not below {max:?}")]
    InvalidBoundingBox { min: WorldPoint, max: WorldPoint },
}

impl GeometryError {
    pub(crate) fn invalid_geometry(reason: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

/// Checks that the vector is finite and not zero.
pub fn nonzero(v: WorldVector) -> Result<WorldVector, GeometryError> {
    if !v.iter().all(|x| x.is_finite()) || v.norm() <= EPSILON {
        Err(GeometryError::InvalidVector)
    } else {
        Ok(v)
    }
}

/// Normalizes a vector, zero and non-finite vectors are rejected.
pub fn to_direction(v: WorldVector) -> Result<WorldDirection, GeometryError> {
    Unit::try_new(nonzero(v)?, EPSILON).ok_or(GeometryError::InvalidVector)
}

/// Checks that all coordinates of the point are finite.
pub fn finite_point(p: WorldPoint) -> Result<WorldPoint, GeometryError> {
    if p.iter().all(|x| x.is_finite()) {
        Ok(p)
    } else {
        Err(GeometryError::invalid_geometry(format!(
            "point coordinates must be finite, got {p:?}"
        )))
    }
}

/// Direction pointing from `from` to `to`.
pub fn direction_between(
    from: &WorldPoint,
    to: &WorldPoint,
) -> Result<WorldDirection, GeometryError> {
    to_direction(to - from)
}

/// Normalized cross product, fails for parallel vectors.
pub fn checked_cross(a: &WorldVector, b: &WorldVector) -> Result<WorldDirection, GeometryError> {
    to_direction(a.cross(b))
}

/// Mirror reflection of `v` about the plane with normal `n`.
pub fn reflect(v: &WorldDirection, n: &WorldDirection) -> WorldDirection {
    let vn = v.dot(n.as_ref());
    Unit::new_normalize(v.as_ref() - n.as_ref() * (2.0 * vn))
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: WorldDirection,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldDirection) -> Ray {
        let inv_direction = direction.map(|x| {
            if x == 0.0 {
                FloatType::INFINITY
            } else {
                1.0 / x
            }
        });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    /// Creates a ray from a direction that is not normalized yet.
    pub fn try_new(origin: WorldPoint, direction: WorldVector) -> Result<Ray, GeometryError> {
        Ok(Ray::new(origin, to_direction(direction)?))
    }

    /// Creates a ray leaving a surface point.
    /// The origin is moved along the surface normal to the side where the direction points,
    /// so that the ray doesn't hit the surface it starts on.
    pub fn offset_from_surface(
        point: WorldPoint,
        direction: WorldDirection,
        normal: &WorldDirection,
    ) -> Ray {
        let offset = if normal.dot(direction.as_ref()) > 0.0 {
            SURFACE_OFFSET
        } else {
            -SURFACE_OFFSET
        };
        Ray::new(point + normal.as_ref() * offset, direction)
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction.as_ref() * distance
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use assert2::{assert, let_assert};
    use proptest::prelude::*;
    use test_case::test_case;
    use test_strategy::proptest;

    /// Helper macro that creates a wrapper arnound a type that implemetns Deref and Arbitary
    macro_rules! arbitrary_wrapper {
        ( $wrapper_name:ident ( $type:ty ) -> $block:block ) => {
            #[derive(Copy, Clone, Debug)]
            pub struct $wrapper_name(pub $type);

            impl std::ops::Deref for $wrapper_name {
                type Target = $type;
                fn deref(&self) -> &$type {
                    &self.0
                }
            }

            impl Arbitrary for $wrapper_name {
                type Parameters = ();
                type Strategy = proptest::strategy::BoxedStrategy<Self>;
                fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
                    $block.prop_map(|x| $wrapper_name(x)).boxed()
                }
            }
        };
    }

    fn simple_float() -> BoxedStrategy<FloatType> {
        (-100_000i32..100_000).prop_map(|n| n as FloatType * 1e-3).boxed()
    }

    arbitrary_wrapper! {
        ScreenBlockWrapper(ScreenBlock) -> {
            const RANGE: std::ops::Range<u32> = 0..100u32;
            (RANGE, RANGE, RANGE, RANGE)
                .prop_map(|coords| {
                    ScreenBlock::new(
                        ScreenPoint::new(coords.0.min(coords.2), coords.1.min(coords.3)),
                        ScreenPoint::new(coords.0.max(coords.2), coords.1.max(coords.3)),
                    )
                })
        }
    }

    arbitrary_wrapper! {
        NonzeroWorldVectorWrapper(WorldVector) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_filter_map(
                    "vector is zero",
                    |coords| {
                        let vector = WorldVector::new(coords.0, coords.1, coords.2);
                        if vector.norm() < 1e-6 {
                            None
                        } else {
                            Some(vector)
                        }
                    })

        }
    }

    arbitrary_wrapper! {
        WorldPointWrapper(WorldPoint) -> {
            (simple_float(), simple_float(), simple_float())
                .prop_map(|coords| {
                    WorldPoint::new(coords.0, coords.1, coords.2)
                })
        }
    }

    #[proptest]
    fn normalized_is_unit(v: NonzeroWorldVectorWrapper) {
        let normalized = v.normalize();
        assert!((normalized.norm() - 1.0).abs() < 1e-6);
    }

    #[proptest]
    fn normalize_mut_changes_receiver(v: NonzeroWorldVectorWrapper) {
        let original = *v;
        let mut v = *v;
        let copy = v.normalize();
        assert!(v == original);

        v.normalize_mut();
        assert!(v == copy);
        assert!((v.norm() - 1.0).abs() < 1e-6);
    }

    #[proptest]
    fn point_vector_round_trip(p: WorldPointWrapper, v: NonzeroWorldVectorWrapper) {
        let moved = *p + *v;
        let back = moved - *v;
        assert!((back - *p).norm() < 1e-9);
    }

    #[proptest]
    fn direction_to_self_is_rejected(p: WorldPointWrapper) {
        assert!(direction_between(&p, &p) == Err(GeometryError::InvalidVector));
    }

    #[proptest]
    fn direction_between_points_back_and_forth(
        p: WorldPointWrapper,
        v: NonzeroWorldVectorWrapper,
    ) {
        let q = *p + *v;
        let_assert!(Ok(there) = direction_between(&p, &q));
        let_assert!(Ok(back) = direction_between(&q, &p));
        assert!((there.as_ref() + back.as_ref()).norm() < 1e-9);
    }

    #[proptest]
    fn degenerate_vectors_are_rejected(v: NonzeroWorldVectorWrapper) {
        assert!(nonzero(*v + -*v) == Err(GeometryError::InvalidVector));
        assert!(nonzero(*v * 0.0) == Err(GeometryError::InvalidVector));
        assert!(checked_cross(&v, &(*v * 2.0)) == Err(GeometryError::InvalidVector));
        assert!(nonzero(*v).is_ok());
    }

    #[test]
    fn cross_of_axes() {
        let_assert!(
            Ok(z) = checked_cross(&WorldVector::new(2.0, 0.0, 0.0), &WorldVector::new(0.0, 3.0, 0.0))
        );
        assert!(z.into_inner() == WorldVector::new(0.0, 0.0, 1.0));
    }

    #[test_case(WorldVector::new(FloatType::NAN, 0.0, 0.0) ; "nan")]
    #[test_case(WorldVector::new(0.0, FloatType::INFINITY, 0.0) ; "infinite")]
    #[test_case(WorldVector::new(1.0, 0.0, FloatType::NEG_INFINITY) ; "negative_infinite")]
    fn non_finite_vectors_are_rejected(v: WorldVector) {
        assert!(nonzero(v) == Err(GeometryError::InvalidVector));
        assert!(to_direction(v) == Err(GeometryError::InvalidVector));
        let_assert!(Err(GeometryError::InvalidVector) = Ray::try_new(WorldPoint::origin(), v));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let_assert!(
            Err(GeometryError::InvalidGeometry { .. }) =
                finite_point(WorldPoint::new(0.0, FloatType::NAN, 0.0))
        );
        assert!(finite_point(WorldPoint::new(1.0, 2.0, 3.0)).is_ok());
    }

    #[test]
    fn zero_direction_ray() {
        let result = Ray::try_new(WorldPoint::origin(), WorldVector::zeros());
        let_assert!(Err(GeometryError::InvalidVector) = result);
    }

    #[test]
    fn ray_inverse_direction() {
        let_assert!(Ok(ray) = Ray::try_new(WorldPoint::origin(), WorldVector::new(0.0, -2.0, 0.0)));
        assert!(ray.direction.into_inner() == WorldVector::new(0.0, -1.0, 0.0));
        assert!(ray.inv_direction == WorldVector::new(FloatType::INFINITY, -1.0, FloatType::INFINITY));
    }

    #[test]
    fn offset_follows_direction_side() {
        let normal = WorldDirection::new_normalize(WorldVector::new(0.0, 0.0, 1.0));
        let point = WorldPoint::new(1.0, 2.0, 3.0);

        let up = Ray::offset_from_surface(point, normal, &normal);
        assert!(up.origin.z > point.z);

        let down = Ray::offset_from_surface(point, -normal, &normal);
        assert!(down.origin.z < point.z);

        assert!(((up.origin - point).norm() - SURFACE_OFFSET).abs() < 1e-12);
    }

    #[test]
    fn mirror_reflection() {
        let v = WorldDirection::new_normalize(WorldVector::new(1.0, -1.0, 0.0));
        let n = WorldDirection::new_normalize(WorldVector::new(0.0, 1.0, 0.0));
        let r = reflect(&v, &n);
        assert!((r.into_inner() - WorldVector::new(1.0, 1.0, 0.0).normalize()).norm() < 1e-12);
    }
}

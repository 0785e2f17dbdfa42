mod cylinder;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use polygon::Polygon;
pub use sphere::Sphere;
pub use tube::Tube;

use arrayvec::ArrayVec;
use bon::bon;

use crate::{
    geometry::{FloatType, Ray, RayIntersectionExt as _, WorldBox, WorldDirection, WorldPoint},
    scene::{Intersectable, Material},
    util::{BLACK, Color, snap_to_zero},
};

/// Distances along a ray at which it hits a shape, in no particular order.
pub type Hits = ArrayVec<FloatType, 4>;

/// Is the distance in front of the ray origin and not beyond the limit?
fn in_range(t: FloatType, max_distance: FloatType) -> bool {
    snap_to_zero(t) > 0.0 && t <= max_distance
}

/// Real roots of `a * t^2 + b * t + c = 0`, in ascending order.
/// A double root is reported once.
fn solve_quadratic(a: FloatType, b: FloatType, c: FloatType) -> ArrayVec<FloatType, 2> {
    let mut roots = ArrayVec::new();
    let discriminant = snap_to_zero(b * b - 4.0 * a * c);

    if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
    } else if discriminant > 0.0 {
        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);
        roots.push(t1.min(t2));
        roots.push(t1.max(t2));
    }

    roots
}

/// Closed set of supported primitive shapes.
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    /// Outward normal at a point on the surface.
    pub fn normal_at(&self, point: &WorldPoint) -> WorldDirection {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => *p.normal(),
            Shape::Polygon(p) => *p.plane().normal(),
            Shape::Tube(t) => t.normal_at(point),
            Shape::Cylinder(c) => c.normal_at(point),
        }
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        match self {
            Shape::Sphere(s) => s.intersect(ray, max_distance).into_iter().collect(),
            Shape::Plane(p) => p.intersect(ray, max_distance).into_iter().collect(),
            Shape::Polygon(p) => p.intersect(ray, max_distance).into_iter().collect(),
            Shape::Tube(t) => t.intersect(ray, max_distance).into_iter().collect(),
            Shape::Cylinder(c) => c.intersect(ray, max_distance),
        }
    }

    /// `None` for shapes that extend to infinity.
    pub fn bounding_box(&self) -> Option<WorldBox> {
        match self {
            Shape::Sphere(s) => Some(s.bounding_box()),
            Shape::Plane(_) => None,
            Shape::Polygon(p) => Some(p.bounding_box()),
            Shape::Tube(_) => None,
            Shape::Cylinder(c) => Some(c.bounding_box()),
        }
    }
}

macro_rules! shape_from {
    ( $( $variant:ident ),* ) => {
        $(
            impl From<$variant> for Shape {
                fn from(value: $variant) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

shape_from!(Sphere, Plane, Polygon, Tube, Cylinder);

/// A shape together with its surface properties.
#[derive(Clone, Debug)]
pub struct Geometry {
    shape: Shape,
    bounding_box: Option<WorldBox>,
    emission: Color,
    material: Material,
}

#[bon]
impl Geometry {
    #[builder]
    pub fn new(
        #[builder(into)] shape: Shape,
        #[builder(default = BLACK)] emission: Color,
        #[builder(default)] material: Material,
    ) -> Geometry {
        let bounding_box = shape.bounding_box();
        Geometry {
            shape,
            bounding_box,
            emission,
            material,
        }
    }
}

impl Geometry {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn normal_at(&self, point: &WorldPoint) -> WorldDirection {
        self.shape.normal_at(point)
    }
}

impl Intersectable for Geometry {
    fn find_intersections(
        &self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
    ) -> Option<Vec<GeoPoint<'_>>> {
        if use_bounding_box
            && self
                .bounding_box
                .is_some_and(|b| !b.intersects(ray, max_distance))
        {
            return None;
        }

        let hits = self.shape.intersect(ray, max_distance);
        if hits.is_empty() {
            None
        } else {
            Some(
                hits.into_iter()
                    .map(|t| GeoPoint {
                        geometry: self,
                        point: ray.point_at(t),
                    })
                    .collect(),
            )
        }
    }

    fn bounding_box(&self) -> Option<WorldBox> {
        self.bounding_box
    }
}

/// Intersection point together with the geometry it lies on.
#[derive(Copy, Clone, Debug)]
pub struct GeoPoint<'a> {
    pub geometry: &'a Geometry,
    pub point: WorldPoint,
}

impl PartialEq for GeoPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && self.point == other.point
    }
}

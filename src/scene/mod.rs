pub mod bvh;
pub mod geometries;
pub mod lights;
pub mod material;
pub mod primitives;

pub use bvh::Bvh;
pub use geometries::{Geometries, ObjOpenError};
pub use lights::{AmbientLight, DirectionalLight, Light, PointLight, SpotLight};
pub use material::Material;
pub use primitives::{GeoPoint, Geometry, Shape};

use bon::Builder;
use ordered_float::OrderedFloat;

use crate::{
    geometry::{FloatType, Ray, WorldBox},
    util::{BLACK, Color},
};

/// Anything a ray can be tested against.
pub trait Intersectable {
    /// All intersections with the ray no further than `max_distance`, in no particular order.
    /// `None` if there are none.
    ///
    /// With `use_bounding_box` the query may skip parts whose bounding box the ray misses;
    /// the result is the same either way.
    fn find_intersections(
        &self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
    ) -> Option<Vec<GeoPoint<'_>>>;

    /// Box around everything, `None` if unbounded.
    fn bounding_box(&self) -> Option<WorldBox>;

    /// The intersection closest to the ray origin.
    fn find_closest_intersection(&self, ray: &Ray, use_bounding_box: bool) -> Option<GeoPoint<'_>> {
        self.find_intersections(ray, FloatType::INFINITY, use_bounding_box)?
            .into_iter()
            .min_by_key(|gp| OrderedFloat((gp.point - ray.origin).norm_squared()))
    }
}

/// Everything needed to trace rays. Immutable once built.
#[derive(Builder, Clone, Debug)]
pub struct Scene<O: Intersectable> {
    #[builder(default = BLACK)]
    pub background: Color,
    #[builder(default = AmbientLight::NONE)]
    pub ambient_light: AmbientLight,
    pub object: O,
    #[builder(default)]
    pub lights: Vec<Light>,
}

use crate::{
    geometry::{FloatType, GeometryError, Ray, WorldBox, WorldDirection, WorldPoint, WorldVector},
    util::{near_zero, snap_to_zero},
};

use super::{Hits, Tube, in_range};

/// Tube cut to a finite height and closed by two caps.
/// The bottom cap is centered at the axis origin, the top cap `height` along the axis.
#[derive(Clone, Debug)]
pub struct Cylinder {
    tube: Tube,
    height: FloatType,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: FloatType, height: FloatType) -> Result<Cylinder, GeometryError> {
        if !(height > 0.0 && height.is_finite()) {
            return Err(GeometryError::invalid_geometry(format!(
                "cylinder height must be positive and finite, got {height}"
            )));
        }
        Ok(Cylinder {
            tube: Tube::new(axis, radius)?,
            height,
        })
    }

    pub fn axis(&self) -> &Ray {
        self.tube.axis()
    }

    pub fn radius(&self) -> FloatType {
        self.tube.radius()
    }

    pub fn height(&self) -> FloatType {
        self.height
    }

    fn bottom_center(&self) -> WorldPoint {
        self.axis().origin
    }

    fn top_center(&self) -> WorldPoint {
        self.axis().point_at(self.height)
    }

    /// Points on the rim belong to the caps.
    pub fn normal_at(&self, point: &WorldPoint) -> WorldDirection {
        let h = self.tube.axial_distance(point);
        if near_zero(h) {
            -self.axis().direction
        } else if near_zero(h - self.height) {
            self.axis().direction
        } else {
            self.tube.normal_at(point)
        }
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        let mut hits: Hits = self
            .tube
            .intersect(ray, max_distance)
            .into_iter()
            .filter(|t| {
                let h = snap_to_zero(self.tube.axial_distance(&ray.point_at(*t)));
                h > 0.0 && snap_to_zero(h - self.height) < 0.0
            })
            .collect();

        let axis = self.axis().direction;
        let nv = axis.dot(ray.direction.as_ref());
        if !near_zero(nv) {
            let r2 = self.radius() * self.radius();
            for center in [self.bottom_center(), self.top_center()] {
                let t = axis.dot(&(center - ray.origin)) / nv;
                if in_range(t, max_distance)
                    && snap_to_zero((ray.point_at(t) - center).norm_squared() - r2) <= 0.0
                {
                    hits.push(t);
                }
            }
        }

        hits
    }

    pub fn bounding_box(&self) -> WorldBox {
        // Each cap disk reaches r * sin(angle between the axis and the coordinate axis)
        let d = self.axis().direction;
        let r = self.radius();
        let extent = WorldVector::from_fn(|i, _| r * (1.0 - d[i] * d[i]).max(0.0).sqrt());

        let (bottom, top) = (self.bottom_center(), self.top_center());
        WorldBox::new(bottom.inf(&top) - extent, bottom.sup(&top) + extent)
    }
}

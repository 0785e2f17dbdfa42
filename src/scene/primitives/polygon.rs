use itertools::Itertools as _;

use crate::{
    geometry::{FloatType, GeometryError, Ray, WorldBox, WorldPoint, finite_point},
    util::{near_zero, snap_to_zero},
};

use super::Plane;

/// Convex planar polygon. Vertices are ordered along the boundary.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<WorldPoint>,
    plane: Plane,
}

impl Polygon {
    pub fn new(vertices: Vec<WorldPoint>) -> Result<Polygon, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::invalid_geometry(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        for v in &vertices {
            finite_point(*v)?;
        }

        if vertices.iter().circular_tuple_windows().any(|(a, b)| a == b) {
            return Err(GeometryError::invalid_geometry(
                "consecutive polygon vertices must differ",
            ));
        }

        let plane = Plane::through_points(vertices[0], vertices[1], vertices[2])?;
        if vertices.len() > 3 {
            check_planar_convex(&vertices, &plane)?;
        }

        Ok(Polygon { vertices, plane })
    }

    pub fn triangle(a: WorldPoint, b: WorldPoint, c: WorldPoint) -> Result<Polygon, GeometryError> {
        Polygon::new(vec![a, b, c])
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Hit distance if the ray passes through the inside of the polygon.
    /// Points on the boundary don't count as hits.
    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Option<FloatType> {
        let t = self.plane.intersect(ray, max_distance)?;

        // The hit is inside iff the ray passes on the same side of all edges
        let mut side = None;
        for (a, b) in self.vertices.iter().circular_tuple_windows() {
            let edge_normal = (a - ray.origin).cross(&(b - ray.origin));
            let s = snap_to_zero(edge_normal.dot(ray.direction.as_ref()));
            if s == 0.0 {
                return None;
            }
            match side {
                None => side = Some(s > 0.0),
                Some(positive) if positive != (s > 0.0) => return None,
                Some(_) => {}
            }
        }

        Some(t)
    }

    pub fn bounding_box(&self) -> WorldBox {
        WorldBox::from_points(&self.vertices)
            .unwrap_or_else(|| unreachable!("polygon always has vertices"))
    }
}

/// All vertices must lie in the plane and every corner must turn the same way.
fn check_planar_convex(vertices: &[WorldPoint], plane: &Plane) -> Result<(), GeometryError> {
    if let Some(p) = vertices.iter().find(|p| !near_zero(plane.signed_distance(p))) {
        return Err(GeometryError::invalid_geometry(format!(
            "polygon vertex {p:?} is not in the plane of the first three"
        )));
    }

    let normal = plane.normal();
    let mut turn = None;
    for (a, b, c) in vertices.iter().circular_tuple_windows() {
        let corner = snap_to_zero((b - a).cross(&(c - b)).dot(normal.as_ref()));
        if corner == 0.0 {
            return Err(GeometryError::invalid_geometry(format!(
                "polygon vertex {b:?} is collinear with its neighbours"
            )));
        }
        match turn {
            None => turn = Some(corner > 0.0),
            Some(positive) if positive != (corner > 0.0) => {
                return Err(GeometryError::invalid_geometry(
                    "polygon must be convex with consistently ordered vertices",
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

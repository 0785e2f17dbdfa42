use crate::geometry::{FloatType, GeometryError, WorldBox, WorldPoint};

/// Axis aligned box given by its minimum and maximum corner.
/// The corners are only reachable through accessors, so for world space boxes
/// `min <= max` holds for every box that exists.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    min: Point,
    max: Point,
}

impl<Point> AABB<Point> {
    /// Unchecked constructor, callers are responsible for the ordering of the corners.
    pub(crate) fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn min(&self) -> &Point {
        &self.min
    }

    pub fn max(&self) -> &Point {
        &self.max
    }
}

impl WorldBox {
    pub fn try_new(min: WorldPoint, max: WorldPoint) -> Result<WorldBox, GeometryError> {
        if min.x <= max.x && min.y <= max.y && min.z <= max.z {
            Ok(AABB { min, max })
        } else {
            Err(GeometryError::InvalidBoundingBox { min, max })
        }
    }

    /// Smallest box containing all the points, `None` if there are no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(AABB::new(*first, *first), |acc, p| AABB {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Box surrounding both boxes.
    pub fn union(&self, other: &WorldBox) -> WorldBox {
        AABB {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> WorldPoint {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn contains_point(&self, p: &WorldPoint) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &WorldBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn coordinate_center(&self, axis: usize) -> FloatType {
        (self.min[axis] + self.max[axis]) / 2.0
    }
}

use std::{fs, path::Path};

use thiserror::Error;

use crate::{
    geometry::{FloatType, Ray, RayIntersectionExt as _, WorldBox, WorldPoint},
    scene::{GeoPoint, Geometry, Intersectable, Material, primitives::Polygon},
    util::Color,
};

/// Item of an aggregate, either a single geometry or a nested aggregate.
#[derive(Clone, Debug)]
pub enum Member {
    Geometry(Geometry),
    Group(Geometries),
}

impl Intersectable for Member {
    fn find_intersections(
        &self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
    ) -> Option<Vec<GeoPoint<'_>>> {
        match self {
            Member::Geometry(g) => g.find_intersections(ray, max_distance, use_bounding_box),
            Member::Group(g) => g.find_intersections(ray, max_distance, use_bounding_box),
        }
    }

    fn bounding_box(&self) -> Option<WorldBox> {
        match self {
            Member::Geometry(g) => g.bounding_box(),
            Member::Group(g) => g.bounding_box(),
        }
    }
}

impl From<Geometry> for Member {
    fn from(value: Geometry) -> Self {
        Member::Geometry(value)
    }
}

impl From<Geometries> for Member {
    fn from(value: Geometries) -> Self {
        Member::Group(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Bounds {
    Empty,
    Bounded(WorldBox),
    Unbounded,
}

impl Bounds {
    fn extend(self, other: Option<WorldBox>) -> Bounds {
        match (self, other) {
            (Bounds::Unbounded, _) | (_, None) => Bounds::Unbounded,
            (Bounds::Empty, Some(b)) => Bounds::Bounded(b),
            (Bounds::Bounded(a), Some(b)) => Bounds::Bounded(a.union(&b)),
        }
    }
}

/// Flat aggregate of geometries, tested one by one.
#[derive(Clone, Debug)]
pub struct Geometries {
    members: Vec<Member>,
    bounds: Bounds,
}

impl Default for Geometries {
    fn default() -> Self {
        Geometries {
            members: Vec::new(),
            bounds: Bounds::Empty,
        }
    }
}

impl Geometries {
    pub fn new() -> Geometries {
        Geometries::default()
    }

    pub fn add(&mut self, member: impl Into<Member>) {
        let member = member.into();
        self.bounds = self.bounds.extend(member.bounding_box());
        self.members.push(member);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Loads triangles of a Wavefront OBJ file, all sharing the same surface.
    /// Faces that are not triangles or that are degenerate are skipped.
    pub fn with_obj(
        p: impl AsRef<Path>,
        emission: Color,
        material: Material,
    ) -> Result<Geometries, ObjOpenError> {
        let content = fs::read_to_string(p.as_ref())?;
        let parsed = wavefront_obj::obj::parse(content)?;

        let mut geometries = Geometries::new();
        let mut skipped = 0usize;

        for o in parsed.objects {
            let vertex = |index: (usize, Option<usize>, Option<usize>)| {
                o.vertices
                    .get(index.0)
                    .map(|v| WorldPoint::new(v.x, v.y, v.z))
            };

            for geometry in &o.geometry {
                for shape in &geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        skipped += 1;
                        continue;
                    };
                    let (Some(a), Some(b), Some(c)) = (vertex(a), vertex(b), vertex(c)) else {
                        tracing::warn!(object = %o.name, "Skipping face with missing vertex");
                        skipped += 1;
                        continue;
                    };

                    match Polygon::triangle(a, b, c) {
                        Ok(triangle) => geometries.add(
                            Geometry::builder()
                                .shape(triangle)
                                .emission(emission)
                                .material(material.clone())
                                .build(),
                        ),
                        Err(e) => {
                            tracing::warn!(object = %o.name, "Skipping face: {e}");
                            skipped += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            path = %p.as_ref().display(),
            triangles = geometries.len(),
            skipped,
            "Loaded mesh"
        );

        Ok(geometries)
    }
}

impl Intersectable for Geometries {
    fn find_intersections(
        &self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
    ) -> Option<Vec<GeoPoint<'_>>> {
        match self.bounds {
            Bounds::Empty => return None,
            Bounds::Bounded(b) if use_bounding_box && !b.intersects(ray, max_distance) => {
                return None;
            }
            _ => {}
        }

        self.members
            .iter()
            .filter_map(|m| m.find_intersections(ray, max_distance, use_bounding_box))
            .reduce(|mut acc, mut points| {
                acc.append(&mut points);
                acc
            })
    }

    fn bounding_box(&self) -> Option<WorldBox> {
        match self.bounds {
            Bounds::Bounded(b) => Some(b),
            // An empty aggregate has no extent at all, report it as a point box
            Bounds::Empty => Some(WorldBox::default()),
            Bounds::Unbounded => None,
        }
    }
}

impl<M: Into<Member>> FromIterator<M> for Geometries {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        let mut geometries = Geometries::new();
        geometries.extend(iter);
        geometries
    }
}

/// Adds every item as a separate member, so that a BVH can split between them.
impl<M: Into<Member>> Extend<M> for Geometries {
    fn extend<T: IntoIterator<Item = M>>(&mut self, iter: T) {
        for m in iter {
            self.add(m);
        }
    }
}

impl IntoIterator for Geometries {
    type Item = Member;
    type IntoIter = std::vec::IntoIter<Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

#[derive(Debug, Error)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),
}

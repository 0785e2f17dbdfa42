use crate::{
    geometry::{FloatType, Ray, RayIntersectionExt as _, WorldBox},
    scene::{GeoPoint, Intersectable, geometries::Member},
};

use super::{Bvh, NodeLink};

impl Bvh {
    /// Calls `visit` on every member whose ancestors' boxes the ray hits within `max_distance`.
    /// With `use_bounding_box` unset every member is visited.
    pub(super) fn visit_candidates<'a>(
        &'a self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
        mut visit: impl FnMut(&'a Member),
    ) {
        let mut stack = vec![self.root];

        while let Some(link) = stack.pop() {
            match link {
                NodeLink::Empty => continue,
                NodeLink::Inner(index) => {
                    let node = &self.inner_nodes[index];
                    if use_bounding_box
                        && node
                            .bounding_box
                            .is_some_and(|b| !b.intersects(ray, max_distance))
                    {
                        // Nothing below this node can be hit
                        continue;
                    }
                    stack.extend(node.children.iter().rev());
                }
                NodeLink::Leaf(index) => visit(&self.members[index]),
            }
        }
    }
}

impl Intersectable for Bvh {
    fn find_intersections(
        &self,
        ray: &Ray,
        max_distance: FloatType,
        use_bounding_box: bool,
    ) -> Option<Vec<GeoPoint<'_>>> {
        let mut found = Vec::new();

        self.visit_candidates(ray, max_distance, use_bounding_box, |member| {
            if let Some(mut points) = member.find_intersections(ray, max_distance, use_bounding_box) {
                found.append(&mut points);
            }
        });

        if found.is_empty() { None } else { Some(found) }
    }

    fn bounding_box(&self) -> Option<WorldBox> {
        match self.root {
            NodeLink::Empty => Some(WorldBox::default()),
            NodeLink::Inner(index) => self.inner_nodes[index].bounding_box,
            NodeLink::Leaf(index) => self.members[index].bounding_box(),
        }
    }
}

use index_vec::IndexVec;

use crate::{
    geometry::{FloatType, WorldBox},
    scene::{Geometries, Intersectable as _},
};

use super::{Axis, Bvh, InnerNode, MemberIdx, NodeLink};

/// Member reference together with its cached bounding box.
type BuildItem = (MemberIdx, Option<WorldBox>);

impl Bvh {
    pub fn new(geometries: Geometries) -> Bvh {
        let members: IndexVec<MemberIdx, _> = geometries.into_iter().collect();
        let mut items: Vec<BuildItem> = members
            .iter_enumerated()
            .map(|(i, m)| (i, m.bounding_box()))
            .collect();

        let mut bvh = Bvh {
            root: NodeLink::Empty,
            inner_nodes: IndexVec::with_capacity(members.len().saturating_sub(1)),
            members,
        };

        if !items.is_empty() {
            bvh.root = bvh.build_recursive(&mut items, Axis::X).0;
        }

        tracing::debug!(statistics = %bvh.statistics(), "BVH built");

        bvh
    }

    fn build_recursive(&mut self, items: &mut [BuildItem], axis: Axis) -> (NodeLink, Option<WorldBox>) {
        if let [(index, bounding_box)] = items {
            return (NodeLink::Leaf(*index), *bounding_box);
        }

        let split = partition_at_median(items, axis);
        let (left, right) = items.split_at_mut(split);

        let (left_link, left_box) = self.build_recursive(left, axis.next());
        let (right_link, right_box) = self.build_recursive(right, axis.next());

        let bounding_box = left_box.zip(right_box).map(|(a, b)| a.union(&b));
        let index = self.inner_nodes.push(InnerNode {
            bounding_box,
            children: [left_link, right_link],
        });

        (NodeLink::Inner(index), bounding_box)
    }
}

/// Sorting key of a member along the axis, unbounded members go last.
fn median_key(item: &BuildItem, axis: Axis) -> FloatType {
    item.1
        .map_or(FloatType::INFINITY, |b| b.coordinate_center(axis.index()))
}

/// Reorders the items so that the first `ceil(n / 2)` of them are not above the
/// rest along the axis, returns the split index.
/// Needs at least two items, both sides are non-empty even if all keys are equal.
fn partition_at_median(items: &mut [BuildItem], axis: Axis) -> usize {
    debug_assert!(items.len() >= 2);

    let split = items.len().div_ceil(2);
    items.select_nth_unstable_by(split - 1, |a, b| {
        median_key(a, axis).total_cmp(&median_key(b, axis))
    });

    split
}

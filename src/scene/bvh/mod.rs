mod building;
mod printing;
mod ray_bvh_intersection;

pub use printing::BvhStatistics;

use index_vec::IndexVec;

use crate::{geometry::WorldBox, scene::geometries::Member};

/// Bounding volume hierarchy over the members of an aggregate.
/// Binary tree built by median splits, immutable once built.
#[derive(Clone, Debug)]
pub struct Bvh {
    root: NodeLink,
    inner_nodes: IndexVec<InnerNodeIdx, InnerNode>,
    members: IndexVec<MemberIdx, Member>,
}

#[derive(Clone, Debug)]
struct InnerNode {
    /// Union of both children's boxes, `None` if any of them is unbounded.
    bounding_box: Option<WorldBox>,
    children: [NodeLink; 2],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeLink {
    /// Only used as the root of a tree without members.
    Empty,
    Inner(InnerNodeIdx),
    Leaf(MemberIdx),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn next(self) -> Axis {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

index_vec::define_index_type! {
    struct InnerNodeIdx = u32;
}

index_vec::define_index_type! {
    struct MemberIdx = u32;
}

impl Bvh {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

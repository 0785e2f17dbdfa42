use std::fmt::Display;

use crate::scene::geometries::Member;

use super::{Bvh, NodeLink};

/// Shape summary of a built tree.
/// Depth of a leaf is the number of inner nodes above it.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub inner_count: usize,
    pub leaf_count: usize,
    pub min_depth: usize,
    pub max_depth: usize,
    pub avg_depth: f32,
}

impl Display for BvhStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inner nodes, {} leaves, depth {} - {}; avg {:.1}",
            self.inner_count, self.leaf_count, self.min_depth, self.max_depth, self.avg_depth
        )
    }
}

impl Bvh {
    pub fn print_tree(&self) {
        self.print_recursive(0, self.root);
    }

    pub fn statistics(&self) -> BvhStatistics {
        let mut depths = Vec::with_capacity(self.members.len());
        self.collect_leaf_depths(self.root, 0, &mut depths);

        BvhStatistics {
            inner_count: self.inner_nodes.len(),
            leaf_count: depths.len(),
            min_depth: depths.iter().copied().min().unwrap_or(0),
            max_depth: depths.iter().copied().max().unwrap_or(0),
            avg_depth: if depths.is_empty() {
                0.0
            } else {
                depths.iter().sum::<usize>() as f32 / depths.len() as f32
            },
        }
    }

    fn collect_leaf_depths(&self, link: NodeLink, depth: usize, depths: &mut Vec<usize>) {
        match link {
            NodeLink::Empty => {}
            NodeLink::Leaf(_) => depths.push(depth),
            NodeLink::Inner(index) => {
                for child in self.inner_nodes[index].children {
                    self.collect_leaf_depths(child, depth + 1, depths);
                }
            }
        }
    }

    fn print_recursive(&self, indent: usize, link: NodeLink) {
        let prefix = "  ".repeat(indent);
        match link {
            NodeLink::Empty => println!("{prefix}- <EMPTY>"),
            NodeLink::Leaf(index) => match &self.members[index] {
                Member::Geometry(g) => println!("{prefix}- L{}: {:?}", index.index(), g.shape()),
                Member::Group(g) => println!("{prefix}- L{}: group of {}", index.index(), g.len()),
            },
            NodeLink::Inner(index) => {
                let node = &self.inner_nodes[index];
                match node.bounding_box {
                    Some(b) => println!("{prefix}- I{}: {:?}-{:?}", index.index(), b.min(), b.max()),
                    None => println!("{prefix}- I{}: unbounded", index.index()),
                }
                for child in node.children {
                    self.print_recursive(indent + 1, child);
                }
            }
        }
    }
}

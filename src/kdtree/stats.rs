use std::fmt::{self, Debug, Display, Write};

use tinyvec::TinyVec;

use crate::kdtree::node::NodeId;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// Shape statistics of a [`KDTree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KDStats {
    node_count: usize,
    max_depth: usize,
}

impl KDStats {
    /// The number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The depth of the deepest node, where the root has depth 0.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<V, N: CoordNum> KDTree<V, N> {
    /// Walk the tree once, counting nodes and measuring its depth.
    pub fn stats(&self) -> KDStats {
        let mut stats = KDStats::default();
        let mut stack: TinyVec<[(NodeId, usize); 32]> = TinyVec::new();
        stack.extend(self.root.map(|root| (root, 0)));

        while let Some((id, depth)) = stack.pop() {
            stats.node_count += 1;
            stats.max_depth = stats.max_depth.max(depth);
            let node = self.nodes.node(id);
            stack.extend(node.lo.map(|lo| (lo, depth + 1)));
            stack.extend(node.hi.map(|hi| (hi, depth + 1)));
        }
        stats
    }

    /// The number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.stats().node_count()
    }

    /// The depth of the tree.
    pub fn depth(&self) -> usize {
        self.stats().max_depth()
    }
}

impl<V: Debug, N: CoordNum> KDTree<V, N> {
    /// Returns a printable listing of the tree, one node per line in `lo`, node, `hi` order.
    ///
    /// Each line is indented by one dot per level of depth and shows the key, the value and the
    /// keys of both children.
    pub fn to_string_tree(&self) -> String {
        let mut out = String::new();
        match self.root {
            None => out.push_str("empty tree"),
            Some(root) => self.write_subtree(&mut out, root),
        }
        out
    }

    fn write_subtree(&self, out: &mut String, root: NodeId) {
        let child_key = |child: Option<NodeId>| match child {
            Some(c) => format!("{:?}", self.nodes.key(c)),
            None => "null".to_string(),
        };

        // In-order walk: the stack holds the ancestors whose `lo` side is being written.
        let mut stack: TinyVec<[(NodeId, usize); 32]> = TinyVec::new();
        let mut next = Some((root, 0));
        loop {
            while let Some((id, depth)) = next {
                stack.push((id, depth));
                next = self.nodes.node(id).lo.map(|lo| (lo, depth + 1));
            }
            let Some((id, depth)) = stack.pop() else {
                break;
            };
            let node = self.nodes.node(id);
            // Writing into a String never fails.
            let _ = writeln!(
                out,
                "{} {:?} v={:?} l/r={}/{}",
                ".".repeat(depth),
                self.nodes.key(id),
                node.value,
                child_key(node.lo),
                child_key(node.hi),
            );
            next = node.hi.map(|hi| (hi, depth + 1));
        }
    }
}

impl<V, N: CoordNum> Display for KDTree<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KDTree;size={};center=", self.size)?;
        match self.root {
            Some(root) => write!(f, "{:?}", self.nodes.key(root)),
            None => write!(f, "null"),
        }
    }
}

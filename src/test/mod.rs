//! Shared helpers for tests across the crate.


use std::sync::Once;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kdtree::node::NodeId;
use crate::kdtree::KDTree;
use crate::r#type::CoordNum;

/// Send `tracing` events to the test output, filtered by `RUST_LOG`.
pub(crate) fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Random integer-valued points in `[0, max)^dims`.
pub(crate) fn random_int_points(n: usize, dims: usize, max: i32, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dims).map(|_| rng.gen_range(0..max) as f64).collect())
        .collect()
}

/// Euclidean distance, summed in the same order as the tree does.
pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0, |acc, (x, y)| {
            let d = x - y;
            acc + d * d
        })
        .sqrt()
}

/// Check the structure of a tree: link shape, size, split dimensions and the ordering of every
/// subtree relative to its ancestors.
pub(crate) fn validate_tree<V, N: CoordNum>(tree: &KDTree<V, N>) {
    let Some(root) = tree.root else {
        assert_eq!(tree.size, 0, "empty tree must have size 0");
        return;
    };
    assert_eq!(tree.nodes.node(root).dim, 0, "root splits on dimension 0");

    // (node, [(ancestor, node is in ancestor's hi side)])
    let mut stack: Vec<(NodeId, Vec<(NodeId, bool)>)> = vec![(root, vec![])];
    let mut count = 0;
    while let Some((id, path)) = stack.pop() {
        count += 1;
        let node = tree.nodes.node(id);
        let key = tree.nodes.key(id);
        for &(ancestor, in_hi) in &path {
            let dim = tree.nodes.node(ancestor).dim;
            let split = tree.nodes.coord(ancestor, dim);
            if in_hi {
                assert!(key[dim] >= split, "hi side below split of {ancestor}");
            } else if tree.invariant_broken {
                assert!(key[dim] <= split, "lo side above split of {ancestor}");
            } else {
                assert!(key[dim] < split, "lo side reaches split of {ancestor}");
            }
        }
        for (child, in_hi) in [(node.lo, false), (node.hi, true)] {
            if let Some(child) = child {
                assert_eq!(
                    tree.nodes.node(child).dim,
                    (node.dim + 1) % tree.dims,
                    "split dimensions cycle with depth"
                );
                let mut child_path = path.clone();
                child_path.push((id, in_hi));
                stack.push((child, child_path));
            }
        }
    }
    assert_eq!(count, tree.size, "reachable nodes match size");
}

use serde::{Deserialize, Serialize};

use crate::crypto::{self, Hash, HASH_SIZE};

// Summary of a peer set merkle tree as exchanged between nodes
// Two peer sets are equal iff their roots match
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodesMerkle {
    pub depth: u32,
    pub nodes_count: u64,
    pub leaves_count: u64,
    pub root: Hash,
}

/// Merkle tree over a set of peer leaves.
///
/// Leaves are sorted and deduplicated before the tree is built so that two
/// nodes holding the same set compute the same root regardless of insertion
/// order. Within a level, nodes are hashed pairwise; an odd trailing node is
/// paired with itself.
#[derive(Clone, Debug)]
pub struct PeersMerkle {
    leaves: Vec<Hash>,
    root: Hash,
    depth: u32,
    nodes_count: u64,
}

impl PeersMerkle {
    pub fn from_leaves(mut leaves: Vec<Hash>) -> Self {
        leaves.sort();
        leaves.dedup();

        if leaves.is_empty() {
            return PeersMerkle {
                leaves,
                root: Hash::zero(),
                depth: 0,
                nodes_count: 0,
            };
        }

        let mut level = leaves.clone();
        let mut depth = 0;
        let mut nodes_count = 0;
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for pair in level.chunks(2) {
                let left = &pair[0];
                // odd node is paired with itself
                let right = if pair.len() == 2 { &pair[1] } else { &pair[0] };
                next.push(hash_pair(left, right));
            }
            nodes_count += next.len() as u64;
            depth += 1;
            level = next;
        }

        let root = level.remove(0);
        PeersMerkle {
            leaves,
            root,
            depth,
            nodes_count,
        }
    }

    pub fn root(&self) -> &Hash {
        &self.root
    }

    pub fn leaves(&self) -> &[Hash] {
        &self.leaves
    }

    pub fn summary(&self) -> NodesMerkle {
        NodesMerkle {
            depth: self.depth,
            nodes_count: self.nodes_count,
            leaves_count: self.leaves.len() as u64,
            root: self.root.clone(),
        }
    }
}

// Hash of the concatenation of two nodes
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut data = Vec::with_capacity(HASH_SIZE * 2);
    data.extend_from_slice(left.as_bytes());
    data.extend_from_slice(right.as_bytes());
    crypto::hash(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(seed: &str) -> Hash {
        crypto::hash(seed.as_bytes())
    }

    #[test]
    fn test_empty_tree() {
        let tree = PeersMerkle::from_leaves(vec![]);
        assert_eq!(*tree.root(), Hash::zero());
        assert_eq!(tree.summary().leaves_count, 0);
        assert_eq!(tree.summary().nodes_count, 0);
    }

    #[test]
    fn test_single_leaf_is_its_own_root() {
        let tree = PeersMerkle::from_leaves(vec![leaf("a")]);
        assert_eq!(*tree.root(), leaf("a"));
        assert_eq!(tree.summary().depth, 0);
    }

    #[test]
    fn test_root_is_order_independent() {
        let forward = PeersMerkle::from_leaves(vec![leaf("a"), leaf("b"), leaf("c")]);
        let backward = PeersMerkle::from_leaves(vec![leaf("c"), leaf("a"), leaf("b")]);
        assert_eq!(forward.root(), backward.root());
        // duplicates do not change the set
        let duplicated =
            PeersMerkle::from_leaves(vec![leaf("a"), leaf("b"), leaf("c"), leaf("b")]);
        assert_eq!(forward.root(), duplicated.root());
    }

    #[test]
    fn test_different_sets_have_different_roots() {
        let left = PeersMerkle::from_leaves(vec![leaf("a"), leaf("b")]);
        let right = PeersMerkle::from_leaves(vec![leaf("a"), leaf("c")]);
        assert_ne!(left.root(), right.root());
    }

    #[test]
    fn test_counts_for_four_leaves() {
        let tree =
            PeersMerkle::from_leaves(vec![leaf("a"), leaf("b"), leaf("c"), leaf("d")]);
        let summary = tree.summary();
        assert_eq!(summary.leaves_count, 4);
        assert_eq!(summary.depth, 2);
        // two intermediate nodes plus the root
        assert_eq!(summary.nodes_count, 3);
    }
}

//! # Sparse Merkle Tree
//!
//! Fixed-depth binary Merkle tree where only non-default nodes are stored.
//!
//! ALGORITHM: each parent is `H(NODE_DOMAIN ‖ left ‖ right)`. An untouched
//! subtree at level `l` hashes to `default_hashes[l]`, so an empty tree of
//! depth 24 costs 25 hashes to build instead of 2^25.
//!
//! Levels are numbered from the leaves: level 0 holds leaves, level `depth`
//! holds the root.

use sha3::{Digest, Keccak256};
use shared_types::Hash;
use std::collections::HashMap;

use super::errors::{TreeError, TreeResult};
use super::value_objects::NODE_DOMAIN;

/// Hash two child nodes into their parent.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update([NODE_DOMAIN]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// A binary sparse Merkle tree.
///
/// ## INVARIANT-1: Default Subtrees
///
/// `nodes` never stores a hash equal to the default for its level; lookups
/// fall back to `default_hashes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMerkleTree {
    depth: u8,
    /// `default_hashes[l]` is the hash of an empty subtree rooted at level `l`.
    default_hashes: Vec<Hash>,
    /// Non-default nodes keyed by (level, index within level).
    nodes: HashMap<(u8, u64), Hash>,
}

impl SparseMerkleTree {
    /// Create an empty tree whose leaves all equal `default_leaf`.
    pub fn new(depth: u8, default_leaf: Hash) -> Self {
        assert!(depth > 0 && depth < 64, "tree depth must be in 1..64");

        let mut default_hashes = Vec::with_capacity(depth as usize + 1);
        default_hashes.push(default_leaf);
        for level in 0..depth as usize {
            let child = default_hashes[level];
            default_hashes.push(hash_pair(&child, &child));
        }

        Self {
            depth,
            default_hashes,
            nodes: HashMap::new(),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of leaf slots.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Current root hash.
    pub fn root(&self) -> Hash {
        self.node(self.depth, 0)
    }

    /// Root of the tree with no leaves set.
    pub fn empty_root(&self) -> Hash {
        self.default_hashes[self.depth as usize]
    }

    /// Leaf hash at `index` (the default leaf if never set).
    pub fn leaf(&self, index: u64) -> TreeResult<Hash> {
        self.check_index(index)?;
        Ok(self.node(0, index))
    }

    /// Set the leaf at `index` and rehash its path to the root.
    pub fn update(&mut self, index: u64, leaf: Hash) -> TreeResult<Hash> {
        self.check_index(index)?;

        let mut idx = index;
        let mut current = leaf;
        self.set_node(0, idx, current);

        for level in 0..self.depth {
            let sibling = self.node(level, idx ^ 1);
            current = if idx & 1 == 0 {
                hash_pair(&current, &sibling)
            } else {
                hash_pair(&sibling, &current)
            };
            idx >>= 1;
            self.set_node(level + 1, idx, current);
        }

        Ok(current)
    }

    /// Sibling hashes from the leaf at `index` up to (excluding) the root.
    pub fn proof(&self, index: u64) -> TreeResult<Vec<Hash>> {
        self.check_index(index)?;

        let mut idx = index;
        let mut siblings = Vec::with_capacity(self.depth as usize);
        for level in 0..self.depth {
            siblings.push(self.node(level, idx ^ 1));
            idx >>= 1;
        }
        Ok(siblings)
    }

    /// Fold a leaf up its sibling path, returning the implied root.
    ///
    /// The index bits select left/right at each level, so a path for one
    /// slot never reproduces the root for another. Returns `None` for an
    /// empty path or an index wider than the path.
    pub fn compute_root(leaf: &Hash, index: u64, siblings: &[Hash]) -> Option<Hash> {
        if siblings.is_empty() || siblings.len() >= 64 || index >> siblings.len() != 0 {
            return None;
        }

        let mut idx = index;
        let mut current = *leaf;
        for sibling in siblings {
            current = if idx & 1 == 0 {
                hash_pair(&current, sibling)
            } else {
                hash_pair(sibling, &current)
            };
            idx >>= 1;
        }
        Some(current)
    }

    /// Recompute the root from a leaf and its sibling path and compare.
    pub fn verify(leaf: &Hash, index: u64, siblings: &[Hash], expected_root: &Hash) -> bool {
        Self::compute_root(leaf, index, siblings).is_some_and(|root| root == *expected_root)
    }

    /// Number of stored (non-default) nodes.
    pub fn stored_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, level: u8, index: u64) -> Hash {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.default_hashes[level as usize])
    }

    fn set_node(&mut self, level: u8, index: u64, hash: Hash) {
        if hash == self.default_hashes[level as usize] {
            self.nodes.remove(&(level, index));
        } else {
            self.nodes.insert((level, index), hash);
        }
    }

    fn check_index(&self, index: u64) -> TreeResult<()> {
        if index >= self.capacity() {
            return Err(TreeError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

//! Fixed-depth append-only commitment tree.
//!
//! Unfilled leaves are `[0; 32]`; an empty subtree of height `h` hashes to
//! `empty_root(h)`. Roots are recomputed on demand, skipping empty subtrees.

use std::collections::HashMap;

use thiserror::Error;
use zsl_circuit::{
    note::{merkle_node, EMPTY_LEAF},
    Hash,
};

use crate::{merkle_path::AuthenticationPath, types::TreeDepth};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("commitment {} is already in the tree", hex::encode(.0))]
    DuplicateCommitment(Hash),
    #[error("tree of depth {0} is full")]
    Full(TreeDepth),
    #[error("commitment {} is not in the tree", hex::encode(.0))]
    UnknownCommitment(Hash),
}

#[derive(Clone, Debug)]
pub struct CommitmentTree {
    depth: TreeDepth,
    leaves: Vec<Hash>,
    positions: HashMap<Hash, u64>,
    empty_roots: Vec<Hash>,
}

impl CommitmentTree {
    pub fn new(depth: TreeDepth) -> Self {
        let mut empty_roots = Vec::with_capacity(depth.get() + 1);
        empty_roots.push(EMPTY_LEAF);
        for height in 1..=depth.get() {
            let below = empty_roots[height - 1];
            empty_roots.push(merkle_node(&below, &below));
        }
        Self {
            depth,
            leaves: Vec::new(),
            positions: HashMap::new(),
            empty_roots,
        }
    }

    pub fn depth(&self) -> TreeDepth {
        self.depth
    }

    pub fn len(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Root of an all-empty subtree of the given height.
    pub fn empty_root(&self, height: usize) -> Option<Hash> {
        self.empty_roots.get(height).copied()
    }

    /// Appends a commitment and returns its position.
    pub fn append(&mut self, commitment: Hash) -> Result<u64, TreeError> {
        if self.positions.contains_key(&commitment) {
            return Err(TreeError::DuplicateCommitment(commitment));
        }
        let position = self.len();
        if position >= self.depth.capacity() {
            return Err(TreeError::Full(self.depth));
        }
        self.leaves.push(commitment);
        self.positions.insert(commitment, position);
        Ok(position)
    }

    pub fn position(&self, commitment: &Hash) -> Option<u64> {
        self.positions.get(commitment).copied()
    }

    pub fn root(&self) -> Hash {
        self.subtree(0, self.depth.get())
    }

    /// Position and leaf-adjacent-first authentication path of a commitment.
    pub fn witness(&self, commitment: &Hash) -> Result<(u64, AuthenticationPath), TreeError> {
        let position = self
            .position(commitment)
            .ok_or(TreeError::UnknownCommitment(*commitment))?;
        let siblings = (0..self.depth.get())
            .map(|height| self.subtree((position >> height) ^ 1, height))
            .collect();
        let path = AuthenticationPath::from_siblings(siblings, self.depth)
            .map_err(|_| TreeError::UnknownCommitment(*commitment))?;
        Ok((position, path))
    }

    /// Hash of the subtree of `height` whose leftmost leaf is `index << height`.
    fn subtree(&self, index: u64, height: usize) -> Hash {
        let first_leaf = u128::from(index) << height;
        if u128::from(self.len()) <= first_leaf {
            return self.empty_roots[height];
        }
        if height == 0 {
            return self.leaves[index as usize];
        }
        merkle_node(
            &self.subtree(index << 1, height - 1),
            &self.subtree((index << 1) + 1, height - 1),
        )
    }
}

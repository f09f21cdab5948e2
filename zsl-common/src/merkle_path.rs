//! Authentication paths as they cross the external boundary: `depth` sibling
//! hashes, leaf-adjacent sibling first.

use zsl_circuit::{
    note::{hash_to_bits, merkle_node},
    Hash, HASH_SIZE,
};

use crate::{
    error::{Result, ZslError},
    types::TreeDepth,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationPath {
    siblings: Vec<Hash>,
}

impl AuthenticationPath {
    /// Splits a flat `depth * 32` byte buffer into sibling hashes.
    pub fn from_flat_bytes(bytes: &[u8], depth: TreeDepth) -> Result<Self> {
        let expected = depth.get() * HASH_SIZE;
        if bytes.len() != expected {
            return Err(ZslError::SizeMismatch {
                what: "authentication path",
                expected,
                actual: bytes.len(),
            });
        }
        let siblings = bytes
            .chunks_exact(HASH_SIZE)
            .map(|chunk| {
                let mut hash = [0u8; HASH_SIZE];
                hash.copy_from_slice(chunk);
                hash
            })
            .collect();
        Ok(Self { siblings })
    }

    pub fn from_siblings(siblings: Vec<Hash>, depth: TreeDepth) -> Result<Self> {
        if siblings.len() != depth.get() {
            return Err(ZslError::SizeMismatch {
                what: "authentication path",
                expected: depth.get() * HASH_SIZE,
                actual: siblings.len() * HASH_SIZE,
            });
        }
        Ok(Self { siblings })
    }

    /// Path of a note whose siblings are all empty leaves.
    pub fn zeros(depth: TreeDepth) -> Self {
        Self {
            siblings: vec![[0u8; HASH_SIZE]; depth.get()],
        }
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Leaf-adjacent first.
    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    pub fn to_flat_bytes(&self) -> Vec<u8> {
        self.siblings.concat()
    }

    /// Circuit form: one 256-bit vector per level (most significant bit of
    /// each byte first), root-adjacent level first.
    pub fn to_bit_vectors(&self) -> Vec<Vec<bool>> {
        self.siblings.iter().rev().map(hash_to_bits).collect()
    }

    /// Root of the tree containing `leaf` at `position`. Bit `h` of the
    /// position set means the running node is the right child at height `h`.
    pub fn compute_root(&self, leaf: &Hash, position: u64) -> Hash {
        self.siblings
            .iter()
            .enumerate()
            .fold(*leaf, |node, (height, sibling)| {
                if (position >> height) & 1 == 1 {
                    merkle_node(sibling, &node)
                } else {
                    merkle_node(&node, sibling)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zsl_circuit::note::{bits_to_hash, root_from_auth_path};

    fn depth(d: usize) -> TreeDepth {
        TreeDepth::new(d).unwrap()
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(AuthenticationPath::from_flat_bytes(&[0u8; 95], depth(3)).is_err());
        assert!(AuthenticationPath::from_flat_bytes(&[0u8; 128], depth(3)).is_err());
        assert!(AuthenticationPath::from_siblings(vec![[0u8; 32]; 2], depth(3)).is_err());
        assert_eq!(
            AuthenticationPath::from_flat_bytes(&[0u8; 96], depth(3))
                .unwrap()
                .depth(),
            3
        );
    }

    #[test]
    fn bit_vectors_are_root_first_msb_first() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0x80; // leaf-adjacent sibling, first bit
        bytes[63] = 0x01; // root-adjacent sibling, last bit
        let path = AuthenticationPath::from_flat_bytes(&bytes, depth(2)).unwrap();
        let bits = path.to_bit_vectors();
        assert_eq!(bits.len(), 2);
        assert!(bits[0][255]);
        assert!(bits[1][0]);
        assert_eq!(bits.iter().flatten().filter(|b| **b).count(), 2);
    }

    #[test]
    fn flat_buffer_round_trips() {
        let bytes: Vec<u8> = (0..96u8).collect();
        let path = AuthenticationPath::from_flat_bytes(&bytes, depth(3)).unwrap();
        assert_eq!(path.siblings()[0][0], 0);
        assert_eq!(path.siblings()[2][0], 64);
        assert_eq!(path.to_flat_bytes(), bytes);
    }

    proptest! {
        #[test]
        fn reversal_restores_siblings(raw in proptest::collection::vec(any::<[u8; 32]>(), 1..8)) {
            let d = raw.len();
            let path = AuthenticationPath::from_siblings(raw.clone(), depth(d)).unwrap();
            let mut bits = path.to_bit_vectors();
            bits.reverse();
            let recovered: Vec<Hash> = bits.iter().map(|level| bits_to_hash(level).unwrap()).collect();
            prop_assert_eq!(recovered, raw);
        }

        #[test]
        fn native_fold_agrees_with_circuit_form(
            raw in proptest::collection::vec(any::<[u8; 32]>(), 1..6),
            leaf in any::<[u8; 32]>(),
            position in any::<u64>(),
        ) {
            let d = raw.len();
            let position = position % (1u64 << d);
            let path = AuthenticationPath::from_siblings(raw, depth(d)).unwrap();
            prop_assert_eq!(
                Ok(path.compute_root(&leaf, position)),
                root_from_auth_path(&leaf, &path.to_bit_vectors(), position)
            );
        }
    }
}

// zsl-circuit/src/note.rs

//! Native SHA-256 note primitives. Each function has a constraint twin in
//! [`crate::gadgets`] and the two must agree byte for byte.
//!
//! Note hashes use full SHA-256. Merkle nodes use the bare compression
//! function over one 64-byte block, with no padding.

use sha2::{digest::generic_array::GenericArray, Digest, Sha256};

use crate::{CircuitError, Hash, HASH_BITS};

/// Initial hash value H(0) from FIPS 180-4, section 5.3.3.
pub const SHA256_IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

pub const SHA256_BLOCK_SIZE: usize = 64;

pub const SEND_NULLIFIER_PREFIX: u8 = 0x00;
pub const SPEND_NULLIFIER_PREFIX: u8 = 0x01;

pub const EMPTY_LEAF: Hash = [0u8; 32];

pub fn derive_pk(sk: &Hash) -> Hash {
    Sha256::digest(sk).into()
}

pub fn note_commitment(rho: &Hash, pk: &Hash, value: u64) -> Hash {
    Sha256::new()
        .chain_update(rho)
        .chain_update(pk)
        .chain_update(value.to_le_bytes())
        .finalize()
        .into()
}

pub fn send_nullifier(rho: &Hash) -> Hash {
    Sha256::new()
        .chain_update([SEND_NULLIFIER_PREFIX])
        .chain_update(rho)
        .finalize()
        .into()
}

pub fn spend_nullifier(rho: &Hash, sk: &Hash) -> Hash {
    Sha256::new()
        .chain_update([SPEND_NULLIFIER_PREFIX])
        .chain_update(rho)
        .chain_update(sk)
        .finalize()
        .into()
}

/// One SHA-256 compression of `block` starting from [`SHA256_IV`]. The state
/// words are written out big-endian.
pub fn sha256_compress(block: &[u8; SHA256_BLOCK_SIZE]) -> Hash {
    let mut state = SHA256_IV;
    sha2::compress256(&mut state, &[GenericArray::clone_from_slice(block)]);
    let mut out = [0u8; 32];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

pub fn merkle_node(left: &Hash, right: &Hash) -> Hash {
    let mut block = [0u8; SHA256_BLOCK_SIZE];
    block[..32].copy_from_slice(left);
    block[32..].copy_from_slice(right);
    sha256_compress(&block)
}

/// Expands a hash into bits, most significant bit of each byte first.
pub fn hash_to_bits(hash: &Hash) -> Vec<bool> {
    hash.iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Inverse of [`hash_to_bits`]; `None` unless exactly 256 bits are given.
pub fn bits_to_hash(bits: &[bool]) -> Option<Hash> {
    if bits.len() != HASH_BITS {
        return None;
    }
    let mut out = [0u8; 32];
    for (byte, chunk) in out.iter_mut().zip(bits.chunks(8)) {
        *byte = chunk.iter().fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit));
    }
    Some(out)
}

/// Checks an authentication path in circuit form (root-adjacent level first,
/// 256 bits per level) against the expected depth and position.
pub fn check_auth_path(
    auth_path: &[Vec<bool>],
    position: u64,
    tree_depth: usize,
) -> Result<(), CircuitError> {
    crate::check_tree_depth(tree_depth)?;
    if auth_path.len() != tree_depth {
        return Err(CircuitError::PathLength {
            expected: tree_depth,
            actual: auth_path.len(),
        });
    }
    if let Some((level, bits)) = auth_path
        .iter()
        .enumerate()
        .find(|(_, bits)| bits.len() != HASH_BITS)
    {
        return Err(CircuitError::PathEntryWidth {
            level,
            actual: bits.len(),
        });
    }
    if tree_depth < 64 && position >> tree_depth != 0 {
        return Err(CircuitError::PositionOutOfRange {
            position,
            depth: tree_depth,
        });
    }
    Ok(())
}

/// Folds a circuit-form authentication path up to the root. The path is
/// checked first, with its own length as the tree depth.
pub fn root_from_auth_path(
    leaf: &Hash,
    auth_path: &[Vec<bool>],
    position: u64,
) -> Result<Hash, CircuitError> {
    let depth = auth_path.len();
    check_auth_path(auth_path, position, depth)?;
    let mut node = *leaf;
    for (height, level) in auth_path.iter().rev().enumerate() {
        let sibling = bits_to_hash(level).ok_or(CircuitError::PathEntryWidth {
            level: depth - 1 - height,
            actual: level.len(),
        })?;
        node = if (position >> height) & 1 == 1 {
            merkle_node(&sibling, &node)
        } else {
            merkle_node(&node, &sibling)
        };
    }
    Ok(node)
}

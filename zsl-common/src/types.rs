use std::fmt;

use serde::{Deserialize, Serialize};
use zsl_circuit::{DEFAULT_TREE_DEPTH, MAX_TREE_DEPTH};

use crate::error::{Result, ZslError};

/// Compressed Groth16 proof over BN254: `A` (G1), `B` (G2), `C` (G1).
pub const PROOF_SIZE: usize = 32 + 64 + 32;

/// Depth of the note commitment tree. Fixed for the lifetime of a key store
/// since it determines the shape of every spending circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TreeDepth(usize);

impl TreeDepth {
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(ZslError::InvalidInput(format!(
                "tree depth {depth} is outside 1..={MAX_TREE_DEPTH}"
            )));
        }
        Ok(Self(depth))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of leaves the tree can hold, saturating at `u64::MAX` for the
    /// 64-level tree.
    pub fn capacity(self) -> u64 {
        1u64.checked_shl(self.0 as u32).unwrap_or(u64::MAX)
    }
}

impl Default for TreeDepth {
    fn default() -> Self {
        Self(DEFAULT_TREE_DEPTH)
    }
}

impl TryFrom<usize> for TreeDepth {
    type Error = ZslError;

    fn try_from(depth: usize) -> Result<Self> {
        Self::new(depth)
    }
}

impl From<TreeDepth> for usize {
    fn from(depth: TreeDepth) -> usize {
        depth.0
    }
}

impl fmt::Display for TreeDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A proof in its fixed-size wire form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedProof([u8; PROOF_SIZE]);

impl EncodedProof {
    pub fn from_bytes(bytes: [u8; PROOF_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PROOF_SIZE] =
            bytes.try_into().map_err(|_| ZslError::SizeMismatch {
                what: "proof",
                expected: PROOF_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PROOF_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; PROOF_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for EncodedProof {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncodedProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedProof({})", hex::encode(self.0))
    }
}

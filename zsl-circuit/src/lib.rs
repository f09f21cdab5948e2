// zsl-circuit/src/lib.rs

//! R1CS circuits for the three ZSL transaction kinds.
//!
//! Every circuit hashes with SHA-256 and exposes its public inputs as packed
//! field elements. The same hashing is available natively in [`note`] so callers
//! can derive the public side of a statement without touching constraints.

pub mod gadgets;
pub mod note;
pub mod shielding;
pub mod transfer;
pub mod unshielding;

use std::fmt;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_relations::r1cs::ConstraintSynthesizer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use shielding::{ShieldingCircuit, ShieldingPublicInputs};
pub use transfer::{TransferCircuit, TransferPublicInputs, TransferWitness};
pub use unshielding::{UnshieldingCircuit, UnshieldingPublicInputs};

pub const HASH_SIZE: usize = 32;
pub const HASH_BITS: usize = HASH_SIZE * 8;
pub const DEFAULT_TREE_DEPTH: usize = 29;
pub const MAX_TREE_DEPTH: usize = 64;

/// Bytes packed into one public field element: the largest whole number of
/// bytes strictly below the modulus size.
pub const PACKED_BYTES_PER_ELEMENT: usize = ((Fr::MODULUS_BIT_SIZE - 1) / 8) as usize;

pub type Hash = [u8; HASH_SIZE];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitKind {
    Shielding,
    Unshielding,
    Transfer,
}

impl CircuitKind {
    pub const ALL: [CircuitKind; 3] = [
        CircuitKind::Shielding,
        CircuitKind::Unshielding,
        CircuitKind::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitKind::Shielding => "shielding",
            CircuitKind::Unshielding => "unshielding",
            CircuitKind::Transfer => "transfer",
        }
    }

    /// Number of packed field elements the verifier receives for this kind.
    pub fn public_input_count(&self) -> usize {
        let hash_elements = packed_len(HASH_SIZE);
        let value_elements = packed_len(8);
        match self {
            CircuitKind::Shielding | CircuitKind::Unshielding => 2 * hash_elements + value_elements,
            CircuitKind::Transfer => 7 * hash_elements,
        }
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error("authentication path has {actual} levels, expected {expected}")]
    PathLength { expected: usize, actual: usize },
    #[error("authentication path level {level} has {actual} bits, expected {HASH_BITS}")]
    PathEntryWidth { level: usize, actual: usize },
    #[error("tree position {position} does not fit in a depth-{depth} tree")]
    PositionOutOfRange { position: u64, depth: usize },
    #[error("tree depth {0} is outside 1..={MAX_TREE_DEPTH}")]
    TreeDepth(usize),
}

/// A transaction circuit: constraint emission comes from
/// [`ConstraintSynthesizer`], witness computation from [`ZslCircuit::new`] and
/// the public-input vector from [`ZslCircuit::public_inputs`].
pub trait ZslCircuit: ConstraintSynthesizer<Fr> + Clone {
    const KIND: CircuitKind;

    type Witness;
    type Public: PublicInputs;

    fn new(witness: Self::Witness, tree_depth: usize) -> Result<Self, CircuitError>;

    /// Circuit with all-zero values, used to fix the constraint system shape
    /// during key generation.
    fn blank(tree_depth: usize) -> Self;

    fn public_inputs(&self) -> &Self::Public;
}

/// The public half of a statement, independent of any secret witness.
pub trait PublicInputs: Clone + fmt::Debug {
    const KIND: CircuitKind;

    /// Field elements in the exact order the circuit allocates its inputs.
    fn to_field_elements(&self) -> Vec<Fr>;
}

/// Mirrors the packing performed by `UInt8::new_input_vec`: little-endian
/// chunks of [`PACKED_BYTES_PER_ELEMENT`] bytes.
pub fn pack_bytes(bytes: &[u8]) -> Vec<Fr> {
    bytes
        .chunks(PACKED_BYTES_PER_ELEMENT)
        .map(Fr::from_le_bytes_mod_order)
        .collect()
}

fn packed_len(bytes: usize) -> usize {
    bytes.div_ceil(PACKED_BYTES_PER_ELEMENT)
}

pub(crate) fn check_tree_depth(tree_depth: usize) -> Result<(), CircuitError> {
    if tree_depth == 0 || tree_depth > MAX_TREE_DEPTH {
        return Err(CircuitError::TreeDepth(tree_depth));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::ToConstraintField;

    #[test]
    fn pack_bytes_matches_arkworks_packing() {
        let bytes: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(37)).collect();
        let expected: Vec<Fr> = bytes.to_field_elements().unwrap();
        assert_eq!(pack_bytes(&bytes), expected);
        assert_eq!(pack_bytes(&bytes).len(), 2);
        assert_eq!(pack_bytes(&42u64.to_le_bytes()).len(), 1);
    }

    #[test]
    fn public_input_counts() {
        assert_eq!(CircuitKind::Shielding.public_input_count(), 5);
        assert_eq!(CircuitKind::Unshielding.public_input_count(), 5);
        assert_eq!(CircuitKind::Transfer.public_input_count(), 14);
    }

    #[test]
    fn tree_depth_bounds() {
        assert_eq!(check_tree_depth(0), Err(CircuitError::TreeDepth(0)));
        assert!(check_tree_depth(1).is_ok());
        assert!(check_tree_depth(MAX_TREE_DEPTH).is_ok());
        assert!(check_tree_depth(MAX_TREE_DEPTH + 1).is_err());
    }
}

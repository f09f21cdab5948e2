// zsl-circuit/src/unshielding.rs

use ark_bn254::Fr;
use ark_r1cs_std::uint8::UInt8;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use serde::{Deserialize, Serialize};

use crate::{
    gadgets::{enforce_bytes_equal, note, value},
    note::{check_auth_path, derive_pk, note_commitment, root_from_auth_path, spend_nullifier},
    pack_bytes, CircuitError, CircuitKind, Hash, PublicInputs, ZslCircuit, HASH_BITS,
};

/// Everything needed to open a committed note: its secrets, value and
/// membership path. `auth_path` is root-adjacent level first, 256 bits per
/// level, most significant bit of each byte first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendWitness {
    pub rho: Hash,
    pub sk: Hash,
    pub value: u64,
    pub tree_position: u64,
    pub auth_path: Vec<Vec<bool>>,
}

impl SpendWitness {
    /// The value-zero note at position zero with an all-zero path.
    pub fn blank(tree_depth: usize) -> Self {
        Self {
            rho: [0u8; 32],
            sk: [0u8; 32],
            value: 0,
            tree_position: 0,
            auth_path: vec![vec![false; HASH_BITS]; tree_depth],
        }
    }

    pub fn commitment(&self) -> Hash {
        note_commitment(&self.rho, &derive_pk(&self.sk), self.value)
    }

    pub fn spend_nullifier(&self) -> Hash {
        spend_nullifier(&self.rho, &self.sk)
    }

    pub fn check(&self, tree_depth: usize) -> Result<(), CircuitError> {
        check_auth_path(&self.auth_path, self.tree_position, tree_depth)
    }

    /// Root reached by folding the path from this note's commitment.
    pub fn anchor(&self) -> Result<Hash, CircuitError> {
        root_from_auth_path(&self.commitment(), &self.auth_path, self.tree_position)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnshieldingPublicInputs {
    pub spend_nullifier: Hash,
    pub anchor: Hash,
    pub value: u64,
}

impl PublicInputs for UnshieldingPublicInputs {
    const KIND: CircuitKind = CircuitKind::Unshielding;

    fn to_field_elements(&self) -> Vec<Fr> {
        let mut out = pack_bytes(&self.spend_nullifier);
        out.extend(pack_bytes(&self.anchor));
        out.extend(pack_bytes(&self.value.to_le_bytes()));
        out
    }
}

/// Proves ownership of a note of `value` that is a member of the tree with
/// root `anchor`, and that `spend_nullifier` belongs to it.
#[derive(Clone, Debug)]
pub struct UnshieldingCircuit {
    spend: SpendWitness,
    public: UnshieldingPublicInputs,
}

impl ZslCircuit for UnshieldingCircuit {
    const KIND: CircuitKind = CircuitKind::Unshielding;

    type Witness = SpendWitness;
    type Public = UnshieldingPublicInputs;

    fn new(spend: SpendWitness, tree_depth: usize) -> Result<Self, CircuitError> {
        spend.check(tree_depth)?;
        let public = UnshieldingPublicInputs {
            spend_nullifier: spend.spend_nullifier(),
            anchor: spend.anchor()?,
            value: spend.value,
        };
        Ok(Self { spend, public })
    }

    fn blank(tree_depth: usize) -> Self {
        Self {
            spend: SpendWitness::blank(tree_depth),
            public: UnshieldingPublicInputs {
                spend_nullifier: [0u8; 32],
                anchor: [0u8; 32],
                value: 0,
            },
        }
    }

    fn public_inputs(&self) -> &UnshieldingPublicInputs {
        &self.public
    }
}

impl UnshieldingCircuit {
    pub fn with_public_inputs(mut self, public: UnshieldingPublicInputs) -> Self {
        self.public = public;
        self
    }
}

impl ConstraintSynthesizer<Fr> for UnshieldingCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let spend_nullifier = UInt8::new_input_vec(cs.clone(), &self.public.spend_nullifier)?;
        let anchor = UInt8::new_input_vec(cs.clone(), &self.public.anchor)?;
        let value = value::alloc_input(cs.clone(), self.public.value)?;

        let spent = note::spend(cs, &self.spend, &value)?;
        enforce_bytes_equal(&spent.spend_nullifier, &spend_nullifier)?;
        enforce_bytes_equal(&spent.root, &anchor)?;
        Ok(())
    }
}

// zsl-circuit/src/shielding.rs

use ark_bn254::Fr;
use ark_r1cs_std::uint8::UInt8;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use serde::{Deserialize, Serialize};

use crate::{
    gadgets::{enforce_bytes_equal, note, value},
    note::{note_commitment, send_nullifier},
    pack_bytes, CircuitError, CircuitKind, Hash, PublicInputs, ZslCircuit,
};

/// A note being created: its randomness, owner key and value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputNote {
    pub rho: Hash,
    pub pk: Hash,
    pub value: u64,
}

impl OutputNote {
    pub fn send_nullifier(&self) -> Hash {
        send_nullifier(&self.rho)
    }

    pub fn commitment(&self) -> Hash {
        note_commitment(&self.rho, &self.pk, self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldingPublicInputs {
    pub send_nullifier: Hash,
    pub commitment: Hash,
    pub value: u64,
}

impl PublicInputs for ShieldingPublicInputs {
    const KIND: CircuitKind = CircuitKind::Shielding;

    fn to_field_elements(&self) -> Vec<Fr> {
        let mut out = pack_bytes(&self.send_nullifier);
        out.extend(pack_bytes(&self.commitment));
        out.extend(pack_bytes(&self.value.to_le_bytes()));
        out
    }
}

/// Proves that `commitment` opens to a note of `value` whose send nullifier
/// is `send_nullifier`.
#[derive(Clone, Debug)]
pub struct ShieldingCircuit {
    note: OutputNote,
    public: ShieldingPublicInputs,
}

impl ZslCircuit for ShieldingCircuit {
    const KIND: CircuitKind = CircuitKind::Shielding;

    type Witness = OutputNote;
    type Public = ShieldingPublicInputs;

    fn new(note: OutputNote, _tree_depth: usize) -> Result<Self, CircuitError> {
        let public = ShieldingPublicInputs {
            send_nullifier: note.send_nullifier(),
            commitment: note.commitment(),
            value: note.value,
        };
        Ok(Self { note, public })
    }

    fn blank(_tree_depth: usize) -> Self {
        Self {
            note: OutputNote::default(),
            public: ShieldingPublicInputs {
                send_nullifier: [0u8; 32],
                commitment: [0u8; 32],
                value: 0,
            },
        }
    }

    fn public_inputs(&self) -> &ShieldingPublicInputs {
        &self.public
    }
}

impl ShieldingCircuit {
    /// Replaces the claimed public inputs while keeping the witness. Used to
    /// check that a mismatched statement is unsatisfiable.
    pub fn with_public_inputs(mut self, public: ShieldingPublicInputs) -> Self {
        self.public = public;
        self
    }
}

impl ConstraintSynthesizer<Fr> for ShieldingCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let send_nullifier = UInt8::new_input_vec(cs.clone(), &self.public.send_nullifier)?;
        let commitment = UInt8::new_input_vec(cs.clone(), &self.public.commitment)?;
        let value = value::alloc_input(cs.clone(), self.public.value)?;

        let created = note::create(cs, &self.note, &value)?;
        enforce_bytes_equal(&created.send_nullifier, &send_nullifier)?;
        enforce_bytes_equal(&created.commitment, &commitment)?;
        Ok(())
    }
}

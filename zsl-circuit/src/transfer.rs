// zsl-circuit/src/transfer.rs

use ark_bn254::Fr;
use ark_r1cs_std::{eq::EqGadget, uint8::UInt8};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use serde::{Deserialize, Serialize};

use crate::{
    gadgets::{enforce_bytes_equal, note, value},
    pack_bytes,
    shielding::OutputNote,
    unshielding::SpendWitness,
    CircuitError, CircuitKind, Hash, PublicInputs, ZslCircuit,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferWitness {
    pub inputs: [SpendWitness; 2],
    pub outputs: [OutputNote; 2],
}

impl TransferWitness {
    pub fn blank(tree_depth: usize) -> Self {
        Self {
            inputs: [SpendWitness::blank(tree_depth), SpendWitness::blank(tree_depth)],
            outputs: [OutputNote::default(), OutputNote::default()],
        }
    }

    /// Root the spent notes are proven against. Zero-value inputs are
    /// dummies, so the first input carrying value decides.
    pub fn anchor(&self) -> Result<Hash, CircuitError> {
        self.inputs
            .iter()
            .find(|input| input.value != 0)
            .unwrap_or(&self.inputs[0])
            .anchor()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPublicInputs {
    pub anchor: Hash,
    pub spend_nullifiers: [Hash; 2],
    pub send_nullifiers: [Hash; 2],
    pub commitments: [Hash; 2],
}

impl PublicInputs for TransferPublicInputs {
    const KIND: CircuitKind = CircuitKind::Transfer;

    fn to_field_elements(&self) -> Vec<Fr> {
        std::iter::once(&self.anchor)
            .chain(&self.spend_nullifiers)
            .chain(&self.send_nullifiers)
            .chain(&self.commitments)
            .flat_map(|hash| pack_bytes(hash))
            .collect()
    }
}

/// Spends two notes and creates two.
///
/// Constraints:
/// - each input with a non-zero value is a member of the tree at `anchor`;
///   zero-value inputs are dummies and skip the membership check,
/// - each input's spend nullifier and each output's send nullifier and
///   commitment match the public inputs,
/// - the two spend nullifiers differ,
/// - input values sum to output values.
#[derive(Clone, Debug)]
pub struct TransferCircuit {
    witness: TransferWitness,
    public: TransferPublicInputs,
}

impl ZslCircuit for TransferCircuit {
    const KIND: CircuitKind = CircuitKind::Transfer;

    type Witness = TransferWitness;
    type Public = TransferPublicInputs;

    fn new(witness: TransferWitness, tree_depth: usize) -> Result<Self, CircuitError> {
        for input in &witness.inputs {
            input.check(tree_depth)?;
        }
        let [in1, in2] = &witness.inputs;
        let [out1, out2] = &witness.outputs;
        let public = TransferPublicInputs {
            anchor: witness.anchor()?,
            spend_nullifiers: [in1.spend_nullifier(), in2.spend_nullifier()],
            send_nullifiers: [out1.send_nullifier(), out2.send_nullifier()],
            commitments: [out1.commitment(), out2.commitment()],
        };
        Ok(Self { witness, public })
    }

    fn blank(tree_depth: usize) -> Self {
        Self {
            witness: TransferWitness::blank(tree_depth),
            public: TransferPublicInputs {
                anchor: [0u8; 32],
                spend_nullifiers: [[0u8; 32]; 2],
                send_nullifiers: [[0u8; 32]; 2],
                commitments: [[0u8; 32]; 2],
            },
        }
    }

    fn public_inputs(&self) -> &TransferPublicInputs {
        &self.public
    }
}

impl TransferCircuit {
    pub fn with_public_inputs(mut self, public: TransferPublicInputs) -> Self {
        self.public = public;
        self
    }
}

impl ConstraintSynthesizer<Fr> for TransferCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let public = &self.public;
        let anchor = UInt8::new_input_vec(cs.clone(), &public.anchor)?;
        let mut spend_nullifiers = Vec::with_capacity(2);
        for nf in &public.spend_nullifiers {
            spend_nullifiers.push(UInt8::new_input_vec(cs.clone(), nf)?);
        }
        let mut send_nullifiers = Vec::with_capacity(2);
        for nf in &public.send_nullifiers {
            send_nullifiers.push(UInt8::new_input_vec(cs.clone(), nf)?);
        }
        let mut commitments = Vec::with_capacity(2);
        for cm in &public.commitments {
            commitments.push(UInt8::new_input_vec(cs.clone(), cm)?);
        }

        let mut spent = Vec::with_capacity(2);
        for (input, expected_nf) in self.witness.inputs.iter().zip(&spend_nullifiers) {
            let value = value::alloc_witness(cs.clone(), input.value)?;
            let note = note::spend(cs.clone(), input, &value)?;
            enforce_bytes_equal(&note.spend_nullifier, expected_nf)?;
            note.root
                .as_slice()
                .conditional_enforce_equal(anchor.as_slice(), &note.is_nonzero)?;
            spent.push(note);
        }
        spent[0]
            .spend_nullifier
            .as_slice()
            .enforce_not_equal(spent[1].spend_nullifier.as_slice())?;

        let mut created = Vec::with_capacity(2);
        for ((output, expected_nf), expected_cm) in self
            .witness
            .outputs
            .iter()
            .zip(&send_nullifiers)
            .zip(&commitments)
        {
            let value = value::alloc_witness(cs.clone(), output.value)?;
            let note = note::create(cs.clone(), output, &value)?;
            enforce_bytes_equal(&note.send_nullifier, expected_nf)?;
            enforce_bytes_equal(&note.commitment, expected_cm)?;
            created.push(note);
        }

        let spent_total = &spent[0].value + &spent[1].value;
        let created_total = &created[0].value + &created[1].value;
        spent_total.enforce_equal(&created_total)?;
        Ok(())
    }
}

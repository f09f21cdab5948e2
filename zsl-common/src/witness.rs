//! Typed transaction requests and the circuits they build.

use zsl_circuit::{
    shielding::OutputNote, transfer::TransferWitness, CircuitKind, ShieldingCircuit,
    TransferCircuit, UnshieldingCircuit, ZslCircuit,
};

use crate::{
    error::{Result, ZslError},
    note::{Note, SpendInput},
    types::TreeDepth,
};

/// Transaction fields that can be turned into a circuit for a given tree
/// depth. The circuit carries both the witness and the public inputs.
pub trait TransactionWitness {
    type Circuit: ZslCircuit;

    const KIND: CircuitKind = <Self::Circuit as ZslCircuit>::KIND;

    fn build_circuit(&self, depth: TreeDepth) -> Result<Self::Circuit>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShieldingRequest(pub Note);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnshieldingRequest(pub SpendInput);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub inputs: [SpendInput; 2],
    pub outputs: [Note; 2],
}

impl TransactionWitness for ShieldingRequest {
    type Circuit = ShieldingCircuit;

    fn build_circuit(&self, depth: TreeDepth) -> Result<ShieldingCircuit> {
        Ok(ShieldingCircuit::new(OutputNote::from(&self.0), depth.get())?)
    }
}

impl TransactionWitness for UnshieldingRequest {
    type Circuit = UnshieldingCircuit;

    fn build_circuit(&self, depth: TreeDepth) -> Result<UnshieldingCircuit> {
        ensure_path_depth(&self.0, depth)?;
        Ok(UnshieldingCircuit::new(self.0.to_witness(), depth.get())?)
    }
}

impl TransactionWitness for TransferRequest {
    type Circuit = TransferCircuit;

    fn build_circuit(&self, depth: TreeDepth) -> Result<TransferCircuit> {
        for input in &self.inputs {
            ensure_path_depth(input, depth)?;
        }
        let witness = TransferWitness {
            inputs: [self.inputs[0].to_witness(), self.inputs[1].to_witness()],
            outputs: [
                OutputNote::from(&self.outputs[0]),
                OutputNote::from(&self.outputs[1]),
            ],
        };
        Ok(TransferCircuit::new(witness, depth.get())?)
    }
}

fn ensure_path_depth(input: &SpendInput, depth: TreeDepth) -> Result<()> {
    if input.auth_path.depth() != depth.get() {
        return Err(ZslError::TreeDepthMismatch {
            expected: depth.get(),
            actual: input.auth_path.depth(),
        });
    }
    Ok(())
}

// zsl-prover/src/lib.rs

pub mod paramgen;

use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, OptimizationGoal};
use ark_snark::SNARK;
use rand::rngs::OsRng;
use tracing::debug;

use zsl_circuit::ZslCircuit;
use zsl_common::{
    encode_proof, CircuitKeys, CircuitKind, EncodedProof, KeyStore, Note, Result,
    ShieldingRequest, SpendInput, TransactionWitness, TransferRequest, UnshieldingRequest,
    ZslError,
};

pub use paramgen::{
    generate_parameters, generate_shielding_parameters, generate_transfer_parameters,
    generate_unshielding_parameters, load_or_generate, setup, ParameterSet,
};

pub type PublicOf<T> = <<T as TransactionWitness>::Circuit as ZslCircuit>::Public;

/// Size of a synthesized constraint system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitShape {
    pub num_constraints: usize,
    pub num_instance_variables: usize,
    pub num_witness_variables: usize,
}

pub fn prove<T: TransactionWitness>(store: &KeyStore, request: &T) -> Result<EncodedProof> {
    prove_with_public_inputs(store, request).map(|(proof, _)| proof)
}

/// Proves `request` and returns the public inputs a verifier needs alongside
/// the proof.
pub fn prove_with_public_inputs<T: TransactionWitness>(
    store: &KeyStore,
    request: &T,
) -> Result<(EncodedProof, PublicOf<T>)> {
    let kind = T::KIND;
    let circuit = request.build_circuit(store.tree_depth())?;
    let public = circuit.public_inputs().clone();
    let shape = check_witness(circuit.clone())?;

    let pk = store.proving_key(kind)?;
    ensure_key_fits(kind, store.keys(kind)?, pk, shape)?;

    let started = Instant::now();
    let proof = Groth16::<Bn254>::prove(pk, circuit, &mut OsRng)?;
    let encoded = encode_proof(&proof)?;
    debug!(
        circuit = %kind,
        constraints = shape.num_constraints,
        elapsed_ms = started.elapsed().as_millis() as u64,
        proof = %hex::encode(encoded.as_bytes()),
        "generated proof"
    );
    Ok((encoded, public))
}

pub fn prove_shielding(store: &KeyStore, note: &Note) -> Result<EncodedProof> {
    prove(store, &ShieldingRequest(note.clone()))
}

pub fn prove_unshielding(store: &KeyStore, input: &SpendInput) -> Result<EncodedProof> {
    prove(store, &UnshieldingRequest(input.clone()))
}

pub fn prove_transfer(
    store: &KeyStore,
    inputs: &[SpendInput; 2],
    outputs: &[Note; 2],
) -> Result<EncodedProof> {
    prove(
        store,
        &TransferRequest {
            inputs: inputs.clone(),
            outputs: outputs.clone(),
        },
    )
}

/// Synthesizes `circuit` and checks that its witness satisfies every
/// constraint. A failure names the first unsatisfied constraint.
pub fn check_witness<C: ZslCircuit>(circuit: C) -> Result<CircuitShape> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    circuit.generate_constraints(cs.clone())?;
    if !cs.is_satisfied()? {
        let constraint = cs
            .which_is_unsatisfied()?
            .unwrap_or_else(|| "<unnamed>".to_string());
        return Err(ZslError::UnsatisfiedWitness {
            kind: C::KIND,
            constraint,
        });
    }
    Ok(CircuitShape {
        num_constraints: cs.num_constraints(),
        num_instance_variables: cs.num_instance_variables(),
        num_witness_variables: cs.num_witness_variables(),
    })
}

fn ensure_key_fits(
    kind: CircuitKind,
    keys: &CircuitKeys,
    pk: &ProvingKey<Bn254>,
    shape: CircuitShape,
) -> Result<()> {
    keys.ensure_shape(kind)?;
    let variables = shape.num_instance_variables + shape.num_witness_variables;
    if pk.a_query.len() != variables {
        return Err(ZslError::KeyMismatch {
            kind,
            reason: format!(
                "proving key covers {} variables, circuit has {variables}",
                pk.a_query.len()
            ),
        });
    }
    Ok(())
}

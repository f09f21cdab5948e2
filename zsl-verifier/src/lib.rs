// zsl-verifier/src/lib.rs

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_relations::r1cs::SynthesisError;
use ark_snark::SNARK;
use tracing::debug;

use zsl_circuit::PublicInputs;
use zsl_common::{
    decode_proof, EncodedProof, Hash, KeyStore, Result, ShieldingPublicInputs,
    TransferPublicInputs, UnshieldingPublicInputs, ZslError,
};

/// Checks `proof` against `public` with the verifying key of `P::KIND`.
///
/// Only missing key material is an error. A proof whose bytes do not decode to
/// curve points, or a key built for a different circuit, is `Ok(false)`.
pub fn verify<P: PublicInputs>(store: &KeyStore, public: &P, proof: &EncodedProof) -> Result<bool> {
    let kind = P::KIND;
    let pvk = store.prepared_verifying_key(kind)?;
    let proof = match decode_proof(proof) {
        Ok(proof) => proof,
        Err(ZslError::MalformedProof(reason)) => {
            debug!(circuit = %kind, %reason, "proof does not decode");
            return Ok(false);
        }
        Err(err) => return Err(err),
    };
    let inputs = public.to_field_elements();

    let valid = match Groth16::<Bn254>::verify_with_processed_vk(pvk, &inputs, &proof) {
        Ok(valid) => valid,
        Err(SynthesisError::MalformedVerifyingKey) => false,
        Err(err) => return Err(ZslError::Synthesis(err)),
    };
    debug!(circuit = %kind, inputs = inputs.len(), valid, "verified proof");
    Ok(valid)
}

pub fn verify_shielding(
    store: &KeyStore,
    proof: &EncodedProof,
    send_nullifier: &Hash,
    commitment: &Hash,
    value: u64,
) -> Result<bool> {
    debug!(
        send_nullifier = %hex::encode(send_nullifier),
        commitment = %hex::encode(commitment),
        value,
        "verify shielding"
    );
    let public = ShieldingPublicInputs {
        send_nullifier: *send_nullifier,
        commitment: *commitment,
        value,
    };
    verify(store, &public, proof)
}

pub fn verify_unshielding(
    store: &KeyStore,
    proof: &EncodedProof,
    spend_nullifier: &Hash,
    anchor: &Hash,
    value: u64,
) -> Result<bool> {
    debug!(
        spend_nullifier = %hex::encode(spend_nullifier),
        anchor = %hex::encode(anchor),
        value,
        "verify unshielding"
    );
    let public = UnshieldingPublicInputs {
        spend_nullifier: *spend_nullifier,
        anchor: *anchor,
        value,
    };
    verify(store, &public, proof)
}

pub fn verify_transfer(
    store: &KeyStore,
    proof: &EncodedProof,
    anchor: &Hash,
    spend_nullifiers: &[Hash; 2],
    send_nullifiers: &[Hash; 2],
    commitments: &[Hash; 2],
) -> Result<bool> {
    debug!(
        anchor = %hex::encode(anchor),
        spend_nf_1 = %hex::encode(spend_nullifiers[0]),
        spend_nf_2 = %hex::encode(spend_nullifiers[1]),
        send_nf_1 = %hex::encode(send_nullifiers[0]),
        send_nf_2 = %hex::encode(send_nullifiers[1]),
        "verify transfer"
    );
    let public = TransferPublicInputs {
        anchor: *anchor,
        spend_nullifiers: *spend_nullifiers,
        send_nullifiers: *send_nullifiers,
        commitments: *commitments,
    };
    verify(store, &public, proof)
}

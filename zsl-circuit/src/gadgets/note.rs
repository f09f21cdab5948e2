// zsl-circuit/src/gadgets/note.rs

use ark_bn254::Fr;
use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar, uint8::UInt8};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::{merkle, nullifier, value, Bytes};
use crate::{shielding::OutputNote, unshielding::SpendWitness};

pub struct SpentNoteVar {
    pub spend_nullifier: Bytes,
    pub root: Bytes,
    pub value: FpVar<Fr>,
    pub is_nonzero: Boolean<Fr>,
}

/// Opens a note the prover owns: derives its commitment from `(rho, sk,
/// value)`, walks the authentication path and derives the spend nullifier.
/// The caller allocates `value` so it can be either public or private.
pub fn spend(
    cs: ConstraintSystemRef<Fr>,
    witness: &SpendWitness,
    value: &[UInt8<Fr>],
) -> Result<SpentNoteVar, SynthesisError> {
    let rho = UInt8::new_witness_vec(cs.clone(), &witness.rho[..])?;
    let sk = UInt8::new_witness_vec(cs.clone(), &witness.sk[..])?;
    let position = merkle::alloc_position(cs.clone(), witness.tree_position, witness.auth_path.len())?;
    let auth_path = merkle::alloc_auth_path(cs, &witness.auth_path)?;

    let pk = nullifier::derive_pk(&sk)?;
    let commitment = nullifier::note_commitment(&rho, &pk, value)?;
    let root = merkle::compute_root(&commitment, &auth_path, &position)?;

    Ok(SpentNoteVar {
        spend_nullifier: nullifier::spend_nullifier(&rho, &sk)?,
        root,
        value: value::to_fp(value)?,
        is_nonzero: value::is_nonzero(value)?,
    })
}

pub struct CreatedNoteVar {
    pub send_nullifier: Bytes,
    pub commitment: Bytes,
    pub value: FpVar<Fr>,
}

pub fn create(
    cs: ConstraintSystemRef<Fr>,
    note: &OutputNote,
    value: &[UInt8<Fr>],
) -> Result<CreatedNoteVar, SynthesisError> {
    let rho = UInt8::new_witness_vec(cs.clone(), &note.rho[..])?;
    let pk = UInt8::new_witness_vec(cs, &note.pk[..])?;
    Ok(CreatedNoteVar {
        send_nullifier: nullifier::send_nullifier(&rho)?,
        commitment: nullifier::note_commitment(&rho, &pk, value)?,
        value: value::to_fp(value)?,
    })
}

// zsl-circuit/src/gadgets/value.rs

use ark_bn254::Fr;
use ark_r1cs_std::{
    boolean::Boolean, fields::fp::FpVar, uint8::UInt8, ToBitsGadget,
};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::Bytes;

/// Allocates a value as 8 little-endian witness bytes.
pub fn alloc_witness(cs: ConstraintSystemRef<Fr>, value: u64) -> Result<Bytes, SynthesisError> {
    UInt8::new_witness_vec(cs, &value.to_le_bytes()[..])
}

/// Allocates a value as 8 little-endian public bytes, packed into one input.
pub fn alloc_input(cs: ConstraintSystemRef<Fr>, value: u64) -> Result<Bytes, SynthesisError> {
    UInt8::new_input_vec(cs, &value.to_le_bytes())
}

fn bits_le(value: &[UInt8<Fr>]) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let mut bits = Vec::with_capacity(value.len() * 8);
    for byte in value {
        bits.extend(ToBitsGadget::to_bits_le(byte)?);
    }
    Ok(bits)
}

pub fn is_nonzero(value: &[UInt8<Fr>]) -> Result<Boolean<Fr>, SynthesisError> {
    Boolean::kary_or(&bits_le(value)?)
}

/// The value as a field element. 64 bits never wrap the BN254 scalar field,
/// so sums of a handful of values are exact.
pub fn to_fp(value: &[UInt8<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    Boolean::le_bits_to_fp_var(&bits_le(value)?)
}

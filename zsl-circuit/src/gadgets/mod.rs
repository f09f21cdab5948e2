// zsl-circuit/src/gadgets/mod.rs

pub mod merkle;
pub mod note;
pub mod nullifier;
pub mod sha256;
pub mod value;

use ark_bn254::Fr;
use ark_r1cs_std::{eq::EqGadget, uint8::UInt8};
use ark_relations::r1cs::SynthesisError;

pub type Bytes = Vec<UInt8<Fr>>;

pub fn enforce_bytes_equal(a: &[UInt8<Fr>], b: &[UInt8<Fr>]) -> Result<(), SynthesisError> {
    a.enforce_equal(b)
}

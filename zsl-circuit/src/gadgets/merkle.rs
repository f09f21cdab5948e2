// zsl-circuit/src/gadgets/merkle.rs

use ark_bn254::Fr;
use ark_r1cs_std::{
    alloc::AllocVar, boolean::Boolean, select::CondSelectGadget, uint8::UInt8, ToBitsGadget,
};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::{sha256, Bytes};

/// Allocates an authentication path given root-adjacent level first, each
/// level as 256 bits with the most significant bit of every byte first.
pub fn alloc_auth_path(
    cs: ConstraintSystemRef<Fr>,
    auth_path: &[Vec<bool>],
) -> Result<Vec<Bytes>, SynthesisError> {
    auth_path
        .iter()
        .map(|level| {
            let bits = level
                .iter()
                .map(|bit| Boolean::new_witness(cs.clone(), || Ok(*bit)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bits
                .chunks(8)
                .map(|msb_first| {
                    let le: Vec<Boolean<Fr>> = msb_first.iter().rev().cloned().collect();
                    UInt8::from_bits_le(&le)
                })
                .collect())
        })
        .collect()
}

/// Position bits, least significant (leaf level) first.
pub fn alloc_position(
    cs: ConstraintSystemRef<Fr>,
    position: u64,
    tree_depth: usize,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    (0..tree_depth)
        .map(|height| Boolean::new_witness(cs.clone(), || Ok((position >> height) & 1 == 1)))
        .collect()
}

/// Recomputes the root from a leaf. A set position bit at height `h` means the
/// running node is the right child at that height.
pub fn compute_root(
    leaf: &[UInt8<Fr>],
    auth_path: &[Bytes],
    position: &[Boolean<Fr>],
) -> Result<Bytes, SynthesisError> {
    let mut node = leaf.to_vec();
    for (sibling, is_right) in auth_path.iter().rev().zip(position) {
        let left = select_bytes(is_right, sibling, &node)?;
        let right = select_bytes(is_right, &node, sibling)?;
        let block: Bytes = left.into_iter().chain(right).collect();
        node = sha256::compress(&block)?;
    }
    Ok(node)
}

fn select_bytes(
    cond: &Boolean<Fr>,
    if_true: &[UInt8<Fr>],
    if_false: &[UInt8<Fr>],
) -> Result<Bytes, SynthesisError> {
    if_true
        .iter()
        .zip(if_false)
        .map(|(t, f)| {
            let t_bits = ToBitsGadget::to_bits_le(t)?;
            let f_bits = ToBitsGadget::to_bits_le(f)?;
            let bits = t_bits
                .iter()
                .zip(&f_bits)
                .map(|(a, b)| Boolean::conditionally_select(cond, a, b))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UInt8::from_bits_le(&bits))
        })
        .collect()
}

// zsl-circuit/src/gadgets/sha256.rs

use ark_bn254::Fr;
use ark_crypto_primitives::crh::sha256::constraints::Sha256Gadget;
use ark_r1cs_std::{
    boolean::Boolean, select::CondSelectGadget, uint32::UInt32, uint8::UInt8, ToBitsGadget,
};
use ark_relations::r1cs::SynthesisError;

use super::Bytes;
use crate::note::{SHA256_BLOCK_SIZE, SHA256_IV};

const ROUND_CONSTANTS: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// SHA-256 over an arbitrary byte string, returning the 32 digest bytes.
pub fn digest(preimage: &[UInt8<Fr>]) -> Result<Bytes, SynthesisError> {
    Ok(Sha256Gadget::<Fr>::digest(preimage)?.0)
}

pub fn digest_concat(parts: &[&[UInt8<Fr>]]) -> Result<Bytes, SynthesisError> {
    let preimage: Bytes = parts.iter().flat_map(|part| part.iter().cloned()).collect();
    digest(&preimage)
}

/// Constraint twin of [`crate::note::sha256_compress`]: a single compression
/// of a 64-byte block from the standard IV, without padding.
pub fn compress(block: &[UInt8<Fr>]) -> Result<Bytes, SynthesisError> {
    if block.len() != SHA256_BLOCK_SIZE {
        return Err(SynthesisError::Unsatisfiable);
    }
    let mut schedule = block
        .chunks(4)
        .map(word_from_be_bytes)
        .collect::<Result<Vec<_>, _>>()?;
    for t in 16..64 {
        let s0 = small_sigma(&schedule[t - 15], 7, 18, 3)?;
        let s1 = small_sigma(&schedule[t - 2], 17, 19, 10)?;
        let word = UInt32::addmany(&[
            s1,
            schedule[t - 7].clone(),
            s0,
            schedule[t - 16].clone(),
        ])?;
        schedule.push(word);
    }

    let initial: Vec<UInt32<Fr>> = SHA256_IV.iter().map(|word| UInt32::constant(*word)).collect();
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = [0, 1, 2, 3, 4, 5, 6, 7]
        .map(|i| initial[i].clone());

    for (word, constant) in schedule.iter().zip(ROUND_CONSTANTS) {
        let s1 = big_sigma(&e, 6, 11, 25)?;
        let ch = choose(&e, &f, &g)?;
        let temp1 = UInt32::addmany(&[h, s1, ch, UInt32::constant(constant), word.clone()])?;
        let s0 = big_sigma(&a, 2, 13, 22)?;
        let maj = majority(&a, &b, &c)?;
        let temp2 = UInt32::addmany(&[s0, maj])?;

        h = g;
        g = f;
        f = e;
        e = UInt32::addmany(&[d, temp1.clone()])?;
        d = c;
        c = b;
        b = a;
        a = UInt32::addmany(&[temp1, temp2])?;
    }

    let mut out = Vec::with_capacity(32);
    for (start, word) in initial.into_iter().zip([a, b, c, d, e, f, g, h]) {
        let sum = UInt32::addmany(&[start, word])?;
        out.extend(word_to_be_bytes(&sum));
    }
    Ok(out)
}

fn word_from_be_bytes(bytes: &[UInt8<Fr>]) -> Result<UInt32<Fr>, SynthesisError> {
    let mut bits = Vec::with_capacity(32);
    for byte in bytes.iter().rev() {
        bits.extend(byte.to_bits_le()?);
    }
    Ok(UInt32::from_bits_le(&bits))
}

fn word_to_be_bytes(word: &UInt32<Fr>) -> Vec<UInt8<Fr>> {
    let bits = word.to_bits_le();
    bits.chunks(8).rev().map(UInt8::from_bits_le).collect()
}

fn shr(word: &UInt32<Fr>, by: usize) -> UInt32<Fr> {
    let bits = word.to_bits_le();
    let shifted: Vec<Boolean<Fr>> = bits[by..]
        .iter()
        .cloned()
        .chain(std::iter::repeat(Boolean::FALSE).take(by))
        .collect();
    UInt32::from_bits_le(&shifted)
}

fn small_sigma(
    word: &UInt32<Fr>,
    r1: usize,
    r2: usize,
    s: usize,
) -> Result<UInt32<Fr>, SynthesisError> {
    word.rotr(r1).xor(&word.rotr(r2))?.xor(&shr(word, s))
}

fn big_sigma(
    word: &UInt32<Fr>,
    r1: usize,
    r2: usize,
    r3: usize,
) -> Result<UInt32<Fr>, SynthesisError> {
    word.rotr(r1).xor(&word.rotr(r2))?.xor(&word.rotr(r3))
}

/// `(e & f) ^ (!e & g)`, bit by bit.
fn choose(e: &UInt32<Fr>, f: &UInt32<Fr>, g: &UInt32<Fr>) -> Result<UInt32<Fr>, SynthesisError> {
    let bits = e
        .to_bits_le()
        .iter()
        .zip(f.to_bits_le())
        .zip(g.to_bits_le())
        .map(|((e, f), g)| Boolean::conditionally_select(e, &f, &g))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(UInt32::from_bits_le(&bits))
}

/// Majority of three bits: `a` when `a == b`, otherwise `c`.
fn majority(a: &UInt32<Fr>, b: &UInt32<Fr>, c: &UInt32<Fr>) -> Result<UInt32<Fr>, SynthesisError> {
    let bits = a
        .to_bits_le()
        .iter()
        .zip(b.to_bits_le())
        .zip(c.to_bits_le())
        .map(|((a, b), c)| Boolean::conditionally_select(&a.xor(&b)?, &c, a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(UInt32::from_bits_le(&bits))
}

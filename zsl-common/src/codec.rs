//! Fixed binary encodings for proofs and key material.
//!
//! Proofs and verifying keys use the compressed, fully validated canonical
//! encoding. Proving keys are large and only ever read back from files whose
//! blake3 hash was checked first, so they are stored uncompressed and decoded
//! without subgroup checks.

use ark_bn254::Bn254;
use ark_groth16::{Proof, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};

use crate::{
    error::{Result, ZslError},
    types::{EncodedProof, PROOF_SIZE},
};

pub fn encode_proof(proof: &Proof<Bn254>) -> Result<EncodedProof> {
    let mut buf = Vec::with_capacity(PROOF_SIZE);
    proof.serialize_compressed(&mut buf)?;
    if buf.len() != PROOF_SIZE {
        return Err(ZslError::SizeMismatch {
            what: "encoded proof",
            expected: PROOF_SIZE,
            actual: buf.len(),
        });
    }
    EncodedProof::from_slice(&buf)
}

pub fn decode_proof(encoded: &EncodedProof) -> Result<Proof<Bn254>> {
    decode_exact(encoded.as_ref(), "proof", |reader| {
        Proof::deserialize_compressed(reader)
    })
    .map_err(|err| ZslError::MalformedProof(err.to_string()))
}

pub fn encode_proving_key(pk: &ProvingKey<Bn254>) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(pk.uncompressed_size());
    pk.serialize_uncompressed(&mut buf)?;
    Ok(buf)
}

pub fn decode_proving_key(bytes: &[u8]) -> Result<ProvingKey<Bn254>> {
    decode_exact(bytes, "proving key", |reader| {
        ProvingKey::deserialize_uncompressed_unchecked(reader)
    })
}

pub fn encode_verifying_key(vk: &VerifyingKey<Bn254>) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(vk.compressed_size());
    vk.serialize_compressed(&mut buf)?;
    Ok(buf)
}

pub fn decode_verifying_key(bytes: &[u8]) -> Result<VerifyingKey<Bn254>> {
    decode_exact(bytes, "verifying key", |reader| {
        VerifyingKey::deserialize_compressed(reader)
    })
}

fn decode_exact<T>(
    bytes: &[u8],
    what: &str,
    decode: impl FnOnce(&mut &[u8]) -> std::result::Result<T, SerializationError>,
) -> Result<T> {
    let mut reader = bytes;
    let value = decode(&mut reader)?;
    if !reader.is_empty() {
        return Err(ZslError::Serialization(format!(
            "{what} has {} trailing bytes",
            reader.len()
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fr, G1Affine, G2Affine};
    use ark_ec::{AffineRepr, CurveGroup};

    fn sample_proof() -> Proof<Bn254> {
        Proof {
            a: (G1Affine::generator() * Fr::from(7u64)).into_affine(),
            b: (G2Affine::generator() * Fr::from(11u64)).into_affine(),
            c: G1Affine::generator(),
        }
    }

    #[test]
    fn proof_round_trip() {
        let proof = sample_proof();
        let encoded = encode_proof(&proof).unwrap();
        assert_eq!(encoded.as_bytes().len(), PROOF_SIZE);
        assert_eq!(decode_proof(&encoded).unwrap(), proof);
        assert_eq!(proof.compressed_size(), PROOF_SIZE);
    }

    #[test]
    fn garbage_proof_is_malformed() {
        let encoded = EncodedProof::from_bytes([0xff; PROOF_SIZE]);
        assert!(matches!(
            decode_proof(&encoded),
            Err(ZslError::MalformedProof(_))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let vk = VerifyingKey::<Bn254> {
            alpha_g1: G1Affine::generator(),
            beta_g2: G2Affine::generator(),
            gamma_g2: G2Affine::generator(),
            delta_g2: G2Affine::generator(),
            gamma_abc_g1: vec![G1Affine::generator(); 3],
        };
        let mut bytes = encode_verifying_key(&vk).unwrap();
        assert_eq!(decode_verifying_key(&bytes).unwrap(), vk);
        bytes.push(0);
        assert!(matches!(
            decode_verifying_key(&bytes),
            Err(ZslError::Serialization(_))
        ));
    }
}

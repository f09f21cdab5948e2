// zsl-circuit/src/gadgets/nullifier.rs

use ark_bn254::Fr;
use ark_r1cs_std::uint8::UInt8;
use ark_relations::r1cs::SynthesisError;

use super::{sha256, Bytes};
use crate::note::{SEND_NULLIFIER_PREFIX, SPEND_NULLIFIER_PREFIX};

pub fn derive_pk(sk: &[UInt8<Fr>]) -> Result<Bytes, SynthesisError> {
    sha256::digest(sk)
}

/// `value_le` is the 8-byte little-endian value.
pub fn note_commitment(
    rho: &[UInt8<Fr>],
    pk: &[UInt8<Fr>],
    value_le: &[UInt8<Fr>],
) -> Result<Bytes, SynthesisError> {
    sha256::digest_concat(&[rho, pk, value_le])
}

pub fn send_nullifier(rho: &[UInt8<Fr>]) -> Result<Bytes, SynthesisError> {
    let prefix = [UInt8::constant(SEND_NULLIFIER_PREFIX)];
    sha256::digest_concat(&[&prefix, rho])
}

pub fn spend_nullifier(rho: &[UInt8<Fr>], sk: &[UInt8<Fr>]) -> Result<Bytes, SynthesisError> {
    let prefix = [UInt8::constant(SPEND_NULLIFIER_PREFIX)];
    sha256::digest_concat(&[&prefix, rho, sk])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::ConstraintSystem;

    fn witness_bytes(cs: ark_relations::r1cs::ConstraintSystemRef<Fr>, bytes: &[u8]) -> Bytes {
        UInt8::new_witness_vec(cs, bytes).unwrap()
    }

    fn value_of(bytes: &[UInt8<Fr>]) -> [u8; 32] {
        let out: Vec<u8> = bytes.iter().map(|b| b.value().unwrap()).collect();
        out.try_into().unwrap()
    }

    #[test]
    fn gadgets_agree_with_native_hashes() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let rho = [0x11u8; 32];
        let sk = [0x22u8; 32];
        let value = 1_234_567u64;

        let rho_var = witness_bytes(cs.clone(), &rho);
        let sk_var = witness_bytes(cs.clone(), &sk);
        let value_var = witness_bytes(cs.clone(), &value.to_le_bytes());

        let pk_var = derive_pk(&sk_var).unwrap();
        let pk = note::derive_pk(&sk);
        assert_eq!(value_of(&pk_var), pk);
        assert_eq!(
            value_of(&note_commitment(&rho_var, &pk_var, &value_var).unwrap()),
            note::note_commitment(&rho, &pk, value)
        );
        assert_eq!(
            value_of(&send_nullifier(&rho_var).unwrap()),
            note::send_nullifier(&rho)
        );
        assert_eq!(
            value_of(&spend_nullifier(&rho_var, &sk_var).unwrap()),
            note::spend_nullifier(&rho, &sk)
        );
        assert!(cs.is_satisfied().unwrap());
    }
}

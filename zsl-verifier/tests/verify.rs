use std::sync::Arc;

use zsl_common::{
    decode_proof, CircuitKeys, CircuitKind, EncodedProof, KeyRole, KeyStore, ShieldingPublicInputs,
    ZslError, PROOF_SIZE,
};
use zsl_prover::{prove_shielding, prove_unshielding};
use zsl_test_fixtures::{circuit_keys, reference_note, store, tree_depth, Wallet};
use zsl_verifier::{verify, verify_shielding, verify_unshielding};

#[test]
fn undecodable_proof_does_not_verify() {
    let store = store(&[CircuitKind::Shielding]);
    let note = reference_note();
    let garbage = EncodedProof::from_bytes([0xff; PROOF_SIZE]);
    assert!(matches!(
        verify_shielding(&store, &garbage, &note.send_nullifier(), &note.commitment(), 100),
        Ok(false)
    ));
    assert!(matches!(
        decode_proof(&garbage),
        Err(ZslError::MalformedProof(_))
    ));
}

#[test]
fn proof_of_wrong_length_is_rejected_before_verification() {
    assert!(matches!(
        EncodedProof::from_slice(&[0u8; PROOF_SIZE - 1]),
        Err(ZslError::SizeMismatch {
            what: "proof",
            expected: PROOF_SIZE,
            actual: 127
        })
    ));
}

#[test]
fn missing_verifying_key_is_an_error() {
    let store = KeyStore::builder(tree_depth()).build();
    let public = ShieldingPublicInputs {
        send_nullifier: [0; 32],
        commitment: [0; 32],
        value: 0,
    };
    let proof = EncodedProof::from_bytes([0; PROOF_SIZE]);
    assert!(matches!(
        verify(&store, &public, &proof),
        Err(ZslError::MissingKeyMaterial {
            kind: CircuitKind::Shielding,
            role: KeyRole::Verifying
        })
    ));
}

#[test]
fn unshielding_rejects_wrong_public_inputs() {
    let store = store(&[CircuitKind::Unshielding]);
    let wallet = Wallet::with_notes(&[7, 8]).unwrap();
    let input = wallet.spend(1).unwrap();
    let proof = prove_unshielding(&store, &input).unwrap();
    let nf = input.spend_nullifier();
    let root = wallet.tree.root();

    assert!(verify_unshielding(&store, &proof, &nf, &root, 8).unwrap());
    assert!(!verify_unshielding(&store, &proof, &nf, &root, 7).unwrap());
    assert!(!verify_unshielding(&store, &proof, &nf, &[0xab; 32], 8).unwrap());
    assert!(!verify_unshielding(&store, &proof, &input.send_nullifier(), &root, 8).unwrap());
}

#[test]
fn key_from_another_circuit_does_not_verify() {
    let shielding = store(&[CircuitKind::Shielding]);
    let note = reference_note();
    let proof = prove_shielding(&shielding, &note).unwrap();

    let confused = KeyStore::builder(tree_depth())
        .with_keys(CircuitKind::Unshielding, circuit_keys(CircuitKind::Shielding))
        .with_keys(CircuitKind::Shielding, circuit_keys(CircuitKind::Unshielding))
        .build();
    assert!(!verify_shielding(&confused, &proof, &note.send_nullifier(), &note.commitment(), 100)
        .unwrap());
}

#[test]
fn key_with_wrong_arity_verifies_false() {
    let mut vk = circuit_keys(CircuitKind::Shielding).verifying_key().clone();
    vk.gamma_abc_g1.truncate(3);
    let keys = CircuitKeys::verifying_only(vk).unwrap();
    assert!(keys.ensure_shape(CircuitKind::Shielding).is_err());

    let store = KeyStore::builder(tree_depth())
        .with_keys(CircuitKind::Shielding, Arc::new(keys))
        .build();
    let note = reference_note();
    let proof = prove_shielding(&zsl_test_fixtures::store(&[CircuitKind::Shielding]), &note).unwrap();
    assert!(
        !verify_shielding(&store, &proof, &note.send_nullifier(), &note.commitment(), 100).unwrap()
    );
}

#[test]
fn verification_is_repeatable() {
    let store = store(&[CircuitKind::Shielding]);
    let note = reference_note();
    let proof = prove_shielding(&store, &note).unwrap();
    for _ in 0..3 {
        assert!(verify_shielding(&store, &proof, &note.send_nullifier(), &note.commitment(), 100)
            .unwrap());
    }
}

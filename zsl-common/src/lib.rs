//! Shared plumbing between the ZSL prover and verifier: key storage, wire
//! encodings, authentication paths, transaction requests and configuration.

pub mod artifacts;
pub mod codec;
pub mod config;
pub mod error;
pub mod keystore;
pub mod merkle_path;
pub mod note;
pub mod tree;
pub mod types;
pub mod witness;

pub use artifacts::{ArtifactFile, CircuitArtifacts, KeyManifest, CIRCUIT_VERSION, MANIFEST_FILE};
pub use codec::{
    decode_proof, decode_proving_key, decode_verifying_key, encode_proof, encode_proving_key,
    encode_verifying_key,
};
pub use config::ZslConfig;
pub use error::{KeyRole, Result, ZslError};
pub use keystore::{CircuitKeys, KeyStore, KeyStoreBuilder};
pub use merkle_path::AuthenticationPath;
pub use note::{Note, SpendInput, ZAddress};
pub use tree::{CommitmentTree, TreeError};
pub use types::{EncodedProof, TreeDepth, PROOF_SIZE};
pub use witness::{ShieldingRequest, TransactionWitness, TransferRequest, UnshieldingRequest};
pub use zsl_circuit::{
    note::sha256_compress, CircuitKind, Hash, PublicInputs, ShieldingPublicInputs,
    TransferPublicInputs, UnshieldingPublicInputs, HASH_SIZE,
};

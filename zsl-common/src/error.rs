//! Error types shared by the prover, verifier and key store.

use std::path::PathBuf;

use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use thiserror::Error;
use zsl_circuit::{CircuitError, CircuitKind};

use crate::tree::TreeError;

pub type Result<T, E = ZslError> = std::result::Result<T, E>;

/// Which half of a key pair an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRole {
    Proving,
    Verifying,
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeyRole::Proving => "proving",
            KeyRole::Verifying => "verifying",
        })
    }
}

#[derive(Debug, Error)]
pub enum ZslError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{what} has {actual} bytes, expected {expected}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("tree depth mismatch: keys built for depth {expected}, got {actual}")]
    TreeDepthMismatch { expected: usize, actual: usize },

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("no {role} key loaded for the {kind} circuit")]
    MissingKeyMaterial { kind: CircuitKind, role: KeyRole },

    #[error("{kind} key does not match the circuit: {reason}")]
    KeyMismatch { kind: CircuitKind, reason: String },

    #[error("{kind} witness does not satisfy constraint {constraint}")]
    UnsatisfiedWitness { kind: CircuitKind, constraint: String },

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("circuit synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ZslError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ZslError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SerializationError> for ZslError {
    fn from(err: SerializationError) -> Self {
        ZslError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ZslError {
    fn from(err: serde_json::Error) -> Self {
        ZslError::Serialization(err.to_string())
    }
}

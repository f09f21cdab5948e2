//! Wallet-side note types and the hashes derived from them.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zsl_circuit::{
    note::{derive_pk, note_commitment, send_nullifier, spend_nullifier},
    shielding::OutputNote,
    unshielding::SpendWitness,
    Hash,
};

use crate::{
    error::Result,
    merkle_path::AuthenticationPath,
    tree::CommitmentTree,
};

/// A shielded address: the spending key and its public key `SHA256(sk)`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZAddress {
    pub sk: Hash,
    pub pk: Hash,
}

impl ZAddress {
    pub fn from_sk(sk: Hash) -> Self {
        Self {
            pk: derive_pk(&sk),
            sk,
        }
    }

    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut sk = [0u8; 32];
        rng.fill_bytes(&mut sk);
        Self::from_sk(sk)
    }
}

impl std::fmt::Debug for ZAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZAddress")
            .field("pk", &hex::encode(self.pk))
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub rho: Hash,
    pub pk: Hash,
    pub value: u64,
}

impl Note {
    pub fn new(rho: Hash, pk: Hash, value: u64) -> Self {
        Self { rho, pk, value }
    }

    /// A note to `pk` with fresh randomness.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R, pk: Hash, value: u64) -> Self {
        let mut rho = [0u8; 32];
        rng.fill_bytes(&mut rho);
        Self { rho, pk, value }
    }

    pub fn commitment(&self) -> Hash {
        note_commitment(&self.rho, &self.pk, self.value)
    }

    /// Published when the note is created so `rho` is never reused.
    pub fn send_nullifier(&self) -> Hash {
        send_nullifier(&self.rho)
    }

    /// Nullifier revealed when the owner of `sk` spends this note.
    pub fn spend_nullifier(&self, sk: &Hash) -> Hash {
        spend_nullifier(&self.rho, sk)
    }
}

impl From<&Note> for OutputNote {
    fn from(note: &Note) -> Self {
        OutputNote {
            rho: note.rho,
            pk: note.pk,
            value: note.value,
        }
    }
}

/// A note being spent, together with its position and membership path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendInput {
    pub rho: Hash,
    pub sk: Hash,
    pub value: u64,
    pub tree_position: u64,
    pub auth_path: AuthenticationPath,
}

impl SpendInput {
    /// Looks the note up in `tree` and takes its current path.
    pub fn from_tree(note: &Note, sk: Hash, tree: &CommitmentTree) -> Result<Self> {
        let (tree_position, auth_path) = tree.witness(&note.commitment())?;
        Ok(Self {
            rho: note.rho,
            sk,
            value: note.value,
            tree_position,
            auth_path,
        })
    }

    /// A zero-value placeholder input. Its membership is not checked by the
    /// transfer circuit, so the path can be anything of the right depth.
    pub fn dummy<R: RngCore + CryptoRng>(rng: &mut R, path: AuthenticationPath) -> Self {
        let address = ZAddress::random(rng);
        let note = Note::random(rng, address.pk, 0);
        Self {
            rho: note.rho,
            sk: address.sk,
            value: 0,
            tree_position: 0,
            auth_path: path,
        }
    }

    pub fn commitment(&self) -> Hash {
        note_commitment(&self.rho, &derive_pk(&self.sk), self.value)
    }

    pub fn spend_nullifier(&self) -> Hash {
        spend_nullifier(&self.rho, &self.sk)
    }

    pub fn send_nullifier(&self) -> Hash {
        send_nullifier(&self.rho)
    }

    /// Root this input proves membership in.
    pub fn anchor(&self) -> Hash {
        self.auth_path
            .compute_root(&self.commitment(), self.tree_position)
    }

    pub(crate) fn to_witness(&self) -> SpendWitness {
        SpendWitness {
            rho: self.rho,
            sk: self.sk,
            value: self.value,
            tree_position: self.tree_position,
            auth_path: self.auth_path.to_bit_vectors(),
        }
    }
}

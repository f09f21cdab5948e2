//! Key material and sample notes shared by tests across the workspace.
//!
//! Keys are generated once per process at a small tree depth and cached.
//! Transfer keys take noticeably longer than the other two, so they are only
//! built when a test asks for them.

use std::sync::Arc;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zsl_common::{
    CircuitKeys, CircuitKind, CommitmentTree, KeyStore, Note, SpendInput, TreeDepth, ZAddress,
};
use zsl_prover::{setup, ParameterSet};

pub const TEST_TREE_DEPTH: usize = 2;
const RNG_SEED: u64 = 0x5a5a_2018;

static SHIELDING: OnceCell<ParameterSet> = OnceCell::new();
static UNSHIELDING: OnceCell<ParameterSet> = OnceCell::new();
static TRANSFER: OnceCell<ParameterSet> = OnceCell::new();
static TRACING: OnceCell<()> = OnceCell::new();

pub fn tree_depth() -> TreeDepth {
    TreeDepth::new(TEST_TREE_DEPTH).expect("test tree depth is valid")
}

/// Cached key pair for `kind` at [`TEST_TREE_DEPTH`].
pub fn parameters(kind: CircuitKind) -> &'static ParameterSet {
    let cell = match kind {
        CircuitKind::Shielding => &SHIELDING,
        CircuitKind::Unshielding => &UNSHIELDING,
        CircuitKind::Transfer => &TRANSFER,
    };
    cell.get_or_init(|| {
        init_tracing();
        build_parameters(kind).expect("failed to build zsl test keys")
    })
}

pub fn circuit_keys(kind: CircuitKind) -> Arc<CircuitKeys> {
    Arc::clone(&parameters(kind).keys)
}

/// A key store holding the cached keys for `kinds`.
pub fn store(kinds: &[CircuitKind]) -> KeyStore {
    kinds
        .iter()
        .fold(KeyStore::builder(tree_depth()), |builder, kind| {
            builder.with_keys(*kind, circuit_keys(*kind))
        })
        .build()
}

/// Installs a test-friendly subscriber once; `RUST_LOG` picks the level.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Deterministic randomness so failures reproduce. [`Wallet`] draws from
/// this stream, so tests creating their own notes should use [`seeded_rng`].
pub fn rng() -> ChaCha20Rng {
    seeded_rng(RNG_SEED)
}

pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// A wallet owning notes committed into a tree of [`TEST_TREE_DEPTH`].
pub struct Wallet {
    pub address: ZAddress,
    pub tree: CommitmentTree,
    pub notes: Vec<Note>,
}

impl Wallet {
    /// Commits one note per value, in order, to a fresh tree.
    pub fn with_notes(values: &[u64]) -> Result<Self> {
        let mut rng = rng();
        let address = ZAddress::random(&mut rng);
        let mut tree = CommitmentTree::new(tree_depth());
        let mut notes = Vec::with_capacity(values.len());
        for value in values {
            let note = Note::random(&mut rng, address.pk, *value);
            tree.append(note.commitment())
                .with_context(|| format!("append note of value {value}"))?;
            notes.push(note);
        }
        Ok(Self {
            address,
            tree,
            notes,
        })
    }

    pub fn spend(&self, index: usize) -> Result<SpendInput> {
        let note = self
            .notes
            .get(index)
            .with_context(|| format!("wallet has no note {index}"))?;
        SpendInput::from_tree(note, self.address.sk, &self.tree).context("witness note")
    }
}

/// The reference shielding note: rho = 0x01..., pk = 0x02..., value 100.
pub fn reference_note() -> Note {
    Note::new([0x01; 32], [0x02; 32], 100)
}

fn build_parameters(kind: CircuitKind) -> Result<ParameterSet> {
    tracing::debug!(circuit = %kind, depth = TEST_TREE_DEPTH, "building cached test keys");
    setup(kind, tree_depth()).with_context(|| format!("generate {kind} keys"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_notes_are_members() {
        let wallet = Wallet::with_notes(&[5, 6, 7]).unwrap();
        for index in 0..3 {
            let input = wallet.spend(index).unwrap();
            assert_eq!(input.anchor(), wallet.tree.root());
            assert_eq!(input.tree_position, index as u64);
        }
        assert!(wallet.spend(3).is_err());
    }

    #[test]
    fn rng_is_deterministic() {
        let a = Wallet::with_notes(&[1]).unwrap();
        let b = Wallet::with_notes(&[1]).unwrap();
        assert_eq!(a.notes, b.notes);
        assert_eq!(a.tree.root(), b.tree.root());
    }
}

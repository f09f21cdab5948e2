//! Immutable per-circuit key material.
//!
//! A [`KeyStore`] is assembled once through [`KeyStoreBuilder`], from key
//! files, freshly generated keys, or both, and is read-only afterwards. It is
//! `Send + Sync`, so one store can serve concurrent provers and verifiers.

use std::{collections::BTreeMap, path::Path, sync::Arc};

use ark_bn254::Bn254;
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_snark::SNARK;
use tracing::info;
use zsl_circuit::CircuitKind;

use crate::{
    artifacts::{read_artifact_file, read_manifest, KeyManifest},
    codec::{decode_proving_key, decode_verifying_key},
    error::{KeyRole, Result, ZslError},
    types::TreeDepth,
};

/// Key pair for one circuit. The proving key is optional so verifier-only
/// deployments never have to load it.
pub struct CircuitKeys {
    pk: Option<ProvingKey<Bn254>>,
    vk: VerifyingKey<Bn254>,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl CircuitKeys {
    pub fn new(pk: ProvingKey<Bn254>) -> Result<Self> {
        let vk = pk.vk.clone();
        let pvk = Groth16::<Bn254>::process_vk(&vk)?;
        Ok(Self {
            pk: Some(pk),
            vk,
            pvk,
        })
    }

    pub fn verifying_only(vk: VerifyingKey<Bn254>) -> Result<Self> {
        let pvk = Groth16::<Bn254>::process_vk(&vk)?;
        Ok(Self { pk: None, vk, pvk })
    }

    pub fn proving_key(&self) -> Option<&ProvingKey<Bn254>> {
        self.pk.as_ref()
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.vk
    }

    pub fn prepared_verifying_key(&self) -> &PreparedVerifyingKey<Bn254> {
        &self.pvk
    }

    /// Public inputs the verifying key expects, excluding the constant one.
    pub fn num_public_inputs(&self) -> usize {
        self.vk.gamma_abc_g1.len().saturating_sub(1)
    }

    /// Rejects keys whose public-input arity cannot belong to `kind`.
    pub fn ensure_shape(&self, kind: CircuitKind) -> Result<()> {
        let expected = kind.public_input_count();
        if self.num_public_inputs() != expected {
            return Err(ZslError::KeyMismatch {
                kind,
                reason: format!(
                    "key expects {} public inputs, circuit has {expected}",
                    self.num_public_inputs()
                ),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for CircuitKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitKeys")
            .field("has_proving_key", &self.pk.is_some())
            .field("num_public_inputs", &self.num_public_inputs())
            .finish()
    }
}

#[derive(Debug)]
pub struct KeyStore {
    tree_depth: TreeDepth,
    keys: BTreeMap<CircuitKind, Arc<CircuitKeys>>,
}

impl KeyStore {
    pub fn builder(tree_depth: TreeDepth) -> KeyStoreBuilder {
        KeyStoreBuilder {
            tree_depth,
            keys: BTreeMap::new(),
        }
    }

    pub fn tree_depth(&self) -> TreeDepth {
        self.tree_depth
    }

    pub fn contains(&self, kind: CircuitKind) -> bool {
        self.keys.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = CircuitKind> + '_ {
        self.keys.keys().copied()
    }

    pub fn keys(&self, kind: CircuitKind) -> Result<&Arc<CircuitKeys>> {
        self.keys.get(&kind).ok_or(ZslError::MissingKeyMaterial {
            kind,
            role: KeyRole::Verifying,
        })
    }

    pub fn proving_key(&self, kind: CircuitKind) -> Result<&ProvingKey<Bn254>> {
        self.keys
            .get(&kind)
            .and_then(|keys| keys.proving_key())
            .ok_or(ZslError::MissingKeyMaterial {
                kind,
                role: KeyRole::Proving,
            })
    }

    pub fn verifying_key(&self, kind: CircuitKind) -> Result<&VerifyingKey<Bn254>> {
        Ok(self.keys(kind)?.verifying_key())
    }

    pub fn prepared_verifying_key(
        &self,
        kind: CircuitKind,
    ) -> Result<&PreparedVerifyingKey<Bn254>> {
        Ok(self.keys(kind)?.prepared_verifying_key())
    }
}

#[derive(Debug)]
pub struct KeyStoreBuilder {
    tree_depth: TreeDepth,
    keys: BTreeMap<CircuitKind, Arc<CircuitKeys>>,
}

impl KeyStoreBuilder {
    pub fn tree_depth(&self) -> TreeDepth {
        self.tree_depth
    }

    /// Loads the proving and verifying keys of every circuit kind from
    /// `dir/manifest.json`. A kind the manifest does not list is
    /// [`ZslError::MissingKeyMaterial`].
    pub fn load_dir(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.load(dir.as_ref(), KeyRole::Proving, true)
    }

    /// Loads the verifying key of every circuit kind, skipping proving keys.
    pub fn load_verifying_keys(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.load(dir.as_ref(), KeyRole::Verifying, true)
    }

    /// Like [`Self::load_dir`], but only for the kinds the manifest lists.
    pub fn load_available(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.load(dir.as_ref(), KeyRole::Proving, false)
    }

    pub fn load_available_verifying_keys(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.load(dir.as_ref(), KeyRole::Verifying, false)
    }

    pub fn with_keys(mut self, kind: CircuitKind, keys: Arc<CircuitKeys>) -> Self {
        self.keys.insert(kind, keys);
        self
    }

    pub fn contains(&self, kind: CircuitKind) -> bool {
        self.keys.contains_key(&kind)
    }

    pub fn build(self) -> KeyStore {
        KeyStore {
            tree_depth: self.tree_depth,
            keys: self.keys,
        }
    }

    fn load(mut self, dir: &Path, role: KeyRole, require_all: bool) -> Result<Self> {
        let manifest = read_manifest(dir)?;
        self.ensure_depth(&manifest)?;
        let kinds: Vec<CircuitKind> = if require_all {
            CircuitKind::ALL.to_vec()
        } else {
            manifest.circuits.keys().copied().collect()
        };
        let with_proving_keys = role == KeyRole::Proving;
        for kind in kinds {
            let entry = manifest.circuit(kind, role)?;
            let vk_bytes = read_artifact_file(dir, &entry.vk, &format!("{kind} verifying key"))?;
            let vk = decode_verifying_key(&vk_bytes)?;
            let keys = if with_proving_keys {
                let pk_bytes = read_artifact_file(dir, &entry.pk, &format!("{kind} proving key"))?;
                let pk = decode_proving_key(&pk_bytes)?;
                if pk.vk != vk {
                    return Err(ZslError::KeyMismatch {
                        kind,
                        reason: "proving key embeds a different verifying key".into(),
                    });
                }
                CircuitKeys::new(pk)?
            } else {
                CircuitKeys::verifying_only(vk)?
            };
            keys.ensure_shape(kind)?;
            info!(
                circuit = %kind,
                dir = %dir.display(),
                constraints = entry.num_constraints,
                proving_key = with_proving_keys,
                "loaded circuit keys"
            );
            self.keys.insert(kind, Arc::new(keys));
        }
        Ok(self)
    }

    fn ensure_depth(&self, manifest: &KeyManifest) -> Result<()> {
        if manifest.tree_depth != self.tree_depth {
            return Err(ZslError::TreeDepthMismatch {
                expected: self.tree_depth.get(),
                actual: manifest.tree_depth.get(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::write_manifest;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn store_is_shareable() {
        assert_send_sync::<KeyStore>();
        assert_send_sync::<Arc<CircuitKeys>>();
    }

    #[test]
    fn empty_store_reports_missing_material() {
        let store = KeyStore::builder(TreeDepth::default()).build();
        assert!(matches!(
            store.proving_key(CircuitKind::Shielding),
            Err(ZslError::MissingKeyMaterial {
                kind: CircuitKind::Shielding,
                role: KeyRole::Proving
            })
        ));
        assert!(matches!(
            store.prepared_verifying_key(CircuitKind::Transfer),
            Err(ZslError::MissingKeyMaterial {
                role: KeyRole::Verifying,
                ..
            })
        ));
        assert_eq!(store.kinds().count(), 0);
    }

    #[test]
    fn manifest_depth_must_match() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &KeyManifest::new(TreeDepth::new(4).unwrap())).unwrap();
        let err = KeyStore::builder(TreeDepth::new(5).unwrap())
            .load_dir(dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            ZslError::TreeDepthMismatch {
                expected: 5,
                actual: 4
            }
        ));
    }

    #[test]
    fn strict_load_needs_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), &KeyManifest::new(TreeDepth::default())).unwrap();
        assert!(matches!(
            KeyStore::builder(TreeDepth::default()).load_dir(dir.path()),
            Err(ZslError::MissingKeyMaterial {
                kind: CircuitKind::Shielding,
                role: KeyRole::Proving
            })
        ));
        assert!(matches!(
            KeyStore::builder(TreeDepth::default()).load_verifying_keys(dir.path()),
            Err(ZslError::MissingKeyMaterial {
                kind: CircuitKind::Shielding,
                role: KeyRole::Verifying
            })
        ));
        let lenient = KeyStore::builder(TreeDepth::default())
            .load_available(dir.path())
            .unwrap()
            .build();
        assert_eq!(lenient.kinds().count(), 0);
    }

    #[test]
    fn missing_key_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(KeyStore::builder(TreeDepth::default())
            .load_verifying_keys(&missing)
            .is_err());
    }
}

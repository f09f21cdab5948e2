//! Key artifact directory layout: one `<kind>.pk` / `<kind>.vk` pair per
//! circuit, described by `manifest.json` with the blake3 hash and size of
//! every file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use zsl_circuit::CircuitKind;

use crate::{
    error::{KeyRole, Result, ZslError},
    types::TreeDepth,
};

pub const CIRCUIT_VERSION: u32 = 1;
pub const MANIFEST_VERSION: u32 = 1;
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: String,
    pub blake3: String,
    pub size: u64,
}

impl ArtifactFile {
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            blake3: hash_bytes_hex(bytes),
            size: bytes.len() as u64,
        }
    }

    fn resolve_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitArtifacts {
    pub num_constraints: usize,
    pub num_public_inputs: usize,
    pub pk: ArtifactFile,
    pub vk: ArtifactFile,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyManifest {
    pub manifest_version: u32,
    pub circuit_version: u32,
    pub tree_depth: TreeDepth,
    pub created_at_unix: u64,
    #[serde(default)]
    pub circuits: BTreeMap<CircuitKind, CircuitArtifacts>,
}

impl KeyManifest {
    pub fn new(tree_depth: TreeDepth) -> Self {
        Self {
            manifest_version: MANIFEST_VERSION,
            circuit_version: CIRCUIT_VERSION,
            tree_depth,
            created_at_unix: unix_now(),
            circuits: BTreeMap::new(),
        }
    }

    /// Entry for `kind`; an absent entry is missing `role` key material.
    pub fn circuit(&self, kind: CircuitKind, role: KeyRole) -> Result<&CircuitArtifacts> {
        self.circuits
            .get(&kind)
            .ok_or(ZslError::MissingKeyMaterial { kind, role })
    }
}

pub fn pk_file_name(kind: CircuitKind) -> String {
    format!("{kind}.pk")
}

pub fn vk_file_name(kind: CircuitKind) -> String {
    format!("{kind}.vk")
}

pub fn manifest_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(MANIFEST_FILE)
}

pub fn write_manifest(dir: impl AsRef<Path>, manifest: &KeyManifest) -> Result<()> {
    let path = manifest_path(dir);
    let json = serde_json::to_vec_pretty(manifest)?;
    fs::write(&path, json).map_err(|err| ZslError::io(&path, err))
}

pub fn read_manifest(dir: impl AsRef<Path>) -> Result<KeyManifest> {
    let path = manifest_path(dir);
    let bytes = fs::read(&path).map_err(|err| ZslError::io(&path, err))?;
    let manifest: KeyManifest = serde_json::from_slice(&bytes)?;
    ensure_manifest_compat(&manifest)?;
    Ok(manifest)
}

/// Writes `bytes` as `file_name` under `dir` and returns its manifest entry.
pub fn write_artifact_file(dir: &Path, file_name: String, bytes: &[u8]) -> Result<ArtifactFile> {
    let entry = ArtifactFile::from_bytes(file_name, bytes);
    let path = entry.resolve_path(dir);
    fs::write(&path, bytes).map_err(|err| ZslError::io(&path, err))?;
    Ok(entry)
}

/// Reads an artifact and checks it against the size and hash in its entry.
pub fn read_artifact_file(base_dir: &Path, entry: &ArtifactFile, label: &str) -> Result<Vec<u8>> {
    let path = entry.resolve_path(base_dir);
    let bytes = fs::read(&path).map_err(|err| ZslError::io(&path, err))?;
    if bytes.len() as u64 != entry.size {
        return Err(ZslError::Artifact(format!(
            "{label} size mismatch, manifest recorded {} bytes but found {}",
            entry.size,
            bytes.len()
        )));
    }
    let actual = hash_bytes_hex(&bytes);
    if actual != entry.blake3 {
        return Err(ZslError::Artifact(format!(
            "{label} hash mismatch, expected {} but computed {actual}",
            entry.blake3
        )));
    }
    Ok(bytes)
}

pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn ensure_manifest_compat(manifest: &KeyManifest) -> Result<()> {
    if manifest.manifest_version != MANIFEST_VERSION {
        return Err(ZslError::Artifact(format!(
            "unsupported manifest version {}, expected {MANIFEST_VERSION}",
            manifest.manifest_version
        )));
    }
    if manifest.circuit_version != CIRCUIT_VERSION {
        return Err(ZslError::Artifact(format!(
            "circuit version mismatch: manifest {} vs crate {CIRCUIT_VERSION}",
            manifest.circuit_version
        )));
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

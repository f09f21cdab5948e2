// zsl-prover/src/paramgen.rs

//! One-time Groth16 key generation per circuit kind, with optional
//! persistence into a key directory.

use std::{fs, path::Path, sync::Arc, time::Instant};

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, OptimizationGoal, SynthesisMode,
};
use ark_snark::CircuitSpecificSetupSNARK;
use rand::rngs::OsRng;
use tracing::{info, warn};

use zsl_circuit::{ShieldingCircuit, TransferCircuit, UnshieldingCircuit, ZslCircuit};
use zsl_common::{
    artifacts::{
        manifest_path, pk_file_name, read_manifest, vk_file_name, write_artifact_file,
        write_manifest,
    },
    encode_proving_key, encode_verifying_key, CircuitArtifacts, CircuitKeys, CircuitKind,
    KeyManifest, KeyRole, KeyStore, Result, TreeDepth, ZslConfig, ZslError,
};

/// A freshly generated key pair and the size of the circuit it was made for.
#[derive(Clone, Debug)]
pub struct ParameterSet {
    pub kind: CircuitKind,
    pub tree_depth: TreeDepth,
    pub num_constraints: usize,
    pub num_public_inputs: usize,
    pub keys: Arc<CircuitKeys>,
}

pub fn setup(kind: CircuitKind, tree_depth: TreeDepth) -> Result<ParameterSet> {
    match kind {
        CircuitKind::Shielding => setup_circuit::<ShieldingCircuit>(tree_depth),
        CircuitKind::Unshielding => setup_circuit::<UnshieldingCircuit>(tree_depth),
        CircuitKind::Transfer => setup_circuit::<TransferCircuit>(tree_depth),
    }
}

/// Runs [`setup`] and writes `<kind>.pk`, `<kind>.vk` and an updated
/// `manifest.json` under `dir`.
pub fn generate_parameters(
    kind: CircuitKind,
    dir: impl AsRef<Path>,
    tree_depth: TreeDepth,
) -> Result<ParameterSet> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|err| ZslError::io(dir, err))?;
    let params = setup(kind, tree_depth)?;
    persist(&params, dir)?;
    Ok(params)
}

pub fn generate_shielding_parameters(
    dir: impl AsRef<Path>,
    tree_depth: TreeDepth,
) -> Result<ParameterSet> {
    generate_parameters(CircuitKind::Shielding, dir, tree_depth)
}

pub fn generate_unshielding_parameters(
    dir: impl AsRef<Path>,
    tree_depth: TreeDepth,
) -> Result<ParameterSet> {
    generate_parameters(CircuitKind::Unshielding, dir, tree_depth)
}

pub fn generate_transfer_parameters(
    dir: impl AsRef<Path>,
    tree_depth: TreeDepth,
) -> Result<ParameterSet> {
    generate_parameters(CircuitKind::Transfer, dir, tree_depth)
}

/// Loads every key present in `config.key_dir` and generates, persists and
/// adds the kinds that are missing.
pub fn load_or_generate(config: &ZslConfig) -> Result<KeyStore> {
    let dir = config.key_dir.as_path();
    let mut builder = KeyStore::builder(config.tree_depth);
    if manifest_path(dir).exists() {
        builder = builder.load_available(dir)?;
    }
    for kind in CircuitKind::ALL {
        if builder.contains(kind) {
            continue;
        }
        warn!(circuit = %kind, dir = %dir.display(), "keys missing, generating");
        let params = generate_parameters(kind, dir, config.tree_depth)?;
        builder = builder.with_keys(kind, params.keys);
    }
    Ok(builder.build())
}

fn setup_circuit<C: ZslCircuit>(tree_depth: TreeDepth) -> Result<ParameterSet> {
    let kind = C::KIND;
    let num_constraints = count_constraints(C::blank(tree_depth.get()))?;
    info!(
        circuit = %kind,
        tree_depth = tree_depth.get(),
        constraints = num_constraints,
        "generating keys"
    );

    let started = Instant::now();
    let (pk, _vk) = Groth16::<Bn254>::setup(C::blank(tree_depth.get()), &mut OsRng)?;
    let keys = CircuitKeys::new(pk)?;
    keys.ensure_shape(kind)?;
    info!(
        circuit = %kind,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated keys"
    );

    Ok(ParameterSet {
        kind,
        tree_depth,
        num_constraints,
        num_public_inputs: keys.num_public_inputs(),
        keys: Arc::new(keys),
    })
}

/// Constraint count as key generation sees it: setup mode, linear
/// combinations inlined.
fn count_constraints<C: ConstraintSynthesizer<Fr>>(circuit: C) -> Result<usize> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    cs.set_mode(SynthesisMode::Setup);
    circuit.generate_constraints(cs.clone())?;
    cs.finalize();
    Ok(cs.num_constraints())
}

fn persist(params: &ParameterSet, dir: &Path) -> Result<()> {
    let kind = params.kind;
    let pk = params
        .keys
        .proving_key()
        .ok_or(ZslError::MissingKeyMaterial {
            kind,
            role: KeyRole::Proving,
        })?;
    let pk_bytes = encode_proving_key(pk)?;
    let vk_bytes = encode_verifying_key(params.keys.verifying_key())?;

    let mut manifest = if manifest_path(dir).exists() {
        let manifest = read_manifest(dir)?;
        if manifest.tree_depth != params.tree_depth {
            return Err(ZslError::TreeDepthMismatch {
                expected: params.tree_depth.get(),
                actual: manifest.tree_depth.get(),
            });
        }
        manifest
    } else {
        KeyManifest::new(params.tree_depth)
    };

    let entry = CircuitArtifacts {
        num_constraints: params.num_constraints,
        num_public_inputs: params.num_public_inputs,
        pk: write_artifact_file(dir, pk_file_name(kind), &pk_bytes)?,
        vk: write_artifact_file(dir, vk_file_name(kind), &vk_bytes)?,
    };
    manifest.circuits.insert(kind, entry);
    write_manifest(dir, &manifest)?;
    info!(
        circuit = %kind,
        dir = %dir.display(),
        pk_bytes = pk_bytes.len(),
        vk_bytes = vk_bytes.len(),
        "persisted keys"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_counts_grow_with_tree_depth() {
        let shallow = count_constraints(UnshieldingCircuit::blank(1)).unwrap();
        let deeper = count_constraints(UnshieldingCircuit::blank(2)).unwrap();
        assert!(deeper > shallow);

        let shielding_1 = count_constraints(ShieldingCircuit::blank(1)).unwrap();
        let shielding_8 = count_constraints(ShieldingCircuit::blank(8)).unwrap();
        assert_eq!(shielding_1, shielding_8);
    }
}

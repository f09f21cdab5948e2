use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ZslError},
    types::TreeDepth,
};

pub const KEY_DIR_ENV: &str = "ZSL_KEY_DIR";
pub const DEFAULT_KEY_DIR: &str = "/keys";
pub const TREE_DEPTH_ENV: &str = "ZSL_TREE_DEPTH";

/// Where key material lives and which tree depth it was generated for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZslConfig {
    pub key_dir: PathBuf,
    pub tree_depth: TreeDepth,
}

impl Default for ZslConfig {
    fn default() -> Self {
        Self {
            key_dir: PathBuf::from(DEFAULT_KEY_DIR),
            tree_depth: TreeDepth::default(),
        }
    }
}

impl ZslConfig {
    pub fn new(key_dir: impl Into<PathBuf>, tree_depth: TreeDepth) -> Self {
        Self {
            key_dir: key_dir.into(),
            tree_depth,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ZslConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key_dir = lookup(KEY_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_DIR));
        let tree_depth = match lookup(TREE_DEPTH_ENV) {
            Some(raw) => {
                let depth = raw.trim().parse::<usize>().map_err(|err| {
                    ZslError::InvalidInput(format!("{TREE_DEPTH_ENV}={raw:?}: {err}"))
                })?;
                TreeDepth::new(depth)?
            }
            None => TreeDepth::default(),
        };
        Ok(Self {
            key_dir,
            tree_depth,
        })
    }
}

// src/config.rs
//! Loader settings, read from JSON.
//!
//! ```json
//! {
//!   "search_paths": ["/games/half-life/valve"],
//!   "clip": { "max_restarts": 16, "hull": 1 }
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bsp::DEFAULT_MAX_RESTARTS;
use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Root restarts allowed per movement query before giving up.
    pub max_restarts: u32,
    /// Hull decoded for the world model (0 point, 1 standing, 2 large,
    /// 3 crouching).
    pub hull: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        ClipConfig {
            max_restarts: DEFAULT_MAX_RESTARTS,
            hull: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directories searched, in order, for maps by name.
    pub search_paths: Vec<PathBuf>,
    pub clip: ClipConfig,
}

impl LoaderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

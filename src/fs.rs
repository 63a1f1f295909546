// src/fs.rs
//! Finding and reading map files by game-relative name.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::RwLock;

/// Where assets come from. Names are game-relative (`maps/c1a0.bsp`).
pub trait FileSystem {
    /// Full path of the first match for `name`, if any.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    fn load(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Searches an ordered list of directories. Earlier directories win, so a
/// mod directory listed before `valve` overrides its files.
#[derive(Debug, Default)]
pub struct SearchPathFileSystem {
    roots: Vec<PathBuf>,
    located: RwLock<HashMap<String, PathBuf>>,
}

impl SearchPathFileSystem {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        SearchPathFileSystem {
            roots,
            located: RwLock::new(HashMap::new()),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Appends a directory with the lowest priority.
    pub fn add_search_path(&mut self, root: PathBuf) {
        // Misses are never cached, so existing entries stay valid.
        self.roots.push(root);
    }

    fn normalize(name: &str) -> String {
        name.replace('\\', "/").trim_start_matches('/').to_string()
    }
}

impl FileSystem for SearchPathFileSystem {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let name = Self::normalize(name);
        if let Some(hit) = self.located.read().get(&name) {
            return Some(hit.clone());
        }

        let found = self
            .roots
            .iter()
            .map(|root| root.join(&name))
            .find(|candidate| candidate.is_file())?;
        debug!("Located {} at {}", name, found.display());
        self.located.write().insert(name, found.clone());
        Some(found)
    }

    fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

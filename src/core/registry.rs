//! Port registry - every port of a ports tree, keyed by name.
//!
//! Loading a tree never stops at the first broken port: failures, including
//! directory entries that cannot be read, are recorded next to the ports
//! that did load, so callers can report them and keep going.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::core::SourceControlFile;
use crate::sources::load_port;

/// A port that failed to load.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

/// Loaded ports, iterated in name order.
#[derive(Debug, Default)]
pub struct PortRegistry {
    ports: BTreeMap<String, SourceControlFile>,
    failures: Vec<LoadFailure>,
}

impl PortRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every immediate subdirectory of `root` as a port, in parallel.
    pub fn load_dir(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            bail!("ports directory not found: {}", root.display());
        }

        let mut registry = PortRegistry::new();
        let mut dirs = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    tracing::warn!("failed to read {}: {}", path.display(), err);
                    registry.failures.push(LoadFailure {
                        path,
                        error: anyhow::Error::new(err).context("failed to read ports directory"),
                    });
                    continue;
                }
            };
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if entry.file_type().is_dir() && !hidden {
                dirs.push(entry.into_path());
            }
        }

        tracing::debug!("loading {} port(s) from {}", dirs.len(), root.display());

        let results: Vec<(PathBuf, Result<SourceControlFile>)> = dirs
            .into_par_iter()
            .map(|dir| {
                let result = load_port(&dir);
                (dir, result)
            })
            .collect();

        for (path, result) in results {
            match result {
                Ok(scf) => {
                    if let Some(previous) = registry.insert(scf) {
                        tracing::warn!(
                            "port `{}` is defined more than once; using {}",
                            previous.name(),
                            path.display()
                        );
                    }
                }
                Err(error) => {
                    tracing::warn!("failed to load port {}: {:#}", path.display(), error);
                    registry.failures.push(LoadFailure { path, error });
                }
            }
        }

        Ok(registry)
    }

    /// Add a port, returning the one it replaced.
    pub fn insert(&mut self, scf: SourceControlFile) -> Option<SourceControlFile> {
        self.ports.insert(scf.name().to_string(), scf)
    }

    /// Look up a port by name.
    pub fn get(&self, name: &str) -> Option<&SourceControlFile> {
        self.ports.get(name)
    }

    /// Check if a port with the given name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate loaded ports in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceControlFile> {
        self.ports.values()
    }

    /// Ports that failed to load, in directory order.
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }
}

//! Durable environment registry.
//!
//! One JSON file per registry holds every [`EnvironmentRecord`], loaded once
//! per invocation and written back atomically (temp file in the same
//! directory, then rename) so a crash mid-write never yields a partially
//! written registry. The store does not watch the file for external changes:
//! burrow is single-writer-per-invocation, and concurrent invocations
//! against one registry are not coordinated.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BurrowError, Result};

use super::record::EnvironmentRecord;

/// Environment variable overriding the registry file location.
pub const REGISTRY_ENV: &str = "BURROW_REGISTRY";

const REGISTRY_FILENAME: &str = "registry.json";

/// The registry file contents: schema version plus records in insertion
/// order. `list()` preserves this order; nothing re-sorts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub version: u32,
    pub environments: Vec<EnvironmentRecord>,
}

impl Registry {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            environments: Vec::new(),
        }
    }
}

/// Handle on one registry file plus its in-memory snapshot.
#[derive(Debug)]
pub struct RegistryStore {
    path: PathBuf,
    registry: Registry,
}

impl RegistryStore {
    /// The default registry location: `$BURROW_REGISTRY` if set, otherwise
    /// `~/.burrow/registry.json`.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(REGISTRY_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("home directory not found"))?;
        Ok(home.join(".burrow").join(REGISTRY_FILENAME))
    }

    /// Load the registry at `path`.
    ///
    /// A missing file is an empty registry, not an error. A file that
    /// exists but cannot be parsed, or that carries a schema version this
    /// build does not understand, is fatal: no auto-repair, no silent
    /// migration.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let registry = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let registry: Registry =
                serde_json::from_str(&contents).map_err(|e| BurrowError::RegistryCorrupt {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            if registry.version != Registry::CURRENT_VERSION {
                return Err(BurrowError::RegistryCorrupt {
                    path,
                    message: format!(
                        "unsupported registry version {} (this build reads version {})",
                        registry.version,
                        Registry::CURRENT_VERSION
                    ),
                });
            }
            registry
        } else {
            Registry::default()
        };
        Ok(Self { path, registry })
    }

    /// Load the registry at the default location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Registry file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a record by name.
    pub fn get(&self, name: &str) -> Option<&EnvironmentRecord> {
        self.registry.environments.iter().find(|r| r.name == name)
    }

    /// All records, in insertion order.
    pub fn list(&self) -> &[EnvironmentRecord] {
        &self.registry.environments
    }

    /// Insert or replace a record by name, then persist atomically.
    pub fn upsert(&mut self, record: EnvironmentRecord) -> Result<()> {
        match self
            .registry
            .environments
            .iter()
            .position(|r| r.name == record.name)
        {
            Some(pos) => self.registry.environments[pos] = record,
            None => self.registry.environments.push(record),
        }
        self.save()
    }

    /// Remove a record by name, then persist atomically.
    ///
    /// Returns whether a record was actually removed.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let before = self.registry.environments.len();
        self.registry.environments.retain(|r| r.name != name);
        let removed = self.registry.environments.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Serialize the full registry to a temp file in the same directory,
    /// then rename it over the canonical path.
    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(&self.registry)
            .map_err(|e| anyhow::anyhow!("failed to serialize registry: {e}"))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents + "\n")?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

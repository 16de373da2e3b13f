//! Registry Store
//!
//! Owns the ledger file. Human edits remain possible (the validator is
//! the CI gate for those), but programmatic allocation goes through
//! [`RegistryStore::check_and_insert`]: the candidate is validated
//! against the full ledger and appended only when the merged ledger
//! stays clean, written atomically via temp file + rename.

use crate::model::{Registry, RegistryEntry};
use crate::validator::{validate, ValidationReport};
use std::path::{Path, PathBuf};
use tracing::info;

/// Fixed repository-root location of the ledger.
pub const DEFAULT_REGISTRY_PATH: &str = "registry.toml";

/// Store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Ledger file could not be read or written
    #[error("IO error on {path}: {source}")]
    Io {
        /// Ledger path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Ledger file is not valid TOML
    #[error("cannot parse ledger: {0}")]
    Parse(String),
    /// Ledger could not be serialized
    #[error("cannot serialize ledger: {0}")]
    Serialize(String),
    /// Candidate allocation violates a registry invariant
    #[error("allocation rejected:\n{report}")]
    Rejected {
        /// The violations the candidate would introduce
        report: ValidationReport,
    },
}

/// Handle on the ledger file
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Store at an explicit ledger path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the fixed repository-root location.
    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_REGISTRY_PATH)
    }

    /// The ledger path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full ledger. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Registry, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Registry::default()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        toml::from_str(&raw).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Write the ledger atomically: temp file in the same directory,
    /// then rename over the target.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let raw =
            toml::to_string_pretty(registry).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, raw).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Transactional check-and-insert.
    ///
    /// Validates the merged ledger (existing entries plus the candidate)
    /// and appends only when the result is clean. Violations already
    /// present in the ledger also reject the insert: appending to a
    /// broken ledger would launder the existing violation.
    pub fn check_and_insert(&self, entry: RegistryEntry) -> Result<(), StoreError> {
        let mut registry = self.load()?;
        registry.allocations.push(entry);

        let report = validate(&registry.allocations);
        if !report.is_clean() {
            return Err(StoreError::Rejected { report });
        }

        self.save(&registry)?;
        info!(
            path = %self.path.display(),
            entries = registry.len(),
            "allocation appended"
        );
        Ok(())
    }
}

//! CLI Commands

pub mod allocate;
pub mod derive;
pub mod layers;
pub mod name;
pub mod tags;
pub mod validate;

use anyhow::Context;
use enclave_registry::ClientTable;
use std::path::Path;

/// Load a per-layer client table from disk.
pub fn load_client_table(path: impl AsRef<Path>) -> anyhow::Result<ClientTable> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read client table {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("cannot parse client table {}", path.display()))
}

//! Layer output publication
//!
//! Each layer exclusively owns and publishes its own output bundle per
//! environment. Downstream layers read snapshots; nothing downstream can
//! mutate an upstream output. Republishing is append-stable: a key that
//! once existed for a client may not silently disappear.

use crate::layer::{Layer, LayerError};
use dashmap::DashMap;
use enclave_common::{ClientId, Environment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Version of the published output schema.
pub const SCHEMA_VERSION: u32 = 1;

/// One layer's published bundle for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOutput {
    /// The publishing layer
    pub layer: Layer,
    /// The environment this bundle belongs to
    pub environment: Environment,
    /// Schema version of the bundle
    pub schema_version: u32,
    /// Published fields per client
    pub clients: BTreeMap<ClientId, BTreeMap<String, String>>,
}

impl LayerOutput {
    /// Empty bundle at the current schema version.
    pub fn new(layer: Layer, environment: Environment) -> Self {
        Self {
            layer,
            environment,
            schema_version: SCHEMA_VERSION,
            clients: BTreeMap::new(),
        }
    }

    /// Set one published field for one client.
    pub fn insert(&mut self, client_id: ClientId, key: impl Into<String>, value: impl Into<String>) {
        self.clients
            .entry(client_id)
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Read one client's published fields.
    pub fn client(&self, client_id: &ClientId) -> Option<&BTreeMap<String, String>> {
        self.clients.get(client_id)
    }
}

/// In-memory store of every published layer output
#[derive(Debug, Default)]
pub struct LayerOutputStore {
    outputs: DashMap<(Layer, Environment), LayerOutput>,
}

impl LayerOutputStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or republish) one layer's bundle.
    ///
    /// Republication must be append-stable: every (client, key) present
    /// in the previous bundle must still exist, otherwise downstream
    /// layers holding references to it would silently break.
    pub fn publish(&self, output: LayerOutput) -> Result<(), LayerError> {
        let slot = (output.layer, output.environment.clone());
        if let Some(previous) = self.outputs.get(&slot) {
            for (client_id, old_fields) in &previous.clients {
                let new_fields = output.clients.get(client_id);
                for key in old_fields.keys() {
                    let still_there = new_fields.map(|f| f.contains_key(key)).unwrap_or(false);
                    if !still_there {
                        return Err(LayerError::SchemaRegression {
                            layer: output.layer,
                            environment: output.environment.clone(),
                            detail: format!("key '{key}' for client {client_id} was removed"),
                        });
                    }
                }
            }
        }
        info!(
            layer = %output.layer,
            environment = %output.environment,
            clients = output.clients.len(),
            "layer output published"
        );
        self.outputs.insert(slot, output);
        Ok(())
    }

    /// Snapshot one published bundle.
    pub fn get(&self, layer: Layer, environment: &Environment) -> Option<LayerOutput> {
        self.outputs
            .get(&(layer, environment.clone()))
            .map(|o| o.clone())
    }

    /// Load a set of bundles, e.g. a snapshot parsed from disk.
    pub fn load(&self, outputs: Vec<LayerOutput>) -> Result<(), LayerError> {
        for output in outputs {
            self.publish(output)?;
        }
        Ok(())
    }

    /// All published bundles, ordered by (layer, environment).
    pub fn snapshot(&self) -> Vec<LayerOutput> {
        let mut all: Vec<LayerOutput> = self.outputs.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| {
            (a.layer, &a.environment).cmp(&(b.layer, &b.environment))
        });
        all
    }
}

//! Registry and client table data model

use chrono::NaiveDate;
use enclave_common::{ClientId, ClientTier, Environment, Region};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One persisted allocation record
///
/// `client_id` and `address_block` are kept as raw strings so that a
/// malformed ledger entry can be loaded and reported by the validator
/// instead of aborting the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Client identifier as written in the ledger
    pub client_id: String,
    /// Allocated CIDR block as written in the ledger
    pub address_block: String,
    /// Deployment region
    pub region: String,
    /// Deployment environment
    pub environment: String,
    /// Date the block was allocated
    pub allocated_date: NaiveDate,
    /// Free-form allocation notes
    #[serde(default)]
    pub notes: String,
}

/// The full allocation ledger, one entry per client address block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    /// Allocations in ledger (append) order
    #[serde(default, rename = "allocation")]
    pub allocations: Vec<RegistryEntry>,
}

impl Registry {
    /// Number of allocations in the ledger.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Look up the allocation for one client.
    pub fn find(&self, client_id: &str) -> Option<&RegistryEntry> {
        self.allocations.iter().find(|e| e.client_id == client_id)
    }
}

/// Business metadata carried into resource tags, never into derivation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
    /// Short business code (tag `ClientCode`)
    #[serde(default)]
    pub client_code: Option<String>,
    /// Cost center (tag `CostCenter`)
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Business unit (tag `BusinessUnit`)
    #[serde(default)]
    pub business_unit: Option<String>,
    /// Any further attributes (industry, compliance tags, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

/// One onboarded client as configured in a per-layer client table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Stable client identifier
    pub client_id: ClientId,
    /// Master switch; a disabled client gets no resources in any layer
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Subscription tier
    #[serde(default)]
    pub tier: ClientTier,
    /// Allocated block; present in the foundation layer table only
    #[serde(default)]
    pub address_block: Option<Ipv4Net>,
    /// Deployment region
    pub region: Region,
    /// Deployment environment
    pub environment: Environment,
    /// Allowed ingress ports for this client's gateway tier
    #[serde(default)]
    pub ingress_ports: Vec<u16>,
    /// Business metadata, carried through to tags
    #[serde(default)]
    pub metadata: ClientMetadata,
}

/// A per-layer client table: the direct input to the namer, tagger, and
/// (in the foundation layer) the subnet deriver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientTable {
    /// All configured clients, enabled or not
    #[serde(default, rename = "client")]
    pub clients: Vec<ClientRecord>,
}

impl ClientTable {
    /// Clients with the master switch on.
    pub fn enabled(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter().filter(|c| c.enabled)
    }

    /// Look up one client.
    pub fn find(&self, client_id: &ClientId) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| &c.client_id == client_id)
    }
}

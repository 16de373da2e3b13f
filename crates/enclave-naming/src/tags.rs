//! Layered tag composition
//!
//! Tags are assembled as an ordered stack of layers: the standard keys
//! derived from the client record at the bottom, then caller layers in
//! the order they were added. On key collision the later layer always
//! wins. Rendering merges the stack into a `BTreeMap`, so iteration
//! order (and therefore any serialized form) is deterministic.

use enclave_registry::ClientRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Value of the `ManagedBy` tag on every resource.
pub const MANAGED_BY: &str = "enclave";

/// An ordered stack of tag layers
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagSet {
    layers: Vec<BTreeMap<String, String>>,
}

impl TagSet {
    /// Empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard base layer for one client: Client, ClientTier,
    /// ClientCode, CostCenter, BusinessUnit, Environment, ManagedBy,
    /// plus any further metadata attributes. Keys without a configured
    /// value are omitted rather than emitted empty.
    pub fn standard(record: &ClientRecord) -> Self {
        let mut base = BTreeMap::new();
        base.insert("Client".to_string(), record.client_id.to_string());
        base.insert("ClientTier".to_string(), record.tier.to_string());
        base.insert("Environment".to_string(), record.environment.to_string());
        base.insert("ManagedBy".to_string(), MANAGED_BY.to_string());
        if let Some(code) = &record.metadata.client_code {
            base.insert("ClientCode".to_string(), code.clone());
        }
        if let Some(cc) = &record.metadata.cost_center {
            base.insert("CostCenter".to_string(), cc.clone());
        }
        if let Some(bu) = &record.metadata.business_unit {
            base.insert("BusinessUnit".to_string(), bu.clone());
        }
        for (k, v) in &record.metadata.extra {
            base.insert(k.clone(), v.clone());
        }
        Self { layers: vec![base] }
    }

    /// Push a whole override layer; it wins over everything below it.
    pub fn with_layer(mut self, layer: BTreeMap<String, String>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Push a single-key override layer.
    pub fn set(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut layer = BTreeMap::new();
        layer.insert(key.into(), value.into());
        self.with_layer(layer)
    }

    /// Merge the stack, later layers winning on key collision.
    pub fn render(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for layer in &self.layers {
            for (k, v) in layer {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enclave_common::{ClientId, ClientTier, Environment, Region};
    use enclave_registry::ClientMetadata;

    fn record() -> ClientRecord {
        ClientRecord {
            client_id: ClientId::new("client-a").unwrap(),
            enabled: true,
            tier: ClientTier::Premium,
            address_block: Some("10.0.0.0/16".parse().unwrap()),
            region: Region::new("us-east-1").unwrap(),
            environment: Environment::new("prod").unwrap(),
            ingress_ports: vec![443],
            metadata: ClientMetadata {
                client_code: Some("acma".to_string()),
                cost_center: Some("cc-1001".to_string()),
                business_unit: Some("retail".to_string()),
                extra: [("Industry".to_string(), "retail".to_string())].into(),
            },
        }
    }

    #[test]
    fn test_standard_keys() {
        let tags = TagSet::standard(&record()).render();
        assert_eq!(tags.get("Client").unwrap(), "client-a");
        assert_eq!(tags.get("ClientTier").unwrap(), "premium");
        assert_eq!(tags.get("ClientCode").unwrap(), "acma");
        assert_eq!(tags.get("CostCenter").unwrap(), "cc-1001");
        assert_eq!(tags.get("BusinessUnit").unwrap(), "retail");
        assert_eq!(tags.get("Environment").unwrap(), "prod");
        assert_eq!(tags.get("ManagedBy").unwrap(), MANAGED_BY);
        assert_eq!(tags.get("Industry").unwrap(), "retail");
    }

    #[test]
    fn test_override_precedence() {
        let defaults: BTreeMap<_, _> = [
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ]
        .into();
        let overrides: BTreeMap<_, _> = [
            ("B".to_string(), "3".to_string()),
            ("C".to_string(), "4".to_string()),
        ]
        .into();

        let merged = TagSet::new().with_layer(defaults).with_layer(overrides).render();
        assert_eq!(merged.get("A").unwrap(), "1");
        assert_eq!(merged.get("B").unwrap(), "3");
        assert_eq!(merged.get("C").unwrap(), "4");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_caller_layer_beats_standard() {
        let tags = TagSet::standard(&record())
            .set("CostCenter", "cc-override")
            .render();
        assert_eq!(tags.get("CostCenter").unwrap(), "cc-override");
    }

    #[test]
    fn test_missing_metadata_keys_omitted() {
        let mut rec = record();
        rec.metadata = ClientMetadata::default();
        let tags = TagSet::standard(&rec).render();
        assert!(!tags.contains_key("ClientCode"));
        assert!(!tags.contains_key("CostCenter"));
        assert!(tags.contains_key("ManagedBy"));
    }
}

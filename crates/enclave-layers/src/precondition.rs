//! Layer entry preconditions
//!
//! A layer may only apply once every enabled client has every field the
//! layer's contract reads, in every upstream output. Misses are
//! collected across all clients and surfaced wholesale; provisioning a
//! partially-satisfied layer would leave inconsistent per-client
//! infrastructure, so the check is all-or-nothing.

use crate::contract::contract;
use crate::layer::{Layer, LayerError};
use crate::output::LayerOutputStore;
use enclave_common::{ClientId, Environment};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// One missing upstream field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReference {
    /// The client whose reference is missing
    pub client_id: ClientId,
    /// The upstream layer that should hold it
    pub upstream: Layer,
    /// The missing key
    pub key: String,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} needs '{}' from {}", self.client_id, self.key, self.upstream)
    }
}

/// Check a layer's entry precondition for one environment.
///
/// Returns `Ok(())` only when every enabled client satisfies the full
/// contract; otherwise every missing (client, upstream, key) is listed
/// in the error. An absent upstream bundle counts as every key missing
/// for every client.
pub fn check_preconditions(
    layer: Layer,
    environment: &Environment,
    enabled_clients: &[ClientId],
    store: &LayerOutputStore,
) -> Result<(), LayerError> {
    let mut missing = Vec::new();

    for requirement in contract(layer).requires {
        let upstream = store.get(requirement.layer, environment);
        for client_id in enabled_clients {
            let fields = upstream.as_ref().and_then(|o| o.client(client_id));
            for key in requirement.keys {
                let present = fields.map(|f| f.contains_key(*key)).unwrap_or(false);
                if !present {
                    missing.push(MissingReference {
                        client_id: client_id.clone(),
                        upstream: requirement.layer,
                        key: (*key).to_string(),
                    });
                }
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        warn!(
            layer = %layer,
            environment = %environment,
            missing = missing.len(),
            "layer precondition failed"
        );
        Err(LayerError::MissingUpstream { layer, missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::LayerOutput;

    fn env(s: &str) -> Environment {
        Environment::new(s).unwrap()
    }

    fn client(s: &str) -> ClientId {
        ClientId::new(s).unwrap()
    }

    fn foundation_for(store: &LayerOutputStore, clients: &[&str]) {
        let mut output = LayerOutput::new(Layer::Foundation, env("prod"));
        for c in clients {
            output.insert(client(c), "vpc_id", format!("vpc-{c}"));
            output.insert(client(c), "platform_subnet_ids", "subnet-1,subnet-2");
            output.insert(client(c), "database_subnet_ids", "subnet-3,subnet-4");
            output.insert(client(c), "compute_subnet_ids", "subnet-5,subnet-6");
            output.insert(client(c), "public_subnet_ids", "subnet-7,subnet-8");
            output.insert(client(c), "gateway_sg_id", format!("sg-{c}"));
        }
        store.publish(output).unwrap();
    }

    #[test]
    fn test_foundation_has_no_preconditions() {
        let store = LayerOutputStore::new();
        let clients = [client("client-a")];
        check_preconditions(Layer::Foundation, &env("prod"), &clients, &store).unwrap();
    }

    #[test]
    fn test_satisfied_platform_precondition() {
        let store = LayerOutputStore::new();
        foundation_for(&store, &["client-a", "client-b"]);
        let clients = [client("client-a"), client("client-b")];
        check_preconditions(Layer::Platform, &env("prod"), &clients, &store).unwrap();
    }

    #[test]
    fn test_one_missing_client_fails_whole_layer() {
        let store = LayerOutputStore::new();
        foundation_for(&store, &["client-a"]);
        let clients = [client("client-a"), client("client-b")];

        let err =
            check_preconditions(Layer::Platform, &env("prod"), &clients, &store).unwrap_err();
        match err {
            LayerError::MissingUpstream { layer, missing } => {
                assert_eq!(layer, Layer::Platform);
                // client-b misses both required foundation keys
                assert_eq!(missing.len(), 2);
                assert!(missing.iter().all(|m| m.client_id == client("client-b")));
                assert!(missing.iter().all(|m| m.upstream == Layer::Foundation));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absent_upstream_bundle_fails_every_client() {
        let store = LayerOutputStore::new();
        let clients = [client("client-a"), client("client-b")];
        let err =
            check_preconditions(Layer::Platform, &env("prod"), &clients, &store).unwrap_err();
        match err {
            LayerError::MissingUpstream { missing, .. } => {
                assert_eq!(missing.len(), 2 * 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_observability_reads_two_upstreams() {
        let store = LayerOutputStore::new();
        let clients = [client("client-a")];

        let mut platform = LayerOutput::new(Layer::Platform, env("prod"));
        platform.insert(client("client-a"), "cluster_name", "client-a-prod-cluster");
        platform.insert(client("client-a"), "cluster_endpoint", "https://cluster");
        platform.insert(client("client-a"), "cluster_sg_id", "sg-1");
        store.publish(platform).unwrap();

        // DNS zone not yet published: observability must refuse
        let err =
            check_preconditions(Layer::Observability, &env("prod"), &clients, &store).unwrap_err();
        assert!(matches!(err, LayerError::MissingUpstream { .. }));

        let mut services = LayerOutput::new(Layer::ClusterServices, env("prod"));
        services.insert(client("client-a"), "dns_zone_id", "zone-1");
        services.insert(client("client-a"), "ingress_hostname", "in.client-a.example");
        store.publish(services).unwrap();

        check_preconditions(Layer::Observability, &env("prod"), &clients, &store).unwrap();
    }
}

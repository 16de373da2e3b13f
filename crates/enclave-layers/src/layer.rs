//! The six ordered provisioning layers

use enclave_common::{EnclaveError, Environment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ordered provisioning layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// Network foundation: VPC, subnets, gateways, security groups
    Foundation,
    /// Container platform: the per-client cluster
    Platform,
    /// Managed databases
    Database,
    /// Standalone compute
    Compute,
    /// In-cluster services and DNS
    ClusterServices,
    /// Observability stack; terminal layer
    Observability,
}

impl Layer {
    /// All layers in apply order.
    pub fn all() -> [Layer; 6] {
        [
            Self::Foundation,
            Self::Platform,
            Self::Database,
            Self::Compute,
            Self::ClusterServices,
            Self::Observability,
        ]
    }

    /// The layer applied after this one, if any.
    pub fn next(&self) -> Option<Layer> {
        match self {
            Self::Foundation => Some(Self::Platform),
            Self::Platform => Some(Self::Database),
            Self::Database => Some(Self::Compute),
            Self::Compute => Some(Self::ClusterServices),
            Self::ClusterServices => Some(Self::Observability),
            Self::Observability => None,
        }
    }

    /// Canonical kebab-case form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Platform => "platform",
            Self::Database => "database",
            Self::Compute => "compute",
            Self::ClusterServices => "cluster-services",
            Self::Observability => "observability",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = EnclaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::all()
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| EnclaveError::InvalidIdentifier(format!("unknown layer '{s}'")))
    }
}

/// Layer composition failure
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// One or more enabled clients lack an upstream reference
    #[error("{layer} precondition failed: {} missing upstream reference(s)", missing.len())]
    MissingUpstream {
        /// The layer whose precondition failed
        layer: Layer,
        /// Every missing (client, upstream layer, key)
        missing: Vec<crate::precondition::MissingReference>,
    },
    /// Another apply holds this layer's state lock
    #[error("{layer}/{environment} is locked by another apply")]
    LockContention {
        /// The contended layer
        layer: Layer,
        /// The contended environment
        environment: Environment,
    },
    /// A published output dropped a key a downstream layer may read
    #[error("append-stability violated for {layer}/{environment}: {detail}")]
    SchemaRegression {
        /// The layer being republished
        layer: Layer,
        /// The environment being republished
        environment: Environment,
        /// Which key disappeared for which client
        detail: String,
    },
}

impl From<LayerError> for EnclaveError {
    fn from(e: LayerError) -> Self {
        match e {
            LayerError::MissingUpstream { .. } => {
                EnclaveError::MissingUpstreamReference(e.to_string())
            }
            LayerError::LockContention { .. } => EnclaveError::LockContention(e.to_string()),
            other => EnclaveError::MissingUpstreamReference(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert_eq!(Layer::Foundation.next(), Some(Layer::Platform));
        assert_eq!(Layer::ClusterServices.next(), Some(Layer::Observability));
        assert_eq!(Layer::Observability.next(), None);
    }

    #[test]
    fn test_all_covers_the_chain() {
        let layers = Layer::all();
        for pair in layers.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert!(layers[0] < layers[5]);
    }

    #[test]
    fn test_from_str_round_trip() {
        for layer in Layer::all() {
            assert_eq!(layer.as_str().parse::<Layer>().unwrap(), layer);
        }
        assert!("warehouse".parse::<Layer>().is_err());
    }
}

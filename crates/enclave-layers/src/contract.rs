//! Typed layer contracts
//!
//! Each layer declares the shape of data it reads from upstream and the
//! shape it publishes, replacing "hope the keys exist" remote-state
//! lookups with a checkable interface.

use crate::layer::Layer;

/// Keys one layer reads from one upstream layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// The upstream layer read from
    pub layer: Layer,
    /// Keys that must exist for every enabled client
    pub keys: &'static [&'static str],
}

/// What a layer consumes and publishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerContract {
    /// The layer this contract describes
    pub layer: Layer,
    /// Upstream outputs and the keys read from each
    pub requires: &'static [Requirement],
    /// Keys this layer publishes per client
    pub publishes: &'static [&'static str],
}

const FOUNDATION_REQUIRES: &[Requirement] = &[];
const PLATFORM_REQUIRES: &[Requirement] = &[Requirement {
    layer: Layer::Foundation,
    keys: &["vpc_id", "platform_subnet_ids"],
}];
const DATABASE_REQUIRES: &[Requirement] = &[Requirement {
    layer: Layer::Foundation,
    keys: &["vpc_id", "database_subnet_ids"],
}];
const COMPUTE_REQUIRES: &[Requirement] = &[Requirement {
    layer: Layer::Foundation,
    keys: &["vpc_id", "compute_subnet_ids"],
}];
const CLUSTER_SERVICES_REQUIRES: &[Requirement] = &[Requirement {
    layer: Layer::Platform,
    keys: &["cluster_name", "cluster_endpoint"],
}];
const OBSERVABILITY_REQUIRES: &[Requirement] = &[
    Requirement {
        layer: Layer::Platform,
        keys: &["cluster_name"],
    },
    Requirement {
        layer: Layer::ClusterServices,
        keys: &["dns_zone_id"],
    },
];

/// The contract for one layer.
pub fn contract(layer: Layer) -> LayerContract {
    match layer {
        Layer::Foundation => LayerContract {
            layer,
            requires: FOUNDATION_REQUIRES,
            publishes: &[
                "vpc_id",
                "public_subnet_ids",
                "platform_subnet_ids",
                "database_subnet_ids",
                "compute_subnet_ids",
                "gateway_sg_id",
            ],
        },
        Layer::Platform => LayerContract {
            layer,
            requires: PLATFORM_REQUIRES,
            publishes: &["cluster_name", "cluster_endpoint", "cluster_sg_id"],
        },
        Layer::Database => LayerContract {
            layer,
            requires: DATABASE_REQUIRES,
            publishes: &["db_endpoint", "db_sg_id"],
        },
        Layer::Compute => LayerContract {
            layer,
            requires: COMPUTE_REQUIRES,
            publishes: &["asg_name", "compute_sg_id"],
        },
        Layer::ClusterServices => LayerContract {
            layer,
            requires: CLUSTER_SERVICES_REQUIRES,
            publishes: &["ingress_hostname", "dns_zone_id"],
        },
        Layer::Observability => LayerContract {
            layer,
            requires: OBSERVABILITY_REQUIRES,
            publishes: &["dashboard_url", "log_group"],
        },
    }
}

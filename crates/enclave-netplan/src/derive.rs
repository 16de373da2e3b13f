//! Subnet Deriver
//!
//! Carves one client's address block into per-tier, per-zone subnets by
//! binary subnetting. No external state: the output is a pure function
//! of (block, zones, layout).

use crate::cidr;
use crate::layout::{SubnetLayout, SubnetTier};
use enclave_common::EnclaveError;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Widest parent prefix that leaves room for every tier.
pub const MAX_PARENT_PREFIX: u8 = 16;

/// One derived subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSubnet {
    /// Purpose tier
    pub tier: SubnetTier,
    /// The carved-out block
    pub subnet: Ipv4Net,
    /// Availability zone this subnet serves
    pub zone: String,
}

/// The full partitioning of one client's address block
///
/// Ordered by (tier, zone index) so repeated derivations diff cleanly.
/// Never persisted; always recomputed from its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSubnetSet {
    /// The parent address block
    pub parent: Ipv4Net,
    /// Derived subnets in stable order
    pub subnets: Vec<DerivedSubnet>,
}

impl DerivedSubnetSet {
    /// Iterate over all derived subnets in stable order.
    pub fn iter(&self) -> impl Iterator<Item = &DerivedSubnet> {
        self.subnets.iter()
    }

    /// Subnets of one tier, in zone order.
    pub fn for_tier(&self, tier: SubnetTier) -> Vec<&DerivedSubnet> {
        self.subnets.iter().filter(|s| s.tier == tier).collect()
    }

    /// Number of derived subnets.
    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }
}

/// Derivation failure
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    /// Fewer than two zones supplied
    #[error("need at least 2 availability zones, got {0}")]
    InvalidZoneCount(usize),
    /// The same zone appears twice
    #[error("duplicate availability zone '{0}'")]
    DuplicateZone(String),
    /// Parent block cannot fit the tier scheme
    #[error("insufficient address space in {block}: {detail}")]
    InsufficientAddressSpace {
        /// The parent block
        block: Ipv4Net,
        /// What did not fit
        detail: String,
    },
    /// Parent block outside RFC 1918 space
    #[error("{0} is outside RFC 1918 private space")]
    NotPrivate(Ipv4Net),
    /// The layout produced colliding sub-blocks
    #[error("layout collision: {0}")]
    LayoutCollision(String),
}

impl From<DeriveError> for EnclaveError {
    fn from(e: DeriveError) -> Self {
        match e {
            DeriveError::InvalidZoneCount(n) => {
                EnclaveError::InvalidZoneCount(format!("need at least 2 availability zones, got {n}"))
            }
            DeriveError::DuplicateZone(z) => {
                EnclaveError::InvalidZoneCount(format!("duplicate availability zone '{z}'"))
            }
            DeriveError::InsufficientAddressSpace { block, detail } => {
                EnclaveError::InsufficientAddressSpace(format!("{block}: {detail}"))
            }
            DeriveError::NotPrivate(b) => EnclaveError::PrivateRangeViolation(b.to_string()),
            DeriveError::LayoutCollision(msg) => EnclaveError::LayoutCollision(msg),
        }
    }
}

/// Derive with the standard tier layout.
pub fn derive(block: Ipv4Net, zones: &[String]) -> Result<DerivedSubnetSet, DeriveError> {
    derive_with_layout(block, zones, &SubnetLayout::standard())
}

/// Derive a client's subnet partitioning under an explicit layout.
///
/// Zone `z` of a tier takes subnet index `base_index + z` at prefix
/// `parent + newbits`. The result is verified pairwise-disjoint before
/// it is returned: a layout whose index ranges touch yields
/// [`DeriveError::LayoutCollision`], never an overlapping set.
pub fn derive_with_layout(
    block: Ipv4Net,
    zones: &[String],
    layout: &SubnetLayout,
) -> Result<DerivedSubnetSet, DeriveError> {
    if zones.len() < 2 {
        return Err(DeriveError::InvalidZoneCount(zones.len()));
    }
    let mut seen = HashSet::new();
    for zone in zones {
        if !seen.insert(zone.as_str()) {
            return Err(DeriveError::DuplicateZone(zone.clone()));
        }
    }
    if !cidr::is_rfc1918(&block) {
        return Err(DeriveError::NotPrivate(block));
    }
    let parent = block.trunc();
    if parent.prefix_len() > MAX_PARENT_PREFIX {
        return Err(DeriveError::InsufficientAddressSpace {
            block: parent,
            detail: format!(
                "prefix /{} is narrower than the /{MAX_PARENT_PREFIX} the tier scheme requires",
                parent.prefix_len()
            ),
        });
    }

    let mut subnets = Vec::with_capacity(layout.tiers.len() * zones.len());
    for tier in &layout.tiers {
        let widened = parent.prefix_len() as u32 + tier.newbits as u32;
        if widened > 32 {
            return Err(DeriveError::InsufficientAddressSpace {
                block: parent,
                detail: format!(
                    "{} tier widens /{} past /32",
                    tier.tier,
                    parent.prefix_len()
                ),
            });
        }
        let child_prefix = widened as u8;
        let capacity: u64 = 1 << tier.newbits;
        let last_index = tier.base_index as u64 + zones.len() as u64 - 1;
        if last_index >= capacity {
            return Err(DeriveError::InsufficientAddressSpace {
                block: parent,
                detail: format!(
                    "{} tier needs subnet index {last_index} but /{child_prefix} space holds {capacity}",
                    tier.tier
                ),
            });
        }
        let mut children = parent
            .subnets(child_prefix)
            .map_err(|_| DeriveError::InsufficientAddressSpace {
                block: parent,
                detail: format!("cannot widen /{} by {} bits", parent.prefix_len(), tier.newbits),
            })?
            .skip(tier.base_index as usize);
        for zone in zones {
            let subnet = children
                .next()
                .ok_or_else(|| DeriveError::InsufficientAddressSpace {
                    block: parent,
                    detail: format!("{} tier ran out of /{child_prefix} subnets", tier.tier),
                })?;
            subnets.push(DerivedSubnet {
                tier: tier.tier,
                subnet,
                zone: zone.clone(),
            });
        }
    }

    verify_disjoint(&subnets)?;
    debug!(
        parent = %parent,
        zones = zones.len(),
        subnets = subnets.len(),
        "derived subnet set"
    );
    Ok(DerivedSubnetSet { parent, subnets })
}

/// Pairwise disjointness over the final set. The standard layout cannot
/// collide for the supported zone counts, but the layout is caller
/// supplied, so the set is verified before it leaves this module.
fn verify_disjoint(subnets: &[DerivedSubnet]) -> Result<(), DeriveError> {
    for (i, a) in subnets.iter().enumerate() {
        for b in &subnets[i + 1..] {
            if cidr::overlaps(&a.subnet, &b.subnet) {
                return Err(DeriveError::LayoutCollision(format!(
                    "{}/{} ({}) overlaps {}/{} ({})",
                    a.tier, a.zone, a.subnet, b.tier, b.zone, b.subnet
                )));
            }
        }
    }
    Ok(())
}

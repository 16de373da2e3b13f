//! Enclave Netplan - CIDR math and subnet derivation
//!
//! Deterministically partitions one client's address block into
//! purpose-tier subnets replicated across availability zones. Everything
//! here is a pure function: same block, zones, and layout always produce
//! the same `DerivedSubnetSet`, bit for bit, so re-running under the
//! provisioning tool's state lock is always safe.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cidr;
pub mod derive;
pub mod layout;

pub use derive::{derive, derive_with_layout, DeriveError, DerivedSubnet, DerivedSubnetSet};
pub use layout::{SubnetLayout, SubnetTier, TierLayout};

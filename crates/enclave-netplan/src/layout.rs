//! Tier layout: the fixed bit-offset scheme for subnet partitioning
//!
//! The constants here decide where each purpose tier lands inside a
//! client's address block. They are plain values, not hard-coded into
//! the deriver, so a deployment with pre-existing allocations can carry
//! its own layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose tier of a derived subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetTier {
    /// Internet-facing gateway tier
    Public,
    /// Container-orchestration tier
    Platform,
    /// Database tier
    Database,
    /// General compute tier
    Compute,
}

impl SubnetTier {
    /// Canonical lowercase form used in names and tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Platform => "platform",
            Self::Database => "database",
            Self::Compute => "compute",
        }
    }

    /// All tiers in derivation order.
    pub fn all() -> [SubnetTier; 4] {
        [Self::Public, Self::Platform, Self::Database, Self::Compute]
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one tier is carved out of the parent block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLayout {
    /// Which tier this entry lays out
    pub tier: SubnetTier,
    /// How many bits the parent prefix is widened by
    pub newbits: u8,
    /// First subnet index; zone `z` takes index `base_index + z`
    pub base_index: u32,
}

impl TierLayout {
    /// Build a layout entry.
    pub fn new(tier: SubnetTier, newbits: u8, base_index: u32) -> Self {
        Self {
            tier,
            newbits,
            base_index,
        }
    }
}

/// Prefix widening for the public, database, and compute tiers (/16 -> /24).
pub const NARROW_TIER_NEWBITS: u8 = 8;
/// Prefix widening for the platform tier (/16 -> /20).
pub const PLATFORM_NEWBITS: u8 = 4;
/// First subnet index of the public tier.
pub const PUBLIC_BASE_INDEX: u32 = 0;
/// First subnet index of the platform tier. Index 0 of the /20 space
/// covers /24 indices 0-15, where the public tier lives.
pub const PLATFORM_BASE_INDEX: u32 = 1;
/// First subnet index of the database tier. Platform /20 blocks for N
/// zones occupy /24 indices 16..16*(N+1); 192 clears that range for up
/// to 10 zones.
pub const DATABASE_BASE_INDEX: u32 = 192;
/// First subnet index of the compute tier.
pub const COMPUTE_BASE_INDEX: u32 = 224;

/// Ordered tier layouts for one deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetLayout {
    /// Tier entries in derivation order
    pub tiers: Vec<TierLayout>,
}

impl SubnetLayout {
    /// Layout with the standard tier offsets.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                TierLayout::new(SubnetTier::Public, NARROW_TIER_NEWBITS, PUBLIC_BASE_INDEX),
                TierLayout::new(SubnetTier::Platform, PLATFORM_NEWBITS, PLATFORM_BASE_INDEX),
                TierLayout::new(SubnetTier::Database, NARROW_TIER_NEWBITS, DATABASE_BASE_INDEX),
                TierLayout::new(SubnetTier::Compute, NARROW_TIER_NEWBITS, COMPUTE_BASE_INDEX),
            ],
        }
    }

    /// The widest prefix widening across all tiers.
    pub fn max_newbits(&self) -> u8 {
        self.tiers.iter().map(|t| t.newbits).max().unwrap_or(0)
    }
}

impl Default for SubnetLayout {
    fn default() -> Self {
        Self::standard()
    }
}

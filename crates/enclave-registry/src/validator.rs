//! Allocation Validator
//!
//! Proves the registry's global invariants before provisioning: every
//! block well-formed, inside RFC 1918 space, and disjoint from every
//! other allocation regardless of region. The validator only reports;
//! deciding to block an apply is the caller's job (in practice, CI).

use crate::model::RegistryEntry;
use enclave_common::ClientId;
use enclave_netplan::cidr;
use ipnet::Ipv4Net;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::info;

/// A malformed CIDR or identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatViolation {
    /// Client the entry belongs to, as written
    pub client_id: String,
    /// Which field is malformed
    pub field: &'static str,
    /// What is wrong with it
    pub reason: String,
}

/// Two allocations sharing address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapViolation {
    /// First entry of the pair
    pub first_client: String,
    /// First entry's block
    pub first_block: String,
    /// Second entry of the pair
    pub second_client: String,
    /// Second entry's block
    pub second_block: String,
    /// How the two ranges intersect
    pub description: String,
}

/// An allocation outside RFC 1918 private space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateRangeViolation {
    /// Client the entry belongs to
    pub client_id: String,
    /// The offending block
    pub address_block: String,
}

/// Everything the validator found in one scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Total ledger entries scanned
    pub scanned: usize,
    /// Malformed CIDRs and identifiers
    pub format_violations: Vec<FormatViolation>,
    /// Duplicate or numerically overlapping allocation pairs
    pub overlaps: Vec<OverlapViolation>,
    /// Allocations outside 10/8, 172.16/12, 192.168/16
    pub private_range_violations: Vec<PrivateRangeViolation>,
}

impl ValidationReport {
    /// True when no violations of any kind were found.
    pub fn is_clean(&self) -> bool {
        self.format_violations.is_empty()
            && self.overlaps.is_empty()
            && self.private_range_violations.is_empty()
    }

    /// Total violations across all categories.
    pub fn violation_count(&self) -> usize {
        self.format_violations.len() + self.overlaps.len() + self.private_range_violations.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "registry validation: {} entries scanned", self.scanned)?;
        if self.is_clean() {
            return writeln!(f, "no violations found");
        }
        for v in &self.format_violations {
            writeln!(f, "  format [{}] {}: {}", v.client_id, v.field, v.reason)?;
        }
        for v in &self.overlaps {
            writeln!(
                f,
                "  overlap [{} {}] vs [{} {}]: {}",
                v.first_client, v.first_block, v.second_client, v.second_block, v.description
            )?;
        }
        for v in &self.private_range_violations {
            writeln!(
                f,
                "  private-range [{}] {} is outside RFC 1918 space",
                v.client_id, v.address_block
            )?;
        }
        writeln!(f, "{} violation(s) found", self.violation_count())
    }
}

/// Scan the full ledger and report every invariant violation.
///
/// Pure over its input, order-insensitive, and total: a malformed entry
/// is reported and excluded from overlap comparison rather than
/// panicking or aborting the scan. An empty registry is trivially clean.
pub fn validate(entries: &[RegistryEntry]) -> ValidationReport {
    let mut report = ValidationReport {
        scanned: entries.len(),
        ..Default::default()
    };

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut parsed: Vec<(&RegistryEntry, Ipv4Net)> = Vec::with_capacity(entries.len());

    for entry in entries {
        if let Err(e) = ClientId::new(&entry.client_id) {
            report.format_violations.push(FormatViolation {
                client_id: entry.client_id.clone(),
                field: "client_id",
                reason: e.to_string(),
            });
        } else if !seen_ids.insert(&entry.client_id) {
            report.format_violations.push(FormatViolation {
                client_id: entry.client_id.clone(),
                field: "client_id",
                reason: "client_id appears more than once in the ledger".to_string(),
            });
        }

        match cidr::parse_cidr(&entry.address_block) {
            Ok(net) => parsed.push((entry, net)),
            Err(e) => report.format_violations.push(FormatViolation {
                client_id: entry.client_id.clone(),
                field: "address_block",
                reason: e.to_string(),
            }),
        }
    }

    for (entry, net) in &parsed {
        if !cidr::is_rfc1918(net) {
            report.private_range_violations.push(PrivateRangeViolation {
                client_id: entry.client_id.clone(),
                address_block: entry.address_block.clone(),
            });
        }
    }

    for (i, (a_entry, a_net)) in parsed.iter().enumerate() {
        for (b_entry, b_net) in &parsed[i + 1..] {
            if !cidr::overlaps(a_net, b_net) {
                continue;
            }
            let description = if a_net == b_net {
                "identical blocks".to_string()
            } else if a_net.contains(b_net) {
                format!("{b_net} is contained in {a_net}")
            } else {
                format!("{a_net} is contained in {b_net}")
            };
            report.overlaps.push(OverlapViolation {
                first_client: a_entry.client_id.clone(),
                first_block: a_entry.address_block.clone(),
                second_client: b_entry.client_id.clone(),
                second_block: b_entry.address_block.clone(),
                description,
            });
        }
    }

    info!(
        scanned = report.scanned,
        violations = report.violation_count(),
        "registry scan complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(client_id: &str, block: &str) -> RegistryEntry {
        RegistryEntry {
            client_id: client_id.to_string(),
            address_block: block.to_string(),
            region: "us-east-1".to_string(),
            environment: "prod".to_string(),
            allocated_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_empty_registry_is_clean() {
        let report = validate(&[]);
        assert!(report.is_clean());
        assert_eq!(report.scanned, 0);
    }

    #[test]
    fn test_disjoint_blocks_are_clean() {
        let entries = vec![
            entry("client-a", "10.0.0.0/16"),
            entry("client-b", "10.1.0.0/16"),
            entry("client-c", "172.16.0.0/16"),
        ];
        let report = validate(&entries);
        assert!(report.is_clean(), "{report}");
        assert_eq!(report.scanned, 3);
    }

    #[test]
    fn test_identical_blocks_reported_once() {
        let entries = vec![
            entry("client-a", "10.0.0.0/16"),
            entry("client-b", "10.0.0.0/16"),
        ];
        let report = validate(&entries);
        assert_eq!(report.overlaps.len(), 1);
        let v = &report.overlaps[0];
        assert_eq!(v.first_client, "client-a");
        assert_eq!(v.second_client, "client-b");
        assert_eq!(v.description, "identical blocks");
    }

    #[test]
    fn test_numeric_overlap_across_prefix_lengths() {
        let entries = vec![
            entry("client-a", "10.0.0.0/16"),
            entry("client-c", "10.0.128.0/17"),
        ];
        let report = validate(&entries);
        assert_eq!(report.overlaps.len(), 1);
        assert!(report.overlaps[0].description.contains("contained in"));
    }

    #[test]
    fn test_non_private_block_flagged() {
        let report = validate(&[entry("client-a", "8.8.0.0/16")]);
        assert_eq!(report.private_range_violations.len(), 1);
        assert!(report.overlaps.is_empty());
    }

    #[test]
    fn test_malformed_block_excluded_from_overlap() {
        let entries = vec![
            entry("client-a", "not-a-cidr"),
            entry("client-b", "10.0.0.0/16"),
        ];
        let report = validate(&entries);
        assert_eq!(report.format_violations.len(), 1);
        assert!(report.overlaps.is_empty());
    }

    #[test]
    fn test_bad_client_id_reported() {
        let report = validate(&[entry("Client_A", "10.0.0.0/16")]);
        assert_eq!(report.format_violations.len(), 1);
        assert_eq!(report.format_violations[0].field, "client_id");
    }

    #[test]
    fn test_duplicate_client_id_reported() {
        let entries = vec![
            entry("client-a", "10.0.0.0/16"),
            entry("client-a", "10.1.0.0/16"),
        ];
        let report = validate(&entries);
        assert_eq!(report.format_violations.len(), 1);
        assert!(report.format_violations[0].reason.contains("more than once"));
    }

    #[test]
    fn test_report_is_order_insensitive() {
        let mut entries = vec![
            entry("client-a", "10.0.0.0/16"),
            entry("client-b", "10.0.128.0/17"),
            entry("client-c", "192.168.0.0/24"),
        ];
        let forward = validate(&entries);
        entries.reverse();
        let backward = validate(&entries);
        assert_eq!(forward.violation_count(), backward.violation_count());
        assert_eq!(forward.overlaps.len(), backward.overlaps.len());
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entry(client_id: &str, block: &str) -> RegistryEntry {
        RegistryEntry {
            client_id: client_id.to_string(),
            address_block: block.to_string(),
            region: "us-east-1".to_string(),
            environment: "prod".to_string(),
            allocated_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            notes: String::new(),
        }
    }

    proptest! {
        // Distinct /16s under 10/8 can never overlap
        #[test]
        fn prop_disjoint_sixteens_validate_clean(mut seconds in proptest::collection::hash_set(0u8..=255, 1..20)) {
            let entries: Vec<RegistryEntry> = seconds
                .drain()
                .map(|s| entry(&format!("client-{s}"), &format!("10.{s}.0.0/16")))
                .collect();
            let report = validate(&entries);
            prop_assert!(report.is_clean());
        }

        // Arbitrary garbage never panics the scan
        #[test]
        fn prop_garbage_blocks_never_panic(blocks in proptest::collection::vec(".*", 0..10)) {
            let entries: Vec<RegistryEntry> = blocks
                .iter()
                .enumerate()
                .map(|(i, b)| entry(&format!("client-{i}"), b))
                .collect();
            let report = validate(&entries);
            prop_assert_eq!(report.scanned, entries.len());
        }
    }
}

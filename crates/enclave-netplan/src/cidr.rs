//! CIDR parsing and range predicates shared by the validator and deriver

use enclave_common::{EnclaveError, EnclaveResult};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// The RFC 1918 private-use ranges.
pub fn rfc1918_blocks() -> [Ipv4Net; 3] {
    [
        Ipv4Net::new(Ipv4Addr::new(10, 0, 0, 0), 8).unwrap(),
        Ipv4Net::new(Ipv4Addr::new(172, 16, 0, 0), 12).unwrap(),
        Ipv4Net::new(Ipv4Addr::new(192, 168, 0, 0), 16).unwrap(),
    ]
}

/// Whether the block lies entirely inside RFC 1918 private space.
pub fn is_rfc1918(block: &Ipv4Net) -> bool {
    rfc1918_blocks().iter().any(|r| r.contains(block))
}

/// Whether two blocks share any addresses.
///
/// CIDR blocks are aligned power-of-two ranges, so two blocks intersect
/// exactly when one contains the other.
pub fn overlaps(a: &Ipv4Net, b: &Ipv4Net) -> bool {
    a.contains(b) || b.contains(a)
}

/// Parse canonical CIDR notation: dotted quad, `/`, prefix 0-32.
pub fn parse_cidr(raw: &str) -> EnclaveResult<Ipv4Net> {
    raw.parse::<Ipv4Net>().map_err(|e| {
        EnclaveError::FormatViolation(format!("'{raw}' is not a valid IPv4 CIDR block: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_rfc1918_membership() {
        assert!(is_rfc1918(&net("10.42.0.0/16")));
        assert!(is_rfc1918(&net("172.16.0.0/12")));
        assert!(is_rfc1918(&net("172.31.255.0/24")));
        assert!(is_rfc1918(&net("192.168.1.0/24")));
    }

    #[test]
    fn test_outside_rfc1918() {
        assert!(!is_rfc1918(&net("8.8.8.0/24")));
        assert!(!is_rfc1918(&net("172.32.0.0/16")));
        assert!(!is_rfc1918(&net("192.169.0.0/16")));
        // Straddles the 10/8 boundary, so it is not contained
        assert!(!is_rfc1918(&net("0.0.0.0/0")));
    }

    #[test]
    fn test_overlap_containment_both_directions() {
        assert!(overlaps(&net("10.0.0.0/16"), &net("10.0.128.0/17")));
        assert!(overlaps(&net("10.0.128.0/17"), &net("10.0.0.0/16")));
        assert!(overlaps(&net("10.0.0.0/16"), &net("10.0.0.0/16")));
        assert!(!overlaps(&net("10.0.0.0/16"), &net("10.1.0.0/16")));
    }

    #[test]
    fn test_parse_cidr_rejects_garbage() {
        assert!(parse_cidr("10.0.0.0/16").is_ok());
        assert!(parse_cidr("10.0.0.0").is_err());
        assert!(parse_cidr("10.0.0.256/16").is_err());
        assert!(parse_cidr("10.0.0.0/33").is_err());
        assert!(parse_cidr("not-a-cidr").is_err());
    }
}

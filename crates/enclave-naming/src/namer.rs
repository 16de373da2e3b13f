//! Resource Namer

use enclave_common::{ClientId, EnclaveError, EnclaveResult, Environment, Region};
use enclave_registry::ClientRecord;

/// Separator between name components.
pub const SEPARATOR: char = '-';

/// Names resources for one (client, environment, region) identity
///
/// Names take the form `client-environment-region-kind[-qualifier]`.
/// The environment, `kind`, and `qualifier` components are hyphen-free
/// `[a-z0-9]` tokens, so only the non-adjacent client and region fields
/// can carry hyphens: within one region, distinct identities always
/// render distinct names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNamer {
    client_id: ClientId,
    environment: Environment,
    region: Region,
}

impl ResourceNamer {
    /// Namer for an explicit identity.
    pub fn new(client_id: ClientId, environment: Environment, region: Region) -> Self {
        Self {
            client_id,
            environment,
            region,
        }
    }

    /// Namer for a configured client.
    pub fn for_client(record: &ClientRecord) -> Self {
        Self::new(
            record.client_id.clone(),
            record.environment.clone(),
            record.region.clone(),
        )
    }

    /// The client this namer serves.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Build the name for one resource kind, optionally qualified
    /// (e.g. a zone suffix or an index).
    pub fn name(&self, kind: &str, qualifier: Option<&str>) -> EnclaveResult<String> {
        check_component("resource_kind", kind)?;
        let mut out = format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{kind}",
            self.client_id, self.environment, self.region
        );
        if let Some(q) = qualifier {
            check_component("qualifier", q)?;
            out.push(SEPARATOR);
            out.push_str(q);
        }
        Ok(out)
    }
}

/// Kind and qualifier tokens: non-empty, lowercase alphanumeric only.
fn check_component(kind: &str, value: &str) -> EnclaveResult<()> {
    if value.is_empty() {
        return Err(EnclaveError::InvalidIdentifier(format!("{kind} is empty")));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
    {
        return Err(EnclaveError::InvalidIdentifier(format!(
            "{kind} '{value}' contains '{bad}' (allowed: [a-z0-9])"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn namer(client: &str, env: &str, region: &str) -> ResourceNamer {
        ResourceNamer::new(
            ClientId::new(client).unwrap(),
            Environment::new(env).unwrap(),
            Region::new(region).unwrap(),
        )
    }

    #[test]
    fn test_name_shape() {
        let n = namer("client-a", "prod", "us-east-1");
        assert_eq!(n.name("vpc", None).unwrap(), "client-a-prod-us-east-1-vpc");
        assert_eq!(
            n.name("subnet", Some("az1")).unwrap(),
            "client-a-prod-us-east-1-subnet-az1"
        );
    }

    #[test]
    fn test_name_is_stable() {
        let n = namer("client-a", "prod", "us-east-1");
        assert_eq!(n.name("db", Some("rw")).unwrap(), n.name("db", Some("rw")).unwrap());
    }

    #[test]
    fn test_uppercase_kind_rejected_not_sanitized() {
        let n = namer("client-a", "prod", "us-east-1");
        assert!(n.name("VPC", None).is_err());
        assert!(n.name("v_pc", None).is_err());
        assert!(n.name("sub-net", None).is_err());
    }

    #[test]
    fn test_hyphenated_client_keeps_boundaries_unambiguous() {
        // ("client-a", "prod") and ("client", "a-prod") would render the
        // same prefix, but a hyphenated environment cannot be built.
        assert!(Environment::new("a-prod").is_err());

        let a = namer("client-a", "prod", "us-east-1").name("vpc", None).unwrap();
        let b = namer("client", "a", "us-east-1").name("vpc", None).unwrap();
        assert_eq!(a, "client-a-prod-us-east-1-vpc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_injective_over_distinct_tuples() {
        let clients = ["client-a", "client-b"];
        let envs = ["prod", "staging"];
        let regions = ["us-east-1", "eu-west-2"];
        let kinds = ["vpc", "subnet", "cluster"];
        let qualifiers = [None, Some("az1"), Some("az2")];

        let mut seen = HashSet::new();
        for c in clients {
            for e in envs {
                for r in regions {
                    let n = namer(c, e, r);
                    for k in kinds {
                        for q in qualifiers {
                            let name = n.name(k, q).unwrap();
                            assert!(seen.insert(name.clone()), "collision on {name}");
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), 2 * 2 * 2 * 3 * 3);
    }
}

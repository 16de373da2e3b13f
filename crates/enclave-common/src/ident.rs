//! Validated identifier value objects
//!
//! Every identifier that ends up in a resource name is validated at
//! construction. Invalid input is rejected, never sanitized, so a value
//! of these types is always safe to concatenate into names and tags.

use crate::error::{EnclaveError, EnclaveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check one identifier token: non-empty, `[a-z0-9-]`, no edge hyphens.
fn check_token(kind: &str, value: &str) -> EnclaveResult<()> {
    if value.is_empty() {
        return Err(EnclaveError::InvalidIdentifier(format!("{kind} is empty")));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(EnclaveError::InvalidIdentifier(format!(
            "{kind} '{value}' has a leading or trailing hyphen"
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(EnclaveError::InvalidIdentifier(format!(
            "{kind} '{value}' contains '{bad}' (allowed: [a-z0-9-])"
        )));
    }
    Ok(())
}

/// Check a hyphen-free token: non-empty, `[a-z0-9]`.
fn check_plain_token(kind: &str, value: &str) -> EnclaveResult<()> {
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

/// Stable lowercase-hyphenated client identifier
///
/// Unique system-wide, immutable once resources exist for the client.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: &str) -> EnclaveResult<Self> {
        check_token("client_id", value)?;
        Ok(Self(value.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Deployment environment (e.g. `prod`, `staging`)
///
/// Hyphen-free: the environment sits between two hyphen-bearing fields
/// in every resource name, and a hyphen here would make the component
/// boundaries ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    /// Validate and wrap a raw environment name.
    pub fn new(value: &str) -> EnclaveResult<Self> {
        check_plain_token("environment", value)?;
        Ok(Self(value.to_string()))
    }

    /// The environment as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cloud region code (e.g. `us-east-1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Validate and wrap a raw region code.
    pub fn new(value: &str) -> EnclaveResult<Self> {
        check_token("region", value)?;
        Ok(Self(value.to_string()))
    }

    /// The region as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = EnclaveError;
    fn try_from(value: String) -> EnclaveResult<Self> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Environment {
    type Error = EnclaveError;
    fn try_from(value: String) -> EnclaveResult<Self> {
        Self::new(&value)
    }
}

impl TryFrom<String> for Region {
    type Error = EnclaveError;
    fn try_from(value: String) -> EnclaveResult<Self> {
        Self::new(&value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> String {
        value.0
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> String {
        value.0
    }
}

impl From<Region> for String {
    fn from(value: Region) -> String {
        value.0
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Client subscription tier, drives sizing and retention downstream
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClientTier {
    /// Default tier
    Standard,
    /// Extended retention and sizing
    Premium,
}

impl ClientTier {
    /// Canonical lowercase form used in names and tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Log/backup retention in days for this tier.
    pub fn retention_days(&self) -> u32 {
        match self {
            Self::Standard => 30,
            Self::Premium => 365,
        }
    }
}

impl Default for ClientTier {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for ClientTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

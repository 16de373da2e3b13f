//! Error types for Enclave

use thiserror::Error;

/// Enclave error type
#[derive(Error, Debug)]
pub enum EnclaveError {
    /// Malformed CIDR or identifier
    #[error("format violation: {0}")]
    FormatViolation(String),

    /// Two allocations share address space
    #[error("overlap violation: {0}")]
    OverlapViolation(String),

    /// Allocation outside RFC 1918 space
    #[error("private range violation: {0}")]
    PrivateRangeViolation(String),

    /// Parent block too small for the required tiers
    #[error("insufficient address space: {0}")]
    InsufficientAddressSpace(String),

    /// Zone list too short or carrying duplicates
    #[error("invalid zone count: {0}")]
    InvalidZoneCount(String),

    /// A subnet layout produced colliding sub-blocks
    #[error("layout collision: {0}")]
    LayoutCollision(String),

    /// Identifier contains characters outside [a-z0-9-]
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A layer precondition failed for one or more clients
    #[error("missing upstream reference: {0}")]
    MissingUpstreamReference(String),

    /// Another apply holds the layer state lock
    #[error("state locked: {0}")]
    LockContention(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry or client table could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for Enclave
pub type EnclaveResult<T> = Result<T, EnclaveError>;

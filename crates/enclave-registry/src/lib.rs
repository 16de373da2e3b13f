//! Enclave Registry - the allocation ledger and its validator
//!
//! The registry is the source of truth mapping every onboarded client to
//! its allocated address block. This crate owns:
//! - The ledger and per-layer client table models (TOML)
//! - The [`RegistryStore`] with its transactional check-and-insert
//! - The [`validator`]: the CI gate that proves the global no-overlap
//!   invariant before any provisioning runs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod model;
pub mod store;
pub mod validator;

pub use model::{ClientMetadata, ClientRecord, ClientTable, Registry, RegistryEntry};
pub use store::{RegistryStore, StoreError};
pub use validator::{
    validate, FormatViolation, OverlapViolation, PrivateRangeViolation, ValidationReport,
};

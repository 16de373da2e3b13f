//! Enclave Common - Shared types for the per-client provisioning core
//!
//! This crate provides the value objects and error taxonomy shared by
//! every Enclave crate:
//! - Validated identifiers (`ClientId`, `Environment`, `Region`)
//! - Client tiers and their downstream sizing hints
//! - The `EnclaveError` taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ident;

pub use error::{EnclaveError, EnclaveResult};
pub use ident::{ClientId, ClientTier, Environment, Region};

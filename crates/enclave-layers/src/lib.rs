//! Enclave Layers - the cross-layer provisioning contract
//!
//! Provisioning runs through six strictly ordered layers:
//!
//! Foundation → Platform → Database → Compute → ClusterServices → Observability
//!
//! Each layer publishes one [`LayerOutput`] per environment, keyed by
//! client, and later layers hold read-only references to it. A layer may
//! only apply once every enabled client has every field the layer reads
//! in every upstream output; one missing reference fails the whole layer
//! (fail closed), never just the affected client.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod layer;
pub mod lock;
pub mod output;
pub mod precondition;

pub use contract::{contract, LayerContract, Requirement};
pub use layer::{Layer, LayerError};
pub use lock::{ApplyGuard, ApplyLock};
pub use output::{LayerOutput, LayerOutputStore, SCHEMA_VERSION};
pub use precondition::{check_preconditions, MissingReference};

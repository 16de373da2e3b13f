//! Enclave Naming - resource names and tags
//!
//! Every layer derives its resource names and tag maps here, so one
//! client's resources are named consistently from the network foundation
//! all the way to observability. Both operations are pure: no counters,
//! no randomness, same inputs always give the same output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod namer;
pub mod tags;

pub use namer::ResourceNamer;
pub use tags::TagSet;

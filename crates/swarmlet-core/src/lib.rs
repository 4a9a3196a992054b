//! swarmlet-core: Core types for swarmlet node ranking
//!
//! This crate provides the fundamental types used throughout swarmlet:
//! - Node, container and workload request models
//! - Label conventions and the snapshot boundary that parses them
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod labels;
pub mod model;
pub mod snapshot;

pub use config::*;
pub use error::*;
pub use labels::*;
pub use model::*;
pub use snapshot::*;

//! swarmlet-scheduler: node ranking for swarmlet
//!
//! This crate turns a workload request and a node snapshot into an ordered
//! list of placement candidates:
//! - Weighted nodes and the shared tie-break ordering
//! - Binpack, spread and jenkins strategies
//! - A scheduler facade selecting a strategy by name

pub mod scheduler;
pub mod strategy;
pub mod weighted;

pub use scheduler::Scheduler;
pub use strategy::{PlacementStrategy, Strategy};
pub use weighted::WeightedNode;

//! Node, Container and WorkloadRequest type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource request of a workload, with its labels already interpreted
///
/// Built once at the snapshot boundary by `WorkloadRequest::from_config`;
/// the ranking code never looks at raw label strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRequest {
    /// Requested CPU shares, 0 means no CPU reservation
    pub cpu_shares: u64,
    /// Requested memory in bytes, 0 means no memory reservation
    pub memory: u64,
    /// Whether the workload carries the build-agent class marker
    pub build_agent: bool,
    /// Validated, strictly positive weight label value
    pub weight_override: Option<u64>,
}

impl WorkloadRequest {
    /// Create a request with the given reservations and no class marker
    pub fn new(cpu_shares: u64, memory: u64) -> Self {
        Self {
            cpu_shares,
            memory,
            build_agent: false,
            weight_override: None,
        }
    }

    /// Create an unreserved build-agent request
    pub fn build_agent(weight_override: Option<u64>) -> Self {
        Self {
            cpu_shares: 0,
            memory: 0,
            build_agent: true,
            weight_override,
        }
    }

    pub fn has_cpu_reservation(&self) -> bool {
        self.cpu_shares > 0
    }

    pub fn has_memory_reservation(&self) -> bool {
        self.memory > 0
    }

    /// True if either a CPU or a memory reservation is declared
    pub fn has_reservation(&self) -> bool {
        self.has_cpu_reservation() || self.has_memory_reservation()
    }

    /// True if both a CPU and a memory reservation are declared
    pub fn has_full_reservation(&self) -> bool {
        self.has_cpu_reservation() && self.has_memory_reservation()
    }
}

/// Raw container configuration as reported by the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// CPU shares reservation
    #[serde(default)]
    pub cpu_shares: u64,
    /// Memory reservation in bytes
    #[serde(default)]
    pub memory: u64,
    /// Metadata labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerConfig {
    /// Add a label, builder style
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// A container running on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Container identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Interpreted resource request of the container
    pub request: WorkloadRequest,
}

impl Container {
    /// Create a new container
    pub fn new(id: impl Into<String>, request: WorkloadRequest) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            request,
        }
    }
}

/// A candidate node for placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Total CPU shares
    pub total_cpus: u64,
    /// CPU shares reserved by running containers
    pub used_cpus: u64,
    /// Total memory in bytes
    pub total_memory: u64,
    /// Memory reserved by running containers
    pub used_memory: u64,
    /// Externally computed health indicator
    pub health_indicator: i64,
    /// Containers currently running on the node
    pub containers: Vec<Container>,
}

impl Node {
    /// Create an empty node with the given capacity
    pub fn new(id: impl Into<String>, total_cpus: u64, total_memory: u64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            total_cpus,
            used_cpus: 0,
            total_memory,
            used_memory: 0,
            health_indicator: 0,
            containers: Vec::new(),
        }
    }

    /// Unreserved CPU shares, negative if the node is overcommitted
    pub fn free_cpus(&self) -> i64 {
        signed_difference(self.total_cpus, self.used_cpus)
    }

    /// Unreserved memory, negative if the node is overcommitted
    pub fn free_memory(&self) -> i64 {
        signed_difference(self.total_memory, self.used_memory)
    }
}

/// `total - used`, clamped to the `i64` range
fn signed_difference(total: u64, used: u64) -> i64 {
    let diff = i128::from(total) - i128::from(used);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

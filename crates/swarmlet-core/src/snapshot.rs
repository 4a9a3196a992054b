//! Cluster snapshot file format
//!
//! A snapshot carries raw container configurations. [`ClusterSnapshot::resolve`]
//! is the one place where their labels are turned into typed requests.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SwarmletError, SwarmletResult};
use crate::labels::LabelConventions;
use crate::model::{Container, ContainerConfig, Node, WorkloadRequest};

/// Snapshot of a running container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: ContainerConfig,
}

/// Snapshot of a candidate node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub total_cpus: u64,
    #[serde(default)]
    pub used_cpus: u64,
    pub total_memory: u64,
    #[serde(default)]
    pub used_memory: u64,
    #[serde(default)]
    pub health_indicator: i64,
    #[serde(default)]
    pub containers: Vec<ContainerSnapshot>,
}

/// Workload to place plus the nodes it may land on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub workload: ContainerConfig,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
}

impl ClusterSnapshot {
    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> SwarmletResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> SwarmletResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            SwarmletError::Serialization(msg) => SwarmletError::Serialization(format!(
                "Failed to parse snapshot {}: {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Translate the snapshot into the typed ranking inputs
    pub fn resolve(&self, conventions: &LabelConventions) -> (WorkloadRequest, Vec<Node>) {
        let request = WorkloadRequest::from_config(&self.workload, conventions);
        let nodes = self
            .nodes
            .iter()
            .map(|n| n.resolve(conventions))
            .collect();
        (request, nodes)
    }
}

impl NodeSnapshot {
    fn resolve(&self, conventions: &LabelConventions) -> Node {
        Node {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            total_cpus: self.total_cpus,
            used_cpus: self.used_cpus,
            total_memory: self.total_memory,
            used_memory: self.used_memory,
            health_indicator: self.health_indicator,
            containers: self
                .containers
                .iter()
                .map(|c| Container {
                    id: c.id.clone(),
                    name: c.name.clone().unwrap_or_else(|| c.id.clone()),
                    request: WorkloadRequest::from_config(&c.config, conventions),
                })
                .collect(),
        }
    }
}

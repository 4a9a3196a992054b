//! Label conventions and their translation into typed requests

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{ContainerConfig, WorkloadRequest};

/// Namespace of scheduler-specific labels
pub const SWARM_LABEL_NAMESPACE: &str = "com.docker.swarm";

/// Label set by the Jenkins docker plugin on its build agents
pub const JENKINS_ID_LABEL: &str = "com.nirima.jenkins.plugins.docker.JenkinsId";

/// Label keys the scheduler interprets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConventions {
    /// Key whose presence marks a workload as a build agent
    pub class_marker: String,
    /// Key holding the relative weight of a build agent
    pub weight: String,
}

impl Default for LabelConventions {
    fn default() -> Self {
        Self {
            class_marker: JENKINS_ID_LABEL.to_string(),
            weight: format!("{}.weight", SWARM_LABEL_NAMESPACE),
        }
    }
}

/// Parse a weight label value
///
/// Returns `None` for anything that is not a strictly positive decimal
/// integer within the `i64` range.
pub fn parse_weight(value: &str) -> Option<u64> {
    match value.parse::<i64>() {
        Ok(weight) if weight > 0 => u64::try_from(weight).ok(),
        _ => None,
    }
}

impl WorkloadRequest {
    /// Interpret a raw container configuration
    pub fn from_config(config: &ContainerConfig, conventions: &LabelConventions) -> Self {
        let build_agent = config.labels.contains_key(&conventions.class_marker);
        let weight_override = config.labels.get(&conventions.weight).and_then(|value| {
            let weight = parse_weight(value);
            if weight.is_none() {
                debug!(label = %conventions.weight, value = %value, "Ignoring invalid weight label");
            }
            weight
        });

        Self {
            cpu_shares: config.cpu_shares,
            memory: config.memory,
            build_agent,
            weight_override,
        }
    }
}

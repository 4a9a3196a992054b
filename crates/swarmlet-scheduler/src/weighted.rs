//! Weighted nodes and the ordering shared by every strategy

use std::cmp::Ordering;

use swarmlet_core::{Node, SwarmletError, SwarmletResult, WorkloadRequest};
use tracing::debug;

/// A node with the weight a strategy gave it
#[derive(Debug, Clone, Copy)]
pub struct WeightedNode<'a> {
    /// The scored node
    pub node: &'a Node,
    /// Composite weight, lower is preferred
    pub weight: i64,
    /// Secondary key, lower is preferred
    pub containers: i64,
}

impl<'a> WeightedNode<'a> {
    pub fn new(node: &'a Node, weight: i64, containers: i64) -> Self {
        Self {
            node,
            weight,
            containers,
        }
    }
}

/// Compare two weighted nodes
///
/// Keys in order: weight ascending, containers ascending, free CPU
/// descending, free memory descending.
pub fn compare(a: &WeightedNode<'_>, b: &WeightedNode<'_>) -> Ordering {
    a.weight
        .cmp(&b.weight)
        .then_with(|| a.containers.cmp(&b.containers))
        .then_with(|| b.node.free_cpus().cmp(&a.node.free_cpus()))
        .then_with(|| b.node.free_memory().cmp(&a.node.free_memory()))
}

/// Sort weighted nodes and return the underlying nodes, best first
///
/// The sort is stable, so nodes equal on every key keep their input order.
pub fn sort_nodes<'a>(mut weighted: Vec<WeightedNode<'a>>) -> Vec<&'a Node> {
    weighted.sort_by(compare);
    weighted.into_iter().map(|w| w.node).collect()
}

/// Whether the node's total capacity can hold the request at all
pub(crate) fn fits_capacity(request: &WorkloadRequest, node: &Node) -> bool {
    node.total_memory >= request.memory && node.total_cpus >= request.cpu_shares
}

/// Weigh nodes by their utilization after a hypothetical placement
pub fn weigh_nodes<'a>(
    request: &WorkloadRequest,
    nodes: &'a [Node],
    health_factor: i64,
) -> SwarmletResult<Vec<WeightedNode<'a>>> {
    let mut weighted = Vec::with_capacity(nodes.len());

    for node in nodes {
        if !fits_capacity(request, node) {
            debug!(node = %node.name, "Skipping node smaller than the request");
            continue;
        }

        let cpu_score = utilization_score(node.used_cpus, request.cpu_shares, node.total_cpus);
        let memory_score = utilization_score(node.used_memory, request.memory, node.total_memory);

        if cpu_score > 100 || memory_score > 100 {
            debug!(
                node = %node.name,
                cpu_score,
                memory_score,
                "Skipping node that would be overcommitted"
            );
            continue;
        }

        let weight = cpu_score
            .saturating_add(memory_score)
            .saturating_add(health_factor.saturating_mul(node.health_indicator));

        weighted.push(WeightedNode::new(
            node,
            weight,
            node.containers.len() as i64,
        ));
    }

    if weighted.is_empty() {
        return Err(SwarmletError::NoFeasibleNode);
    }

    Ok(weighted)
}

/// Percentage of `total` in use once `requested` is added; 100 when nothing is requested
fn utilization_score(used: u64, requested: u64, total: u64) -> i64 {
    if requested == 0 {
        return 100;
    }
    let score = (i128::from(used) + i128::from(requested)) * 100 / i128::from(total);
    i64::try_from(score).unwrap_or(i64::MAX)
}

//! Spread: prefer the least crowded nodes

use swarmlet_core::{Node, SwarmletError, SwarmletResult, WorkloadRequest};
use tracing::debug;

use super::PlacementStrategy;
use crate::weighted::{fits_capacity, sort_nodes, WeightedNode};

/// Ranks feasible nodes by container count, then free CPU, then free memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadStrategy;

impl SpreadStrategy {
    pub const NAME: &'static str = "spread";
}

impl PlacementStrategy for SpreadStrategy {
    fn initialize(&mut self) -> SwarmletResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: &'a [Node],
    ) -> SwarmletResult<Vec<&'a Node>> {
        // Uniform weight: the tie-break keys decide the order.
        let weighted: Vec<WeightedNode<'a>> = nodes
            .iter()
            .filter(|node| {
                let fits = fits_capacity(request, node);
                if !fits {
                    debug!(node = %node.name, "Skipping node smaller than the request");
                }
                fits
            })
            .map(|node| WeightedNode::new(node, 0, node.containers.len() as i64))
            .collect();

        if weighted.is_empty() {
            return Err(SwarmletError::NoFeasibleNode);
        }

        Ok(sort_nodes(weighted))
    }
}

//! Binpack: fill the nodes that are already most used

use swarmlet_core::{Node, SwarmletResult, WorkloadRequest};

use super::PlacementStrategy;
use crate::weighted::{sort_nodes, weigh_nodes};

/// Health weight applied on top of the cpu and memory scores
pub const BINPACK_HEALTH_FACTOR: i64 = 10;

/// Ranks nodes by their utilization once the request is placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinpackStrategy;

impl BinpackStrategy {
    pub const NAME: &'static str = "binpack";
}

impl PlacementStrategy for BinpackStrategy {
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
        let weighted = weigh_nodes(request, nodes, BINPACK_HEALTH_FACTOR)?;
        Ok(sort_nodes(weighted))
    }
}

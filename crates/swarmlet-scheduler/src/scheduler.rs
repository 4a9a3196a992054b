//! Scheduler facade over a selected placement strategy

use swarmlet_core::{Node, SchedulerConfig, SwarmletError, SwarmletResult, WorkloadRequest};
use tracing::{debug, info, warn};

use crate::strategy::{PlacementStrategy, Strategy};

/// Ranks nodes for workloads with one configured strategy
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Placement strategy
    strategy: Strategy,
}

impl Scheduler {
    /// Create a scheduler from configuration
    pub fn new(config: &SchedulerConfig) -> SwarmletResult<Self> {
        let strategy = Strategy::from_name(&config.strategy)?;
        Self::with_strategy(strategy)
    }

    /// Create a scheduler around an explicit strategy
    pub fn with_strategy(mut strategy: Strategy) -> SwarmletResult<Self> {
        strategy.initialize()?;

        info!(strategy = strategy.name(), "Scheduler initialized");

        Ok(Self { strategy })
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Rank nodes for a workload, most preferred first
    pub fn rank<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: &'a [Node],
    ) -> SwarmletResult<Vec<&'a Node>> {
        debug!(
            strategy = self.strategy.name(),
            cpu_shares = request.cpu_shares,
            memory = request.memory,
            build_agent = request.build_agent,
            candidates = nodes.len(),
            "Ranking nodes"
        );

        match self.strategy.rank_and_sort(request, nodes) {
            Ok(ranked) => {
                debug!(
                    strategy = self.strategy.name(),
                    ranked = ranked.len(),
                    excluded = nodes.len() - ranked.len(),
                    "Nodes ranked"
                );
                Ok(ranked)
            }
            Err(e) => {
                warn!(
                    strategy = self.strategy.name(),
                    candidates = nodes.len(),
                    error = %e,
                    "Failed to rank nodes"
                );
                Err(e)
            }
        }
    }

    /// Pick the most preferred node for a workload
    pub fn select_node<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: &'a [Node],
    ) -> SwarmletResult<&'a Node> {
        let node = self
            .rank(request, nodes)?
            .into_iter()
            .next()
            .ok_or(SwarmletError::NoFeasibleNode)?;

        info!(
            strategy = self.strategy.name(),
            node = %node.name,
            "Selected node"
        );

        Ok(node)
    }
}

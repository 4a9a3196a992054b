//! Placement strategies and the registry that selects them by name

mod binpack;
mod jenkins;
mod spread;

pub use binpack::{BinpackStrategy, BINPACK_HEALTH_FACTOR};
pub use jenkins::{class_weight, JenkinsStrategy, JENKINS_HEALTH_FACTOR};
pub use spread::SpreadStrategy;

use swarmlet_core::{Node, SwarmletError, SwarmletResult, WorkloadRequest};

/// Strategy for ranking candidate nodes
pub trait PlacementStrategy: Send + Sync {
    /// One-time setup, independent of any request
    fn initialize(&mut self) -> SwarmletResult<()>;

    /// Stable name used to select the strategy
    fn name(&self) -> &'static str;

    /// Rank the nodes for the request, most preferred first
    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: &'a [Node],
    ) -> SwarmletResult<Vec<&'a Node>>;
}

const STRATEGY_NAMES: &[&str] = &[
    BinpackStrategy::NAME,
    SpreadStrategy::NAME,
    JenkinsStrategy::NAME,
];

/// The set of built-in strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Binpack(BinpackStrategy),
    Spread(SpreadStrategy),
    Jenkins(JenkinsStrategy),
}

impl Strategy {
    /// Look up a strategy by name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> SwarmletResult<Self> {
        match name.trim().to_lowercase().as_str() {
            BinpackStrategy::NAME => Ok(Strategy::Binpack(BinpackStrategy)),
            SpreadStrategy::NAME => Ok(Strategy::Spread(SpreadStrategy)),
            JenkinsStrategy::NAME => Ok(Strategy::Jenkins(JenkinsStrategy)),
            _ => Err(SwarmletError::UnknownStrategy(name.to_string())),
        }
    }

    /// Names of all supported strategies
    pub fn names() -> &'static [&'static str] {
        STRATEGY_NAMES
    }
}

impl PlacementStrategy for Strategy {
    fn initialize(&mut self) -> SwarmletResult<()> {
        match self {
            Strategy::Binpack(s) => s.initialize(),
            Strategy::Spread(s) => s.initialize(),
            Strategy::Jenkins(s) => s.initialize(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Strategy::Binpack(s) => s.name(),
            Strategy::Spread(s) => s.name(),
            Strategy::Jenkins(s) => s.name(),
        }
    }

    fn rank_and_sort<'a>(
        &self,
        request: &WorkloadRequest,
        nodes: &'a [Node],
    ) -> SwarmletResult<Vec<&'a Node>> {
        match self {
            Strategy::Binpack(s) => s.rank_and_sort(request, nodes),
            Strategy::Spread(s) => s.rank_and_sort(request, nodes),
            Strategy::Jenkins(s) => s.rank_and_sort(request, nodes),
        }
    }
}

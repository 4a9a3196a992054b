//! Jenkins: spread build agents over the nodes with the most idle CPU
//!
//! Build agents started by the Jenkins docker plugin rarely declare
//! reservations, so binpack cannot see how much they will consume. This
//! strategy divides each node's free CPU by the total agent weight it would
//! carry and prefers the largest share. Requests that reserve both CPU and
//! memory go to [`BinpackStrategy`]; requests that are not build agents go
//! to [`SpreadStrategy`].

use swarmlet_core::{Node, SwarmletError, SwarmletResult, WorkloadRequest};
use tracing::debug;

use super::{BinpackStrategy, PlacementStrategy, SpreadStrategy};
use crate::weighted::{sort_nodes, WeightedNode};

/// Health weight for build agents; negative so a higher indicator lowers the weight
pub const JENKINS_HEALTH_FACTOR: i64 = -5;

/// Relative weight of a build agent
///
/// 0 if the request is not a build agent or reserves CPU or memory,
/// otherwise its weight label, defaulting to 1.
pub fn class_weight(request: &WorkloadRequest) -> i64 {
    if !request.build_agent || request.has_reservation() {
        return 0;
    }
    request
        .weight_override
        .map_or(1, |w| i64::try_from(w).unwrap_or(i64::MAX))
}

/// Places build agents according to the CPU share they can expect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JenkinsStrategy;

impl JenkinsStrategy {
    pub const NAME: &'static str = "jenkins";
}

impl PlacementStrategy for JenkinsStrategy {
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
        if request.has_full_reservation() {
            debug!("Request reserves cpu and memory, delegating to binpack");
            return BinpackStrategy.rank_and_sort(request, nodes);
        }
        if !request.build_agent {
            debug!("Request is not a build agent, delegating to spread");
            return SpreadStrategy.rank_and_sort(request, nodes);
        }

        let weighted = weigh_nodes_by_capacity(request, nodes, JENKINS_HEALTH_FACTOR)?;
        Ok(sort_nodes(weighted))
    }
}

pub(crate) fn weigh_nodes_by_capacity<'a>(
    request: &WorkloadRequest,
    nodes: &'a [Node],
    health_factor: i64,
) -> SwarmletResult<Vec<WeightedNode<'a>>> {
    let weight = class_weight(request);
    let mut weighted = Vec::with_capacity(nodes.len());

    for node in nodes {
        let total_weight = node
            .containers
            .iter()
            .map(|c| class_weight(&c.request))
            .fold(weight, i64::saturating_add);

        // Only reachable for a request reserving a single resource.
        if total_weight == 0 {
            debug!(node = %node.name, "Skipping node without build agent weight");
            continue;
        }

        // Not normalized, so nodes with more cores attract more agents.
        let cpu_score = node.free_cpus().saturating_neg() / total_weight;
        if cpu_score == 0 {
            debug!(
                node = %node.name,
                free_cpus = node.free_cpus(),
                total_weight,
                "Skipping node with no cpu share left"
            );
            continue;
        }

        weighted.push(WeightedNode::new(
            node,
            cpu_score.saturating_add(health_factor.saturating_mul(node.health_indicator)),
            total_weight,
        ));
    }

    if weighted.is_empty() {
        return Err(SwarmletError::NoFeasibleNode);
    }

    Ok(weighted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmlet_core::{ClusterSnapshot, Container, LabelConventions};

    fn create_test_node(id: &str, total_cpus: u64, used_cpus: u64, total_mem: u64, used_mem: u64) -> Node {
        let mut node = Node::new(id, total_cpus, total_mem);
        node.used_cpus = used_cpus;
        node.used_memory = used_mem;
        node
    }

    fn with_agents(mut node: Node, weights: &[Option<u64>]) -> Node {
        for (i, weight) in weights.iter().enumerate() {
            node.containers.push(Container::new(
                format!("{}-agent-{}", node.id, i),
                WorkloadRequest::build_agent(*weight),
            ));
        }
        node
    }

    fn ids<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_class_weight() {
        assert_eq!(class_weight(&WorkloadRequest::new(0, 0)), 0);
        assert_eq!(class_weight(&WorkloadRequest::build_agent(None)), 1);
        assert_eq!(class_weight(&WorkloadRequest::build_agent(Some(4))), 4);

        let mut reserved = WorkloadRequest::build_agent(Some(4));
        reserved.cpu_shares = 1;
        assert_eq!(class_weight(&reserved), 0);

        let mut reserved = WorkloadRequest::build_agent(None);
        reserved.memory = 512;
        assert_eq!(class_weight(&reserved), 0);
    }

    #[test]
    fn test_class_weight_from_labels() {
        let json = r#"{
            "workload": { "labels": {} },
            "nodes": [{
                "id": "n1", "total_cpus": 1, "total_memory": 1,
                "containers": [
                    { "id": "plain", "config": { "labels": {} } },
                    { "id": "default", "config": { "labels": {
                        "com.nirima.jenkins.plugins.docker.JenkinsId": "x" } } },
                    { "id": "weighted", "config": { "labels": {
                        "com.nirima.jenkins.plugins.docker.JenkinsId": "x",
                        "com.docker.swarm.weight": "3" } } },
                    { "id": "zero", "config": { "labels": {
                        "com.nirima.jenkins.plugins.docker.JenkinsId": "x",
                        "com.docker.swarm.weight": "0" } } },
                    { "id": "garbage", "config": { "labels": {
                        "com.nirima.jenkins.plugins.docker.JenkinsId": "x",
                        "com.docker.swarm.weight": "lots" } } },
                    { "id": "reserved", "config": { "memory": 64, "labels": {
                        "com.nirima.jenkins.plugins.docker.JenkinsId": "x",
                        "com.docker.swarm.weight": "3" } } }
                ]
            }]
        }"#;
        let snapshot = ClusterSnapshot::from_json(json).unwrap();
        let (_, nodes) = snapshot.resolve(&LabelConventions::default());

        let weights: Vec<i64> = nodes[0]
            .containers
            .iter()
            .map(|c| class_weight(&c.request))
            .collect();
        assert_eq!(weights, vec![0, 1, 3, 1, 1, 0]);
    }

    #[test]
    fn test_weight_normalized_ranking() {
        let nodes = vec![
            with_agents(create_test_node("node-1", 10, 2, 100, 20), &[None]),
            with_agents(create_test_node("node-2", 10, 8, 100, 80), &[None]),
        ];
        let request = WorkloadRequest::build_agent(None);

        // node-1: -(8) / 2 = -4, node-2: -(2) / 2 = -1
        let weighted = weigh_nodes_by_capacity(&request, &nodes, 0).unwrap();
        assert_eq!(weighted[0].weight, -4);
        assert_eq!(weighted[0].containers, 2);
        assert_eq!(weighted[1].weight, -1);

        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["node-1", "node-2"]);
    }

    #[test]
    fn test_heavier_agents_reduce_share() {
        let nodes = vec![
            with_agents(create_test_node("heavy", 16, 0, 100, 0), &[Some(7)]),
            with_agents(create_test_node("light", 8, 0, 100, 0), &[None]),
        ];
        let request = WorkloadRequest::build_agent(None);

        // heavy: -16 / 8 = -2, light: -8 / 2 = -4
        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["light", "heavy"]);
    }

    #[test]
    fn test_zero_score_node_excluded() {
        let nodes = vec![
            with_agents(create_test_node("saturated", 10, 9, 100, 0), &[None, None]),
            create_test_node("free", 10, 0, 100, 0),
        ];
        let request = WorkloadRequest::build_agent(None);

        // saturated: -(1) / 3 truncates to 0
        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["free"]);
    }

    #[test]
    fn test_all_nodes_saturated() {
        let nodes = vec![create_test_node("full", 10, 10, 100, 0)];
        let result = JenkinsStrategy.rank_and_sort(&WorkloadRequest::build_agent(None), &nodes);
        assert!(matches!(result, Err(SwarmletError::NoFeasibleNode)));
    }

    #[test]
    fn test_healthier_node_preferred() {
        let mut healthy = create_test_node("healthy", 10, 0, 100, 0);
        healthy.health_indicator = 1;
        let nodes = vec![create_test_node("plain", 10, 0, 100, 0), healthy];
        let request = WorkloadRequest::build_agent(None);

        // plain: -10, healthy: -10 + -5 * 1
        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["healthy", "plain"]);
    }

    #[test]
    fn test_ties_broken_by_total_weight() {
        let nodes = vec![
            with_agents(create_test_node("shared", 20, 0, 100, 0), &[None]),
            create_test_node("alone", 10, 0, 100, 0),
        ];
        let request = WorkloadRequest::build_agent(None);

        // both score -10; "alone" carries less weight
        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["alone", "shared"]);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut sick = with_agents(create_test_node("sick", u64::MAX, 0, 100, 0), &[Some(u64::MAX)]);
        sick.health_indicator = i64::MIN;
        let mut healthy = create_test_node("healthy", u64::MAX, 0, 100, 0);
        healthy.health_indicator = i64::MAX / 4;
        let nodes = vec![sick, healthy];
        let request = WorkloadRequest::build_agent(Some(u64::MAX));

        let weighted = weigh_nodes_by_capacity(&request, &nodes, JENKINS_HEALTH_FACTOR).unwrap();
        // sick: -i64::MAX / i64::MAX + saturated positive health term
        assert_eq!(weighted[0].containers, i64::MAX);
        assert_eq!(weighted[0].weight, i64::MAX - 1);
        // healthy: -i64::MAX / i64::MAX + saturated negative health term
        assert_eq!(weighted[1].weight, i64::MIN);

        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["healthy", "sick"]);
    }

    #[test]
    fn test_delegates_to_binpack() {
        let nodes = vec![
            create_test_node("node-1", 10, 2, 100, 20),
            create_test_node("node-2", 10, 6, 100, 30),
            create_test_node("node-3", 10, 8, 100, 80),
        ];
        let mut request = WorkloadRequest::build_agent(Some(2));
        request.cpu_shares = 2;
        request.memory = 20;

        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        let expected = BinpackStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ranked, expected);
    }

    #[test]
    fn test_delegates_to_spread() {
        let nodes = vec![
            with_agents(create_test_node("node-1", 10, 2, 100, 20), &[None, None]),
            create_test_node("node-2", 10, 8, 100, 80),
            create_test_node("node-3", 4, 0, 100, 0),
        ];
        let request = WorkloadRequest::new(6, 0);

        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        let expected = SpreadStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ranked, expected);
        assert_eq!(ids(&ranked), vec!["node-2", "node-1"]);
    }

    #[test]
    fn test_delegated_error_propagates() {
        let nodes = vec![create_test_node("tiny", 1, 0, 1, 0)];
        let result = JenkinsStrategy.rank_and_sort(&WorkloadRequest::new(2, 2), &nodes);
        assert!(matches!(result, Err(SwarmletError::NoFeasibleNode)));
    }

    #[test]
    fn test_single_reservation_uses_existing_agents() {
        let nodes = vec![
            with_agents(create_test_node("agents", 10, 0, 100, 0), &[None]),
            create_test_node("empty", 10, 0, 100, 0),
        ];
        let mut request = WorkloadRequest::build_agent(None);
        request.cpu_shares = 1;

        // the request itself weighs 0; "empty" has nothing to divide by
        let ranked = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        assert_eq!(ids(&ranked), vec!["agents"]);
    }

    #[test]
    fn test_deterministic() {
        let nodes = vec![
            with_agents(create_test_node("a", 12, 2, 100, 0), &[Some(2)]),
            with_agents(create_test_node("b", 12, 2, 100, 0), &[Some(2)]),
            create_test_node("c", 4, 0, 100, 0),
        ];
        let request = WorkloadRequest::build_agent(None);

        let first = JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap();
        for _ in 0..5 {
            assert_eq!(JenkinsStrategy.rank_and_sort(&request, &nodes).unwrap(), first);
        }
    }
}

//! CLI commands implementation

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use swarmlet_core::{ClusterSnapshot, Node, SchedulerConfig, WorkloadRequest};
use swarmlet_scheduler::{Scheduler, Strategy};
use tracing::debug;

/// Output format of the rank command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// A ranked node as printed by the CLI
#[derive(Debug, Serialize)]
pub struct RankedNode<'a> {
    pub rank: usize,
    pub id: &'a str,
    pub name: &'a str,
    pub free_cpus: i64,
    pub free_memory: i64,
    pub containers: usize,
    pub health_indicator: i64,
}

impl<'a> RankedNode<'a> {
    fn new(rank: usize, node: &'a Node) -> Self {
        Self {
            rank,
            id: &node.id,
            name: &node.name,
            free_cpus: node.free_cpus(),
            free_memory: node.free_memory(),
            containers: node.containers.len(),
            health_indicator: node.health_indicator,
        }
    }
}

/// Read a snapshot and resolve it with the configured label conventions
fn load_snapshot(config: &SchedulerConfig, path: &Path) -> Result<(WorkloadRequest, Vec<Node>)> {
    let snapshot = ClusterSnapshot::from_file(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    let (request, nodes) = snapshot.resolve(&config.labels);

    debug!(
        path = %path.display(),
        nodes = nodes.len(),
        build_agent = request.build_agent,
        "Snapshot loaded"
    );

    Ok((request, nodes))
}

/// Rank the nodes of a snapshot
pub fn rank(config: &SchedulerConfig, snapshot: &Path, output: OutputFormat) -> Result<()> {
    let scheduler = Scheduler::new(config)?;
    let (request, nodes) = load_snapshot(config, snapshot)?;

    let ranked = scheduler.rank(&request, &nodes)?;
    let rows: Vec<RankedNode<'_>> = ranked
        .iter()
        .enumerate()
        .map(|(i, node)| RankedNode::new(i + 1, node))
        .collect();

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            println!(
                "Strategy: {} ({} of {} nodes ranked)",
                scheduler.strategy_name(),
                rows.len(),
                nodes.len()
            );
            println!();
            println!(
                "{:<6} {:<24} {:<20} {:>10} {:>14} {:>11} {:>8}",
                "RANK", "ID", "NAME", "FREE CPU", "FREE MEMORY", "CONTAINERS", "HEALTH"
            );
            println!("{}", "-".repeat(99));
            for row in rows {
                println!(
                    "{:<6} {:<24} {:<20} {:>10} {:>14} {:>11} {:>8}",
                    row.rank,
                    row.id,
                    row.name,
                    row.free_cpus,
                    row.free_memory,
                    row.containers,
                    row.health_indicator
                );
            }
        }
    }

    Ok(())
}

/// Print the node a workload would be placed on
pub fn select(config: &SchedulerConfig, snapshot: &Path) -> Result<()> {
    let scheduler = Scheduler::new(config)?;
    let (request, nodes) = load_snapshot(config, snapshot)?;

    let node = scheduler.select_node(&request, &nodes)?;
    println!("{} ({})", node.name, node.id);

    Ok(())
}

/// List the available strategies
pub fn strategies(config: &SchedulerConfig) {
    for name in Strategy::names() {
        if name.eq_ignore_ascii_case(config.strategy.trim()) {
            println!("{} (configured)", name);
        } else {
            println!("{}", name);
        }
    }
}

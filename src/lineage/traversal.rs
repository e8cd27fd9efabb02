//! Multi-hop lineage traversal
//!
//! One-hop views live on the store; full lineage paths are an explicit
//! separate operation. Breadth-first expansion with cycle detection: the
//! graph may contain cycles from reprocessing jobs, so no dataset appears
//! twice in one traversal.

use crate::models::lineage::LineageEdge;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upstream,
    Downstream,
}

/// A dataset reached during traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceNode {
    pub dataset_id: Uuid,
    /// Hops from the root
    pub distance: u32,
    /// Edge that first reached this dataset
    pub via_edge: Uuid,
    pub job_name: String,
    pub job_type: String,
}

/// Result of a multi-hop traversal from one root dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageTrace {
    pub root: Uuid,
    pub direction: Direction,
    pub nodes: Vec<TraceNode>,
    pub max_depth: u32,
}

pub struct LineageWalker;

impl LineageWalker {
    /// Walk the graph from `root` in the given direction over a
    /// point-in-time copy of the edge log.
    pub fn trace(edges: &[LineageEdge], root: Uuid, direction: Direction) -> LineageTrace {
        // Adjacency: dataset -> datasets one hop away in `direction`.
        let mut adjacency: HashMap<Uuid, Vec<&LineageEdge>> = HashMap::new();
        for edge in edges {
            let from = match direction {
                Direction::Downstream => edge.source_id,
                Direction::Upstream => edge.target_id,
            };
            adjacency.entry(from).or_default().push(edge);
        }

        let mut nodes = Vec::new();
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<(Uuid, u32)> = VecDeque::new();

        // The root never re-enters its own trace.
        visited.insert(root);
        queue.push_back((root, 0));

        while let Some((current, distance)) = queue.pop_front() {
            let Some(neighbors) = adjacency.get(&current) else {
                continue;
            };
            for edge in neighbors {
                let next = match direction {
                    Direction::Downstream => edge.target_id,
                    Direction::Upstream => edge.source_id,
                };
                if visited.contains(&next) {
                    continue;
                }
                visited.insert(next);
                nodes.push(TraceNode {
                    dataset_id: next,
                    distance: distance + 1,
                    via_edge: edge.id,
                    job_name: edge.job_name.clone(),
                    job_type: edge.job_type.clone(),
                });
                queue.push_back((next, distance + 1));
            }
        }

        let max_depth = nodes.iter().map(|n| n.distance).max().unwrap_or(0);
        LineageTrace {
            root,
            direction,
            nodes,
            max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edge(source: Uuid, target: Uuid) -> LineageEdge {
        LineageEdge::new(source, target, "job", "etl")
    }

    #[test]
    fn test_chain_traversal_reports_distances() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let edges = vec![edge(a, b), edge(b, c)];

        let trace = LineageWalker::trace(&edges, a, Direction::Downstream);
        assert_eq!(trace.nodes.len(), 2);
        assert_eq!(trace.max_depth, 2);

        let distances: HashMap<Uuid, u32> = trace
            .nodes
            .iter()
            .map(|n| (n.dataset_id, n.distance))
            .collect();
        assert_eq!(distances[&b], 1);
        assert_eq!(distances[&c], 2);
    }

    #[test]
    fn test_cycle_terminates_without_repeats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let edges = vec![edge(a, b), edge(b, a)];

        let trace = LineageWalker::trace(&edges, a, Direction::Downstream);
        assert_eq!(trace.nodes.len(), 1);
        assert_eq!(trace.nodes[0].dataset_id, b);

        let mut seen = HashSet::new();
        for node in &trace.nodes {
            assert!(seen.insert(node.dataset_id), "dataset listed twice");
        }
        assert!(!seen.contains(&a), "root re-entered its own trace");
    }

    #[test]
    fn test_upstream_walks_against_edge_direction() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let edges = vec![edge(a, b), edge(b, c)];

        let trace = LineageWalker::trace(&edges, c, Direction::Upstream);
        let reached: HashSet<Uuid> = trace.nodes.iter().map(|n| n.dataset_id).collect();
        assert!(reached.contains(&a));
        assert!(reached.contains(&b));
    }

    #[test]
    fn test_isolated_dataset_yields_empty_trace() {
        let trace = LineageWalker::trace(&[], Uuid::new_v4(), Direction::Downstream);
        assert!(trace.nodes.is_empty());
        assert_eq!(trace.max_depth, 0);
    }

    #[test]
    fn test_diamond_reaches_each_dataset_once() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let d = Uuid::new_v4();
        let edges = vec![edge(a, b), edge(a, c), edge(b, d), edge(c, d)];

        let trace = LineageWalker::trace(&edges, a, Direction::Downstream);
        assert_eq!(trace.nodes.len(), 3);
        let d_node = trace.nodes.iter().find(|n| n.dataset_id == d).unwrap();
        assert_eq!(d_node.distance, 2);
    }
}

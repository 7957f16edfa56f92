use std::collections::HashSet;

use super::model::{Edge, Node, TopologySnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct FilteredTopology<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

/// Keeps nodes whose name or kind contains `term` case-insensitively, and
/// every edge with at least one kept endpoint.
pub fn filter_topology<'a>(snapshot: &'a TopologySnapshot, term: &str) -> FilteredTopology<'a> {
    let needle = term.to_lowercase();

    let nodes = snapshot
        .nodes()
        .iter()
        .filter(|node| node_matches(node, &needle))
        .collect::<Vec<_>>();

    let visible_ids = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();

    let edges = snapshot
        .edges()
        .iter()
        .filter(|edge| {
            visible_ids.contains(edge.source.as_str()) || visible_ids.contains(edge.target.as_str())
        })
        .collect::<Vec<_>>();

    FilteredTopology { nodes, edges }
}

fn node_matches(node: &Node, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    node.name.to_lowercase().contains(needle) || node.kind.as_str().to_lowercase().contains(needle)
}

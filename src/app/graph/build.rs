use std::collections::{HashMap, HashSet};

use eframe::egui::{Rect, Vec2, pos2, vec2};

use crate::topology::{Edge, FilteredTopology, Node, TopologySnapshot};

/// World-space size of a node card. Server positions are card top-left corners.
pub(in crate::app) const NODE_SIZE: Vec2 = vec2(180.0, 56.0);

pub(in crate::app) struct SceneNode<'a> {
    pub(in crate::app) node: &'a Node,
    pub(in crate::app) world_rect: Rect,
}

pub(in crate::app) struct SceneEdge<'a> {
    pub(in crate::app) edge: &'a Edge,
    pub(in crate::app) start: Vec2,
    pub(in crate::app) end: Vec2,
    pub(in crate::app) source_visible: bool,
    pub(in crate::app) target_visible: bool,
}

pub(in crate::app) struct Scene<'a> {
    pub(in crate::app) nodes: Vec<SceneNode<'a>>,
    pub(in crate::app) edges: Vec<SceneEdge<'a>>,
}

pub(in crate::app) fn node_world_rect(node: &Node) -> Rect {
    Rect::from_min_size(pos2(node.position.x, node.position.y), NODE_SIZE)
}

impl<'a> Scene<'a> {
    pub(in crate::app) fn build(snapshot: &'a TopologySnapshot, filtered: &FilteredTopology<'a>) -> Self {
        let by_id = snapshot
            .nodes()
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect::<HashMap<_, _>>();
        let visible_ids = filtered
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();

        let nodes = filtered
            .nodes
            .iter()
            .copied()
            .map(|node| SceneNode {
                node,
                world_rect: node_world_rect(node),
            })
            .collect();

        // Hidden endpoints still anchor edges at their snapshot position.
        let edges = filtered
            .edges
            .iter()
            .copied()
            .filter_map(|edge| {
                let source = by_id.get(edge.source.as_str())?;
                let target = by_id.get(edge.target.as_str())?;
                Some(SceneEdge {
                    edge,
                    start: node_world_rect(source).center().to_vec2(),
                    end: node_world_rect(target).center().to_vec2(),
                    source_visible: visible_ids.contains(edge.source.as_str()),
                    target_visible: visible_ids.contains(edge.target.as_str()),
                })
            })
            .collect();

        Self { nodes, edges }
    }

    pub(in crate::app) fn bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(|scene_node| scene_node.world_rect)
            .reduce(|bounds, rect| bounds.union(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::fixtures::{edge, node};
    use crate::topology::{Position, filter_topology};

    fn placed(id: &str, kind: &str, name: &str, x: f32, y: f32) -> Node {
        Node {
            position: Position { x, y },
            ..node(id, kind, name)
        }
    }

    fn snapshot() -> TopologySnapshot {
        TopologySnapshot::new(
            vec![
                placed("a", "vm", "web01", 0.0, 600.0),
                placed("b", "host", "esx01", 0.0, 400.0),
                placed("c", "datastore", "ds01", 250.0, 200.0),
            ],
            vec![edge("e1", "a", "b", "compute"), edge("e2", "b", "c", "storage")],
        )
    }

    #[test]
    fn edge_to_hidden_node_keeps_its_anchor() {
        let snapshot = snapshot();
        let filtered = filter_topology(&snapshot, "web");
        let scene = Scene::build(&snapshot, &filtered);

        assert_eq!(scene.nodes.len(), 1);
        assert_eq!(scene.edges.len(), 1);

        let e1 = &scene.edges[0];
        assert_eq!(e1.edge.id, "e1");
        assert!(e1.source_visible);
        assert!(!e1.target_visible);
        assert_eq!(e1.start, vec2(90.0, 628.0));
        assert_eq!(e1.end, vec2(90.0, 428.0));
    }

    #[test]
    fn bounds_cover_visible_cards_only() {
        let snapshot = snapshot();

        let all = filter_topology(&snapshot, "");
        let bounds = Scene::build(&snapshot, &all).bounds().expect("bounds");
        assert_eq!(bounds.min, pos2(0.0, 200.0));
        assert_eq!(bounds.max, pos2(430.0, 656.0));

        let hosts = filter_topology(&snapshot, "host");
        let bounds = Scene::build(&snapshot, &hosts).bounds().expect("bounds");
        assert_eq!(bounds, Rect::from_min_size(pos2(0.0, 400.0), NODE_SIZE));

        let none = filter_topology(&snapshot, "zzz");
        assert!(Scene::build(&snapshot, &none).bounds().is_none());
    }
}

use tracing::info;

use super::model::{Edge, Node, TopologySnapshot};

#[derive(Debug, Default)]
pub struct TopologyStore {
    snapshot: TopologySnapshot,
    revision: u64,
}

impl TopologyStore {
    pub fn load(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.replace(TopologySnapshot::new(nodes, edges));
    }

    pub fn replace(&mut self, snapshot: TopologySnapshot) {
        info!(
            nodes = snapshot.node_count(),
            edges = snapshot.edge_count(),
            "loaded topology snapshot"
        );
        self.snapshot = snapshot;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn current(&self) -> &TopologySnapshot {
        &self.snapshot
    }

    /// Number of snapshots loaded so far; zero until the first load.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::{edge, node};
    use super::*;

    #[test]
    fn starts_empty() {
        let store = TopologyStore::default();
        assert!(store.current().is_empty());
        assert_eq!(store.current().edge_count(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn reload_discards_previous_snapshot() {
        let mut store = TopologyStore::default();
        store.load(
            vec![node("a", "vm", "web01"), node("b", "host", "esx01")],
            vec![edge("e1", "a", "b", "compute")],
        );
        store.load(vec![node("c", "datastore", "ds01")], Vec::new());

        let ids = store
            .current()
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["c"]);
        assert!(store.current().edges().is_empty());
        assert!(store.current().node("a").is_none());
        assert_eq!(store.revision(), 2);
    }
}

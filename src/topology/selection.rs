use tracing::debug;

use super::model::{Node, TopologySnapshot};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn select(&mut self, node_id: impl Into<String>) {
        let node_id = node_id.into();
        debug!(node_id = node_id.as_str(), "selected node");
        self.selected = Some(node_id);
    }

    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            debug!("cleared node selection");
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Looks the selection up in `snapshot`; a stale id resolves to nothing.
    pub fn resolve<'a>(&self, snapshot: &'a TopologySnapshot) -> Option<&'a Node> {
        self.selected
            .as_deref()
            .and_then(|node_id| snapshot.node(node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::node;
    use super::*;

    fn snapshot() -> TopologySnapshot {
        TopologySnapshot::new(
            vec![node("a", "vm", "web01"), node("b", "host", "esx01")],
            Vec::new(),
        )
    }

    #[test]
    fn select_then_clear_returns_to_no_selection() {
        let mut selection = Selection::default();
        selection.select("a");
        assert!(selection.is_open());
        assert_eq!(selection.selected_id(), Some("a"));

        selection.clear();
        assert!(!selection.is_open());
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn selecting_another_node_replaces_selection() {
        let snapshot = snapshot();
        let mut selection = Selection::default();

        selection.select("a");
        selection.select("b");

        assert_eq!(selection.selected_id(), Some("b"));
        assert_eq!(
            selection.resolve(&snapshot).map(|node| node.name.as_str()),
            Some("esx01")
        );
    }

    #[test]
    fn stale_selection_resolves_to_nothing() {
        let mut selection = Selection::default();
        selection.select("a");

        let replaced = TopologySnapshot::new(vec![node("z", "datastore", "ds")], Vec::new());
        assert!(selection.resolve(&replaced).is_none());
        assert!(selection.is_open());
    }
}

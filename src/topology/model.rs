use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Vm,
    Host,
    Datastore,
    StoragePod,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vm => "vm",
            Self::Host => "host",
            Self::Datastore => "datastore",
            Self::StoragePod => "storagepod",
            Self::Other(kind) => kind.as_str(),
        }
    }

    /// Short badge drawn on a node card. Unknown kinds have none.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Self::Vm => Some("VM"),
            Self::Host => Some("HOST"),
            Self::Datastore => Some("DS"),
            Self::StoragePod => Some("POD"),
            Self::Other(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Vm => "Virtual machine",
            Self::Host => "Host",
            Self::Datastore => "Datastore",
            Self::StoragePod => "Storage pod",
            Self::Other(kind) => kind.as_str(),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "vm" => Self::Vm,
            "host" => Self::Host,
            "datastore" => Self::Datastore,
            "storagepod" => Self::StoragePod,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Compute,
    Storage,
    Other(String),
}

impl RelationshipKind {
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage)
    }
}

impl From<&str> for RelationshipKind {
    fn from(value: &str) -> Self {
        match value {
            "compute" => Self::Compute,
            "storage" => Self::Storage,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(true) => f.write_str("Yes"),
            Self::Bool(false) => f.write_str("No"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub position: Position,
}

impl Node {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relationship: RelationshipKind,
}

/// Every edge in a snapshot references two nodes of the same snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopologySnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TopologySnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let known_ids = nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();

        let total_edges = edges.len();
        let edges = edges
            .into_iter()
            .filter(|edge| {
                known_ids.contains(edge.source.as_str()) && known_ids.contains(edge.target.as_str())
            })
            .collect::<Vec<_>>();

        let dropped = total_edges - edges.len();
        if dropped > 0 {
            warn!(dropped, "dropped edges referencing nodes missing from the snapshot");
        }

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

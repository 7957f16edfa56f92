use std::collections::BTreeMap;

use serde::Deserialize;

use super::model::{AttributeValue, Edge, Node, NodeKind, Position, RelationshipKind, TopologySnapshot};

#[derive(Debug, Deserialize)]
pub(super) struct RawNetworkData {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "data", alias = "attributes")]
    attributes: Option<BTreeMap<String, Option<RawAttribute>>>,
    #[serde(default)]
    position: Option<RawPosition>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    id: String,
    source: String,
    target: String,
    #[serde(default, rename = "type", alias = "relationshipKind")]
    relationship: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Default, Deserialize)]
struct RawPosition {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

impl From<RawAttribute> for AttributeValue {
    fn from(raw: RawAttribute) -> Self {
        match raw {
            RawAttribute::Bool(value) => Self::Bool(value),
            RawAttribute::Integer(value) => Self::Integer(value),
            RawAttribute::Float(value) => Self::Float(value),
            RawAttribute::Text(value) => Self::Text(value),
            // Lists and nested objects are shown as compact JSON.
            RawAttribute::Other(value) => Self::Text(value.to_string()),
        }
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        // Properties vCenter could not report arrive as null and are left out.
        let attributes = raw
            .attributes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, AttributeValue::from(value))))
            .collect();
        let position = raw.position.unwrap_or_default();

        Self {
            id: raw.id,
            kind: NodeKind::from(raw.kind.unwrap_or_default().as_str()),
            name: raw.name.unwrap_or_default(),
            attributes,
            position: Position {
                x: position.x,
                y: position.y,
            },
        }
    }
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        Self {
            id: raw.id,
            source: raw.source,
            target: raw.target,
            relationship: RelationshipKind::from(raw.relationship.unwrap_or_default().as_str()),
        }
    }
}

impl From<RawNetworkData> for TopologySnapshot {
    fn from(raw: RawNetworkData) -> Self {
        TopologySnapshot::new(
            raw.nodes.into_iter().map(Node::from).collect(),
            raw.edges.into_iter().map(Edge::from).collect(),
        )
    }
}

pub(super) fn parse_network_data(raw: &str) -> serde_json::Result<TopologySnapshot> {
    let parsed: RawNetworkData = serde_json::from_str(raw)?;
    Ok(TopologySnapshot::from(parsed))
}

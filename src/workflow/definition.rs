use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete workflow graph, ready for compilation.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowGraph {
    pub id: Option<String>,
    pub name: String,
    pub nodes: Vec<Node>,
}

/// A single step of the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Display name as shown in the automation editor.
    pub name: String,
    /// Dotted/namespaced node type, e.g. `n8n-nodes-base.httpRequest`.
    pub type_tag: String,
    /// Parameter tree. Scalars may carry `={{ ... }}` expressions.
    pub parameters: Value,
    /// Output ports in declaration order.
    pub connections: Vec<OutputPort>,
}

/// One output port of a node and the downstream nodes it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPort {
    pub key: String,
    pub targets: Vec<NodeReference>,
}

/// A downstream reference, either a bare node id or a structured `{ "node": id }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeReference {
    Id(String),
    Structured { node: String },
}

impl NodeReference {
    pub fn node_id(&self) -> &str {
        match self {
            NodeReference::Id(id) => id,
            NodeReference::Structured { node } => node,
        }
    }
}

impl WorkflowGraph {
    pub fn new(name: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            id: None,
            name: name.into(),
            nodes,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_tag: type_tag.into(),
            parameters: Value::Object(Default::default()),
            connections: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Appends `target` to the port named `port`, creating the port if needed.
    pub fn connect(mut self, port: &str, target: impl Into<String>) -> Self {
        let reference = NodeReference::Structured {
            node: target.into(),
        };
        match self.connections.iter_mut().find(|p| p.key == port) {
            Some(existing) => existing.targets.push(reference),
            None => self.connections.push(OutputPort {
                key: port.to_string(),
                targets: vec![reference],
            }),
        }
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Ids of every downstream node, in port order then connection order.
    pub fn successor_ids(&self) -> impl Iterator<Item = &str> {
        self.connections
            .iter()
            .flat_map(|port| port.targets.iter().map(NodeReference::node_id))
    }

    pub fn short_type(&self) -> &str {
        short_type(&self.type_tag)
    }
}

/// The type without namespace: `n8n-nodes-base.httpRequest` -> `httpRequest`.
pub fn short_type(type_tag: &str) -> &str {
    let last = type_tag.rsplit('.').next().unwrap_or_default();
    last.strip_prefix("n8n-nodes-").unwrap_or(last)
}

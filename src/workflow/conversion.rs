use super::definition::{Node, NodeReference, OutputPort, WorkflowGraph};
use crate::error::WorkflowError;
use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A trait for custom data models that can be converted into a `WorkflowGraph`.
///
/// Implement this on your own structs to feed workflow definitions from any source
/// into the compiler.
///
/// # Example
///
/// ```rust,no_run
/// use honyaku::prelude::*;
/// use honyaku::workflow::{IntoWorkflow, Node};
/// use honyaku::error::WorkflowError;
///
/// struct MyStep { key: String, kind: String }
/// struct MyPipeline { title: String, steps: Vec<MyStep> }
///
/// impl IntoWorkflow for MyPipeline {
///     fn into_workflow(self) -> std::result::Result<WorkflowGraph, WorkflowError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|s| Node::new(s.key.clone(), s.key, s.kind))
///             .collect();
///         Ok(WorkflowGraph::new(self.title, nodes))
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a compilable workflow graph.
    fn into_workflow(self) -> Result<WorkflowGraph, WorkflowError>;
}

// --- JSON intake structs ---
// These match the automation server's workflow payloads and are only used for conversion.

#[derive(Deserialize)]
struct RawWorkflow {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
    /// Export shape: `{ "<source name>": { "<port>": [[{ "node": "<target name>" }]] } }`.
    #[serde(default)]
    connections: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    type_tag: String,
    #[serde(default)]
    parameters: Option<Value>,
    /// Per-node shape: `{ "<port>": <nested lists/maps of ids or { "node": id }> }`.
    #[serde(default)]
    connections: Option<Value>,
}

impl WorkflowGraph {
    /// Parses a workflow from JSON, accepting both per-node and top-level connection maps.
    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        let raw: RawWorkflow =
            serde_json::from_str(json).map_err(|e| WorkflowError::JsonParseError(e.to_string()))?;
        raw.into_workflow()
    }
}

impl IntoWorkflow for RawWorkflow {
    fn into_workflow(self) -> Result<WorkflowGraph, WorkflowError> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut seen_ids = AHashSet::new();

        for (index, raw) in self.nodes.into_iter().enumerate() {
            let id = raw
                .id
                .clone()
                .or_else(|| raw.name.clone())
                .unwrap_or_else(|| format!("node-{}", index));
            if !seen_ids.insert(id.clone()) {
                return Err(WorkflowError::ValidationError(format!(
                    "duplicate node id '{}'",
                    id
                )));
            }

            let connections = match &raw.connections {
                Some(Value::Object(ports)) => ports
                    .iter()
                    .map(|(key, value)| OutputPort {
                        key: key.clone(),
                        targets: flatten_targets(value),
                    })
                    .collect(),
                _ => Vec::new(),
            };

            nodes.push(Node {
                name: raw.name.unwrap_or_else(|| id.clone()),
                id,
                type_tag: raw.type_tag,
                parameters: raw
                    .parameters
                    .unwrap_or_else(|| Value::Object(Map::new())),
                connections,
            });
        }

        if let Some(by_source) = self.connections {
            attach_named_connections(&mut nodes, by_source);
        }

        Ok(WorkflowGraph {
            id: self.id.and_then(|id| match id {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            name: self.name.unwrap_or_else(|| "Workflow".to_string()),
            nodes,
        })
    }
}

/// Collects every reference from an arbitrarily nested list/map, in document order.
fn flatten_targets(value: &Value) -> Vec<NodeReference> {
    let mut targets = Vec::new();
    collect_targets(value, &mut targets);
    targets
}

fn collect_targets(value: &Value, out: &mut Vec<NodeReference>) {
    match value {
        Value::String(id) => out.push(NodeReference::Id(id.clone())),
        Value::Array(items) => items.iter().for_each(|item| collect_targets(item, out)),
        Value::Object(map) => match map.get("node") {
            Some(Value::String(node)) => out.push(NodeReference::Structured { node: node.clone() }),
            _ => map.values().for_each(|v| collect_targets(v, out)),
        },
        _ => {}
    }
}

/// Moves the export-shape connection map onto the nodes, translating names into ids.
fn attach_named_connections(nodes: &mut [Node], by_source: Map<String, Value>) {
    let id_by_name: AHashMap<String, String> = nodes
        .iter()
        .map(|n| (n.name.clone(), n.id.clone()))
        .collect();
    let translate = |key: &str| -> String {
        id_by_name
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    };

    for (source, ports) in by_source {
        let source_id = translate(&source);
        let Some(node) = nodes.iter_mut().find(|n| n.id == source_id) else {
            debug!(source = %source, "Skipping connections of unknown source node");
            continue;
        };
        let Value::Object(ports) = ports else {
            continue;
        };

        for (key, value) in ports {
            let targets = flatten_targets(&value)
                .into_iter()
                .map(|target| NodeReference::Structured {
                    node: translate(target.node_id()),
                })
                .collect();
            node.connections.push(OutputPort { key, targets });
        }
    }
}

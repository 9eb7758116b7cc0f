use crate::expression::SourceBucket;
use crate::expression::parsing::referenced_parameters;
use crate::inventory::ParameterInventory;
use crate::workflow::{Node, WorkflowGraph};
use serde_json::Value;

/// Builds the interface parameters known before any method is rendered.
///
/// First the declared fields of the interface node's `body`, `query` and `headers`
/// mappings, then every bucket path referenced by an expression anywhere in the graph.
pub fn seed_inventory(graph: &WorkflowGraph) -> ParameterInventory {
    let mut inventory = ParameterInventory::new();

    if let Some(entry) = interface_node(graph) {
        for bucket in SourceBucket::ALL {
            if let Some(Value::Object(fields)) = entry.parameter(bucket.key()) {
                for key in fields.keys() {
                    inventory.register(key);
                }
            }
        }
    }

    for node in &graph.nodes {
        scan_expressions(&node.parameters, &mut inventory);
    }
    inventory
}

/// The first webhook- or start-like node, else the first node.
pub fn interface_node(graph: &WorkflowGraph) -> Option<&Node> {
    graph
        .nodes
        .iter()
        .find(|n| {
            let type_tag = n.type_tag.to_lowercase();
            type_tag.contains("webhook") || type_tag.contains("start")
        })
        .or_else(|| graph.nodes.first())
}

fn scan_expressions(value: &Value, inventory: &mut ParameterInventory) {
    match value {
        Value::String(s) if s.contains("={{") && s.contains("$json.") => {
            for name in referenced_parameters(s) {
                inventory.register(name);
            }
        }
        Value::Object(map) => map.values().for_each(|v| scan_expressions(v, inventory)),
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .for_each(|item| scan_expressions(item, inventory)),
        _ => {}
    }
}

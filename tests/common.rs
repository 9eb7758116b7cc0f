//! Common test utilities for building workflow graphs.
use honyaku::prelude::*;
use serde_json::{Value, json};

/// A webhook trigger declaring the given body fields.
#[allow(dead_code)]
pub fn webhook_node(id: &str, body_fields: &[&str]) -> Node {
    let body: serde_json::Map<String, Value> = body_fields
        .iter()
        .map(|f| (f.to_string(), json!("")))
        .collect();
    Node::new(id, "Webhook", "n8n-nodes-base.webhook")
        .with_parameters(json!({ "path": "incoming", "body": body }))
}

/// An HTTP request node with arbitrary parameters.
#[allow(dead_code)]
pub fn http_node(id: &str, name: &str, parameters: Value) -> Node {
    Node::new(id, name, "n8n-nodes-base.httpRequest").with_parameters(parameters)
}

/// An AI agent node for the given provider keyword.
#[allow(dead_code)]
pub fn ai_node(id: &str, name: &str, provider: &str) -> Node {
    Node::new(id, name, "@n8n/n8n-nodes-langchain.agent").with_parameters(json!({
        "provider": provider,
        "prompt": "={{ $json.body.question }}",
        "model": { "value": "some-model" },
        "temperature": 0.2,
    }))
}

/// Nodes named after `names` (ids equal names), each connected to the next.
#[allow(dead_code)]
pub fn chain(names: &[&str], type_tag: &str) -> WorkflowGraph {
    let nodes = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let node = Node::new(*name, *name, type_tag);
            match names.get(i + 1) {
                Some(next) => node.connect("main", *next),
                None => node,
            }
        })
        .collect();
    WorkflowGraph::new("Chain", nodes)
}

/// Ids of `nodes`, in order.
#[allow(dead_code)]
pub fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

/// Webhook -> HTTP request -> AI agent, as a typical support-bot workflow.
#[allow(dead_code)]
pub fn support_workflow() -> WorkflowGraph {
    let webhook = webhook_node("1", &["question", "user_id"]).connect("main", "2");
    let lookup = http_node(
        "2",
        "Fetch Profile",
        json!({
            "url": "https://api.example.com/users/={{ $json.body.user_id }}",
            "method": "GET",
            "options": { "headers": { "X-Trace": { "value": "={{ $json.headers.trace_id }}" } } },
        }),
    )
    .connect("main", "3");
    let agent = ai_node("3", "Conselheiro Bíblico", "claude");
    WorkflowGraph::new("Support Bot", vec![webhook, lookup, agent])
}

/// An export-shaped workflow: top-level connections keyed by node names.
#[allow(dead_code)]
pub const EXPORTED_WORKFLOW_JSON: &str = r#"{
    "id": 42,
    "name": "Order Intake",
    "nodes": [
        {
            "id": "a1",
            "name": "Webhook",
            "type": "n8n-nodes-base.webhook",
            "parameters": { "path": "orders", "body": { "order_id": "", "amount": 0 } }
        },
        {
            "id": "b2",
            "name": "Notify Shop",
            "type": "n8n-nodes-base.httpRequest",
            "parameters": {
                "url": "https://shop.example.com/notify",
                "method": "POST",
                "body": "{\"order\": \"={{ $json.body.order_id }}\", \"source\": \"webhook\"}"
            }
        },
        {
            "id": "c3",
            "name": "Summarize",
            "type": "@n8n/n8n-nodes-langchain.agent",
            "parameters": { "provider": { "value": "openrouter" }, "text": "={{ $json.body.note }}" }
        }
    ],
    "connections": {
        "Webhook": { "main": [[{ "node": "Notify Shop", "type": "main", "index": 0 }]] },
        "Notify Shop": { "main": [[{ "node": "Summarize", "type": "main", "index": 0 }]] }
    }
}"#;

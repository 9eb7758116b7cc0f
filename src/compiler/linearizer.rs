use crate::workflow::{Node, WorkflowGraph};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// `true` for node types that mark the start of a workflow.
pub fn is_start_boundary(node: &Node) -> bool {
    node.type_tag.ends_with(".start") || node.type_tag == "n8n-nodes-start"
}

/// Nodes nothing points at, plus start-boundary nodes, in declaration order.
/// Falls back to the first node when every node has an incoming connection.
pub fn entry_candidates(graph: &WorkflowGraph) -> Vec<&Node> {
    let targeted: AHashSet<&str> = graph.nodes.iter().flat_map(Node::successor_ids).collect();
    let mut entries: Vec<&Node> = graph
        .nodes
        .iter()
        .filter(|n| is_start_boundary(n) || !targeted.contains(n.id.as_str()))
        .collect();
    if entries.is_empty()
        && let Some(first) = graph.nodes.first()
    {
        entries.push(first);
    }
    entries
}

/// Orders nodes for sequential emission.
///
/// A preorder depth-first walk from each entry candidate: a node is placed the first time
/// any branch reaches it, and successors are followed in port then connection order.
/// Nodes no entry reaches are appended in declaration order. Every node appears exactly
/// once. This is not a dependency-respecting topological sort: a node fed by two branches
/// lands wherever the first branch finds it.
pub fn linearize(graph: &WorkflowGraph) -> Vec<&Node> {
    let nodes = &graph.nodes;
    let mut index_by_id: AHashMap<&str, usize> = AHashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index_by_id.entry(node.id.as_str()).or_insert(i);
    }

    let mut visited = vec![false; nodes.len()];
    let mut ordered = Vec::with_capacity(nodes.len());

    for entry in entry_candidates(graph) {
        let Some(&start) = index_by_id.get(entry.id.as_str()) else {
            continue;
        };
        // Explicit stack; popping already-visited nodes keeps recursive preorder semantics.
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            ordered.push(&nodes[i]);

            let successors: Vec<usize> = nodes[i]
                .successor_ids()
                .filter_map(|id| index_by_id.get(id).copied())
                .collect();
            stack.extend(successors.into_iter().rev());
        }
    }

    for (i, node) in nodes.iter().enumerate() {
        if !visited[i] {
            debug!(node = %node.id, "Node unreachable from any entry; appending in declaration order");
            ordered.push(node);
        }
    }
    ordered
}

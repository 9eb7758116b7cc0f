use crate::workflow::{Node, WorkflowGraph};
use itertools::Itertools;
use serde_json::Value;

/// Lowercase fragments of a node type that mark it as AI-capable.
const AI_TYPE_MARKERS: &[&str] = &["agent", "langchain", "openai"];

/// An AI provider, inferred from a node's `provider` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    OpenRouter,
}

impl Provider {
    /// Case-insensitive keyword match; anything unrecognised is the OpenAI default.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("claude") || text.contains("anthropic") {
            Provider::Anthropic
        } else if text.contains("openrouter") {
            Provider::OpenRouter
        } else {
            Provider::OpenAi
        }
    }

    /// Provider of an AI node, read from its `provider` parameter.
    pub fn of_node(node: &Node) -> Self {
        Self::classify(provider_text(node).unwrap_or_default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Name of the credential class the generated code instantiates.
    pub fn credential_identifier(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAICredentials",
            Provider::Anthropic => "AnthropicCredentials",
            Provider::OpenRouter => "OpenRouterCredentials",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
            Provider::Anthropic => "https://api.anthropic.com/v1/messages",
            Provider::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-sonnet-latest",
            Provider::OpenRouter => "openai/gpt-4o-mini",
        }
    }
}

pub fn is_ai_node(node: &Node) -> bool {
    let type_tag = node.type_tag.to_lowercase();
    AI_TYPE_MARKERS.iter().any(|m| type_tag.contains(m))
}

/// `provider` as a direct string or as `{ "value": "..." }`.
fn provider_text(node: &Node) -> Option<&str> {
    match node.parameter("provider")? {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("value").and_then(Value::as_str),
        _ => None,
    }
}

/// Providers of every AI node, de-duplicated, in order of first appearance.
pub fn detect(graph: &WorkflowGraph) -> Vec<Provider> {
    graph
        .nodes
        .iter()
        .filter(|n| is_ai_node(n))
        .map(Provider::of_node)
        .unique()
        .collect()
}

/// Credential identifiers the generated unit needs, sorted for deterministic output.
pub fn credential_identifiers(graph: &WorkflowGraph) -> Vec<&'static str> {
    detect(graph)
        .into_iter()
        .map(|p| p.credential_identifier())
        .sorted()
        .collect()
}

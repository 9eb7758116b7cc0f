use super::credentials::{Provider, is_ai_node};
use crate::expression::ExpressionResolver;
use crate::expression::parsing::is_envelope;
use crate::language::LanguageBackend;
use crate::template::{Placeholders, Template};
use crate::workflow::Node;
use serde_json::Value;
use tracing::{debug, warn};

const DEFAULT_HTTP_METHOD: &str = "GET";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u64 = 1000;

/// Fills one node's method template.
///
/// Only placeholders the template (or a provider snippet it pulls in) actually names are
/// computed, so a node never registers parameters for values its method does not emit.
/// Every text is substituted exactly once: values taken from the workflow may contain
/// `{{...}}` and stay verbatim.
pub(super) struct NodeRenderer<'r, 'a> {
    backend: &'a dyn LanguageBackend,
    resolver: &'r mut ExpressionResolver<'a>,
}

impl<'r, 'a> NodeRenderer<'r, 'a> {
    pub(super) fn new(
        backend: &'a dyn LanguageBackend,
        resolver: &'r mut ExpressionResolver<'a>,
    ) -> Self {
        Self { backend, resolver }
    }

    pub(super) fn render(&mut self, node: &Node, template: &Template, method_name: &str) -> String {
        let provider = Provider::of_node(node);
        let mut wanted: Vec<String> = template.placeholders().into_iter().map(String::from).collect();
        let mut snippets: Vec<(&str, Template)> = Vec::new();

        let provider_snippets = [
            ("request_headers", self.backend.request_headers(provider)),
            ("request_body", self.backend.request_body(provider)),
        ];
        for (name, text) in provider_snippets {
            if wanted.iter().any(|w| w == name) {
                let snippet = Template::new(text);
                for inner in snippet.placeholders() {
                    if !wanted.iter().any(|w| w == inner) {
                        wanted.push(inner.to_string());
                    }
                }
                snippets.push((name, snippet));
            }
        }

        let mut values = Placeholders::new();
        for name in &wanted {
            if snippets.iter().any(|(s, _)| s == name) {
                continue;
            }
            match self.value_for(name, node, method_name, provider) {
                Some(value) => {
                    values.set(name, value);
                }
                None => debug!(placeholder = %name, node = %node.name, "No value for placeholder"),
            }
        }

        // Provider snippets are filled before the method, so resolved values are never rescanned.
        for (name, snippet) in &snippets {
            let rendered = snippet.render(&values);
            values.set(name, rendered);
        }
        template.render(&values)
    }

    fn value_for(
        &mut self,
        name: &str,
        node: &Node,
        method_name: &str,
        provider: Provider,
    ) -> Option<String> {
        let value = match name {
            "method_name" => method_name.to_string(),
            "output_key" => format!("{}_output", method_name),
            "node_name" => node.name.clone(),
            "node_type" => node.type_tag.clone(),
            "url" => self.text_param(node, &["url"], ""),
            "method" => self.text_param(node, &["method", "requestMethod"], DEFAULT_HTTP_METHOD),
            "headers" => self.headers(node),
            "body" => self.body(node),
            "prompt" => self.text_param(node, &["prompt", "text"], ""),
            "model" => self.text_param(node, &["model"], provider.default_model()),
            "temperature" => self.number_param(node, "temperature", DEFAULT_TEMPERATURE.to_string()),
            "max_tokens" => self.number_param(node, "maxTokens", DEFAULT_MAX_TOKENS.to_string()),
            "system_message" => self.text_param(node, &["systemMessage"], ""),
            "provider" => provider.name().to_string(),
            "endpoint" => self.text_param(node, &["endpoint"], provider.default_endpoint()),
            "credentials_lookup" => {
                if !is_ai_node(node) {
                    warn!(node = %node.name, "Credential lookup requested by a non-AI node");
                }
                self.backend.credential_lookup(provider.credential_identifier())
            }
            "tools" => self.tools(node),
            _ => return None,
        };
        Some(value)
    }

    /// First present key among `keys`, looked up directly and then under `options`.
    fn lookup<'n>(node: &'n Node, keys: &[&str]) -> Option<&'n Value> {
        keys.iter()
            .find_map(|k| node.parameter(k))
            .or_else(|| {
                let options = node.parameter("options")?;
                keys.iter().find_map(|k| options.get(*k))
            })
            .map(unwrap_value)
            .filter(|v| !v.is_null())
    }

    fn text_param(&mut self, node: &Node, keys: &[&str], default: &str) -> String {
        match Self::lookup(node, keys) {
            Some(Value::String(s)) => self.resolver.resolve_embedded(s),
            Some(other) => self.resolver.render_value(other),
            None => self.backend.string_literal(default),
        }
    }

    fn number_param(&mut self, node: &Node, key: &str, default: String) -> String {
        match Self::lookup(node, &[key]) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if is_envelope(s.trim()) => self.resolver.resolve_embedded(s),
            Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => s.trim().to_string(),
            Some(other) => {
                warn!(node = %node.name, parameter = key, value = %other, "Ignoring non-numeric value");
                default
            }
            None => default,
        }
    }

    /// `options.headers` as a mapping, or n8n's `headerParameters.parameters` list.
    fn headers(&mut self, node: &Node) -> String {
        let mut entries: Vec<(String, String)> = Vec::new();

        if let Some(Value::Object(map)) = node.parameter("options").and_then(|o| o.get("headers")) {
            for (name, value) in map {
                let code = self.resolver.render_value(unwrap_value(value));
                entries.push((name.clone(), code));
            }
        } else if let Some(Value::Array(items)) = node
            .parameter("headerParameters")
            .and_then(|h| h.get("parameters"))
        {
            for item in items {
                let Some(name) = item.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let code = match item.get("value") {
                    Some(value) => self.resolver.render_value(value),
                    None => self.backend.string_literal(""),
                };
                entries.push((name.to_string(), code));
            }
        }

        self.backend.map_literal(&entries)
    }

    fn body(&mut self, node: &Node) -> String {
        let null = self.backend.null_literal().to_string();
        let Some(raw) = node.parameter("body").or_else(|| node.parameter("jsonBody")) else {
            return null;
        };

        match raw {
            Value::Null => null,
            Value::Object(map) if map.is_empty() => null,
            Value::Array(items) if items.is_empty() => null,
            Value::Object(_) | Value::Array(_) => self.resolver.render_value(raw),
            Value::String(s) if s.trim().is_empty() => null,
            Value::String(s) if is_envelope(s.trim()) => self.resolver.resolve_embedded(s.trim()),
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                    self.resolver.render_value(&parsed)
                }
                _ => {
                    warn!(node = %node.name, "Request body is neither a mapping nor valid JSON; emitting null");
                    null
                }
            },
            other => {
                warn!(node = %node.name, body = %other, "Unsupported request body; emitting null");
                null
            }
        }
    }

    fn tools(&mut self, node: &Node) -> String {
        let names: Vec<String> = match node.parameter("tools") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    other => other.get("name").and_then(Value::as_str),
                })
                .map(|name| self.backend.string_literal(name))
                .collect(),
            _ => Vec::new(),
        };
        self.backend.list_literal(&names)
    }
}

/// n8n wraps some scalars as `{ "value": ... }`, resource locators add `__rl` and `mode`.
fn unwrap_value(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("value").unwrap_or(value),
        _ => value,
    }
}

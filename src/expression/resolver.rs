use super::Resolved;
use super::parsing::{self, envelope_spans, is_envelope};
use crate::inventory::ParameterInventory;
use crate::language::LanguageBackend;
use serde_json::Value;
use tracing::debug;

/// Turns expression-bearing parameter values into target-language code.
///
/// The resolver borrows the compilation's inventory mutably: every parameter an expression
/// reads is registered as it is resolved.
pub struct ExpressionResolver<'a> {
    backend: &'a dyn LanguageBackend,
    inventory: &'a mut ParameterInventory,
}

impl<'a> ExpressionResolver<'a> {
    pub fn new(backend: &'a dyn LanguageBackend, inventory: &'a mut ParameterInventory) -> Self {
        Self { backend, inventory }
    }

    pub fn inventory(&self) -> &ParameterInventory {
        &*self.inventory
    }

    /// Resolves one whole `={{ ... }}` envelope.
    ///
    /// Text that is not an envelope, or whose path cannot be parsed, comes back unchanged as
    /// a [`Resolved::Literal`].
    pub fn resolve(&mut self, expression: &str) -> Resolved {
        match parsing::parse_envelope(expression) {
            Some(reference) => {
                if self.inventory.register(reference.parameter()) {
                    debug!(parameter = reference.parameter(), "Registered parameter from expression");
                }
                Resolved::Accessor(self.backend.accessor(reference.parameter(), reference.rest()))
            }
            None => {
                if is_envelope(expression.trim()) {
                    debug!(expression, "Unresolvable expression kept as literal");
                }
                Resolved::Literal(expression.to_string())
            }
        }
    }

    /// Resolves a string that may mix free text with any number of envelopes.
    ///
    /// A string that is exactly one resolvable envelope becomes bare accessor code. Otherwise
    /// each envelope is replaced in place by its accessor (unresolvable ones are kept verbatim)
    /// and the whole text is emitted as a string literal.
    pub fn resolve_embedded(&mut self, raw: &str) -> String {
        let spans = envelope_spans(raw);

        if is_envelope(raw.trim()) && spans.len() <= 1 {
            return self.resolve(raw).into_code(self.backend);
        }
        if spans.is_empty() {
            return self.backend.string_literal(raw);
        }

        let mut text = String::with_capacity(raw.len());
        let mut cursor = 0;
        for span in spans {
            text.push_str(&raw[cursor..span.start]);
            match self.resolve(&raw[span.clone()]) {
                Resolved::Accessor(code) => text.push_str(&code),
                Resolved::Literal(original) => text.push_str(&original),
            }
            cursor = span.end;
        }
        text.push_str(&raw[cursor..]);
        self.backend.string_literal(&text)
    }

    /// Renders a parameter tree as a target-language literal, resolving every string in it.
    pub fn render_value(&mut self, value: &Value) -> String {
        match value {
            Value::Null => self.backend.null_literal().to_string(),
            Value::Bool(b) => self.backend.bool_literal(*b).to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => self.resolve_embedded(s),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| self.render_value(v)).collect();
                self.backend.list_literal(&items)
            }
            Value::Object(map) => {
                let entries: Vec<(String, String)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.render_value(v)))
                    .collect();
                self.backend.map_literal(&entries)
            }
        }
    }
}

use super::{ClassContext, Language, LanguageBackend, escape_single};
use crate::compiler::credentials::Provider;
use crate::inventory::{ParamType, ParameterInventory};
use crate::template::Placeholders;
use itertools::Itertools;

pub struct JavaScriptBackend;

const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
    // members of the class template
    "run", "constructor", "getContext", "params", "context",
];

impl LanguageBackend for JavaScriptBackend {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn member_sigil(&self) -> &'static str {
        "this."
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    fn map_literal(&self, entries: &[(String, String)]) -> String {
        if entries.is_empty() {
            return "{}".to_string();
        }
        let body = entries
            .iter()
            .map(|(k, v)| format!("'{}': {}", escape_single(k), v))
            .join(", ");
        format!("{{ {} }}", body)
    }

    fn type_name(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Dynamic => "*",
        }
    }

    fn method_call(&self, method: &str) -> String {
        format!("await this.{}();", method)
    }

    fn constructor(&self, inventory: &ParameterInventory) -> String {
        let mut lines = Vec::new();
        if !inventory.is_empty() {
            lines.push("/**".to_string());
            lines.push(" * @param {Object} params".to_string());
            for (name, ty) in inventory.iter() {
                lines.push(format!(" * @param {{{}}} params['{}']", self.type_name(ty), name));
            }
            lines.push(" */".to_string());
        }
        lines.push("constructor(params = {}) {".to_string());
        lines.push("    this.params = {};".to_string());
        for (name, _) in inventory.iter() {
            let key = escape_single(name);
            lines.push(format!(
                "    this.params['{}'] = params['{}'] ?? null;",
                key, key
            ));
        }
        lines.push("    this.context = {};".to_string());
        lines.push("}".to_string());
        lines.join("\n")
    }

    fn credential_bindings(&self, identifiers: &[&str], resource_path: &str) -> String {
        if identifiers.is_empty() {
            return String::new();
        }
        format!(
            "const {{ {} }} = require('{}');",
            identifiers.join(", "),
            escape_single(resource_path)
        )
    }

    fn credential_lookup(&self, identifier: &str) -> String {
        format!("new {}().getApiKey()", identifier)
    }

    fn request_headers(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "{ 'x-api-key': {{credentials_lookup}}, 'anthropic-version': '2023-06-01', 'Content-Type': 'application/json' }"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "{ 'Authorization': `Bearer ${ {{credentials_lookup}} }`, 'Content-Type': 'application/json' }"
            }
        }
    }

    fn request_body(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "{\n    model: {{model}},\n    max_tokens: {{max_tokens}},\n    system: {{system_message}},\n    messages: [{ role: 'user', content: {{prompt}} }],\n}"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "{\n    model: {{model}},\n    temperature: {{temperature}},\n    max_tokens: {{max_tokens}},\n    messages: [\n        { role: 'system', content: {{system_message}} },\n        { role: 'user', content: {{prompt}} },\n    ],\n}"
            }
        }
    }

    fn fallback_stub(&self) -> &'static str {
        "/**\n * Node: {{node_name}}\n * Type: {{node_type}}\n */\nasync {{method_name}}() {\n    // No template is available for this node type.\n    this.context['{{output_key}}'] = {};\n}"
    }

    fn class_placeholders(&self, ctx: &ClassContext<'_>, values: &mut Placeholders) {
        values.set("export", format!("module.exports = {{ {} }};", ctx.class_name));
    }
}

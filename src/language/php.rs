use super::{Language, LanguageBackend, escape_single};
use crate::compiler::credentials::Provider;
use crate::identifier;
use crate::inventory::{ParamType, ParameterInventory};
use ahash::AHashSet;
use itertools::Itertools;

pub struct PhpBackend;

const RESERVED: &[&str] = &[
    "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
    "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "eval",
    "exit", "extends", "final", "finally", "fn", "for", "foreach", "function", "global", "goto",
    "if", "implements", "include", "include_once", "instanceof", "insteadof", "interface",
    "isset", "list", "match", "namespace", "new", "or", "print", "private", "protected",
    "public", "readonly", "require", "require_once", "return", "static", "switch", "throw",
    "trait", "try", "unset", "use", "var", "while", "xor", "yield", "this", "self", "parent",
    "null", "true", "false",
    // members of the class template
    "run", "getContext", "__construct",
];

impl LanguageBackend for PhpBackend {
    fn language(&self) -> Language {
        Language::Php
    }

    fn extension(&self) -> &'static str {
        "php"
    }

    fn member_sigil(&self) -> &'static str {
        "$this->"
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
        let body = entries
            .iter()
            .map(|(k, v)| format!("'{}' => {}", escape_single(k), v))
            .join(", ");
        format!("[{}]", body)
    }

    fn type_name(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Dynamic => "mixed",
        }
    }

    fn method_call(&self, method: &str) -> String {
        format!("$this->{}();", method)
    }

    fn constructor(&self, inventory: &ParameterInventory) -> String {
        if inventory.is_empty() {
            return "public function __construct()\n{\n    $this->params = [];\n}".to_string();
        }

        let mut used = AHashSet::new();
        let bindings: Vec<(String, String, ParamType)> = inventory
            .iter()
            .map(|(name, ty)| {
                let base = identifier::method_identifier(name, Language::Php);
                let mut variable = base.clone();
                let mut n = 2;
                while !used.insert(variable.clone()) {
                    variable = format!("{}{}", base, n);
                    n += 1;
                }
                (name.to_string(), variable, ty)
            })
            .collect();

        let signature = bindings
            .iter()
            .map(|(_, var, ty)| format!("{} ${} = null", self.type_name(*ty), var))
            .join(", ");
        let assignments = bindings
            .iter()
            .map(|(name, var, _)| format!("        '{}' => ${},", escape_single(name), var))
            .join("\n");

        format!(
            "public function __construct({})\n{{\n    $this->params = [\n{}\n    ];\n}}",
            signature, assignments
        )
    }

    fn credential_bindings(&self, identifiers: &[&str], resource_path: &str) -> String {
        if identifiers.is_empty() {
            return String::new();
        }
        let uses = identifiers
            .iter()
            .map(|id| format!("use Generated\\Credentials\\{};", id))
            .join("\n");
        format!(
            "require_once __DIR__ . '/{}';\n\n{}",
            escape_single(resource_path),
            uses
        )
    }

    fn credential_lookup(&self, identifier: &str) -> String {
        format!("(new {}())->getApiKey()", identifier)
    }

    fn request_headers(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "['x-api-key: ' . {{credentials_lookup}}, 'anthropic-version: 2023-06-01', 'Content-Type: application/json']"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "['Authorization: Bearer ' . {{credentials_lookup}}, 'Content-Type: application/json']"
            }
        }
    }

    fn request_body(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "[\n    'model' => {{model}},\n    'max_tokens' => {{max_tokens}},\n    'system' => {{system_message}},\n    'messages' => [['role' => 'user', 'content' => {{prompt}}]],\n]"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "[\n    'model' => {{model}},\n    'temperature' => {{temperature}},\n    'max_tokens' => {{max_tokens}},\n    'messages' => [\n        ['role' => 'system', 'content' => {{system_message}}],\n        ['role' => 'user', 'content' => {{prompt}}],\n    ],\n]"
            }
        }
    }

    fn fallback_stub(&self) -> &'static str {
        "/**\n * Node: {{node_name}}\n * Type: {{node_type}}\n */\nprivate function {{method_name}}(): void\n{\n    // No template is available for this node type.\n    $this->context['{{output_key}}'] = [];\n}"
    }
}

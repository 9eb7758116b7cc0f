use super::{Language, LanguageBackend, escape_single};
use crate::compiler::credentials::Provider;
use crate::inventory::{ParamType, ParameterInventory};
use itertools::Itertools;

pub struct PythonBackend;

const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "self", "print",
    // members of the class template
    "run", "get_context", "getContext", "params", "context",
];

impl LanguageBackend for PythonBackend {
    fn language(&self) -> Language {
        Language::Python
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn member_sigil(&self) -> &'static str {
        "self."
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn null_literal(&self) -> &'static str {
        "None"
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "True" } else { "False" }
    }

    fn map_literal(&self, entries: &[(String, String)]) -> String {
        let body = entries
            .iter()
            .map(|(k, v)| format!("'{}': {}", escape_single(k), v))
            .join(", ");
        format!("{{{}}}", body)
    }

    fn type_name(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::Dynamic => "Any",
        }
    }

    fn method_call(&self, method: &str) -> String {
        format!("self.{}()", method)
    }

    fn constructor(&self, inventory: &ParameterInventory) -> String {
        let mut lines = vec!["def __init__(self, **kwargs):".to_string()];
        if !inventory.is_empty() {
            lines.push("    \"\"\"".to_string());
            lines.push("    Keyword arguments:".to_string());
            for (name, ty) in inventory.iter() {
                lines.push(format!("        {} ({})", name, self.type_name(ty)));
            }
            lines.push("    \"\"\"".to_string());
        }
        lines.push("    self.params = {}".to_string());
        for (name, _) in inventory.iter() {
            let key = escape_single(name);
            lines.push(format!("    self.params['{}'] = kwargs.get('{}')", key, key));
        }
        lines.push("    self.context = {}".to_string());
        lines.join("\n")
    }

    fn credential_bindings(&self, identifiers: &[&str], resource_path: &str) -> String {
        if identifiers.is_empty() {
            return String::new();
        }
        format!(
            "from {} import {}",
            module_path(resource_path),
            identifiers.join(", ")
        )
    }

    fn credential_lookup(&self, identifier: &str) -> String {
        format!("{}().get_api_key()", identifier)
    }

    fn request_headers(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "{'x-api-key': {{credentials_lookup}}, 'anthropic-version': '2023-06-01', 'Content-Type': 'application/json'}"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "{'Authorization': 'Bearer ' + {{credentials_lookup}}, 'Content-Type': 'application/json'}"
            }
        }
    }

    fn request_body(&self, provider: Provider) -> &'static str {
        match provider {
            Provider::Anthropic => {
                "{\n    'model': {{model}},\n    'max_tokens': {{max_tokens}},\n    'system': {{system_message}},\n    'messages': [{'role': 'user', 'content': {{prompt}}}],\n}"
            }
            Provider::OpenAi | Provider::OpenRouter => {
                "{\n    'model': {{model}},\n    'temperature': {{temperature}},\n    'max_tokens': {{max_tokens}},\n    'messages': [\n        {'role': 'system', 'content': {{system_message}}},\n        {'role': 'user', 'content': {{prompt}}},\n    ],\n}"
            }
        }
    }

    fn fallback_stub(&self) -> &'static str {
        "def {{method_name}}(self):\n    \"\"\"Node: {{node_name}} ({{node_type}})\"\"\"\n    # No template is available for this node type.\n    self.context['{{output_key}}'] = {}"
    }
}

/// `../credentials/Credentials.py` -> `credentials.Credentials`.
fn module_path(resource_path: &str) -> String {
    let without_ext = resource_path
        .strip_suffix(".py")
        .unwrap_or(resource_path);
    without_ext
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .join(".")
}
